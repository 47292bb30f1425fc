//! Deterministic rendering of DrawingML fragments.
//!
//! Everything in this module is a pure function from values to text; the
//! same input always produces byte-identical output, which is what the
//! snapshot tests rely on.  No I/O, no state.

use std::fmt::Write;

use crate::color::ColorService;
use crate::filters::classify::EffectClassification;

/// Escapes a string for use inside an XML attribute value.
pub fn escape_attribute(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }

    out
}

/// Escapes a string for use as XML character content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }

    out
}

/// The duotone that swaps black and white, used to express inversion.
fn inversion_swap() -> &'static str {
    "<a:duotone><a:srgbClr val=\"FFFFFF\"/><a:srgbClr val=\"000000\"/></a:duotone>"
}

/// Renders a classified filter effect as DrawingML.
///
/// Binary, duotone, grayscale and gamma map to their native color effects;
/// an inverted binary or grayscale appends a black/white duotone swap.  The
/// complex fallback renders an empty effect container with the per-channel
/// summary as a comment, valid but visually inert.
pub fn render_effect(classification: &EffectClassification, color: &dyn ColorService) -> String {
    match classification {
        EffectClassification::Binary {
            threshold,
            inverted,
        } => {
            let mut s = format!("<a:biLevel thresh=\"{}\"/>", threshold);
            if *inverted {
                s.push_str(inversion_swap());
            }
            s
        }

        EffectClassification::Duotone { color1, color2 } => format!(
            "<a:duotone><a:srgbClr val=\"{}\"/><a:srgbClr val=\"{}\"/></a:duotone>",
            color.format_hex(*color1),
            color.format_hex(*color2),
        ),

        EffectClassification::Grayscale { inverted, .. } => {
            let mut s = String::from("<a:grayscl/>");
            if *inverted {
                s.push_str(inversion_swap());
            }
            s
        }

        EffectClassification::Gamma { inverse, .. } => {
            if *inverse {
                "<a:invGamma/>".to_string()
            } else {
                "<a:gamma/>".to_string()
            }
        }

        EffectClassification::Complex { summary } => format!(
            "<a:effectLst/><!-- unsupported filter: {} -->",
            escape_text(&summary.replace("--", "__")),
        ),
    }
}

/// Geometry and style of one emitted shape.
pub struct ShapeProps<'a> {
    pub name: &'a str,
    pub offset: (i64, i64),
    pub extent: (i64, i64),
    pub fill_hex: Option<String>,
    pub effect: Option<&'a str>,
}

fn write_nv_sp_pr(out: &mut String, id: u32, name: &str) {
    let _ = write!(
        out,
        "<p:nvSpPr><p:cNvPr id=\"{}\" name=\"{}\"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>",
        id,
        escape_attribute(name),
    );
}

fn write_xfrm(out: &mut String, offset: (i64, i64), extent: (i64, i64)) {
    let _ = write!(
        out,
        "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
        offset.0, offset.1, extent.0, extent.1,
    );
}

fn write_style(out: &mut String, props: &ShapeProps<'_>) {
    if let Some(ref hex) = props.fill_hex {
        let _ = write!(
            out,
            "<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>",
            hex
        );
    }

    if let Some(effect) = props.effect {
        out.push_str(effect);
    }
}

/// Renders a `<p:sp>` with a preset geometry (`rect`, `ellipse`, `line`).
pub fn render_preset_shape(id: u32, preset: &str, props: &ShapeProps<'_>) -> String {
    let mut out = String::new();

    out.push_str("<p:sp>");
    write_nv_sp_pr(&mut out, id, props.name);
    out.push_str("<p:spPr>");
    write_xfrm(&mut out, props.offset, props.extent);
    let _ = write!(
        out,
        "<a:prstGeom prst=\"{}\"><a:avLst/></a:prstGeom>",
        preset
    );
    write_style(&mut out, props);
    out.push_str("</p:spPr></p:sp>");

    out
}

/// Renders a `<p:sp>` with a custom geometry taken from a path.
///
/// `path_xml` is the `<a:path>…</a:path>` body, already in EMU.
pub fn render_custgeom_shape(id: u32, path_xml: &str, props: &ShapeProps<'_>) -> String {
    let mut out = String::new();

    out.push_str("<p:sp>");
    write_nv_sp_pr(&mut out, id, props.name);
    out.push_str("<p:spPr>");
    write_xfrm(&mut out, props.offset, props.extent);
    let _ = write!(
        out,
        "<a:custGeom><a:avLst/><a:gdLst/><a:ahLst/><a:cxnLst/><a:rect l=\"0\" t=\"0\" r=\"0\" b=\"0\"/><a:pathLst>{}</a:pathLst></a:custGeom>",
        path_xml
    );
    write_style(&mut out, props);
    out.push_str("</p:spPr></p:sp>");

    out
}

/// Renders a text shape with one run.
pub fn render_text_shape(
    id: u32,
    text: &str,
    font_family: Option<&str>,
    props: &ShapeProps<'_>,
) -> String {
    let mut out = String::new();

    out.push_str("<p:sp>");
    write_nv_sp_pr(&mut out, id, props.name);
    out.push_str("<p:spPr>");
    write_xfrm(&mut out, props.offset, props.extent);
    write_style(&mut out, props);
    out.push_str("</p:spPr>");

    out.push_str("<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:rPr lang=\"en-US\"");
    if let Some(family) = font_family {
        let _ = write!(
            out,
            "><a:latin typeface=\"{}\"/></a:rPr>",
            escape_attribute(family)
        );
    } else {
        out.push_str("/>");
    }
    let _ = write!(out, "<a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>", escape_text(text));

    out
}

/// Renders a group container around already-rendered child fragments.
pub fn render_group(id: u32, name: &str, children: &[String]) -> String {
    let mut out = String::new();

    out.push_str("<p:grpSp><p:nvGrpSpPr>");
    let _ = write!(
        out,
        "<p:cNvPr id=\"{}\" name=\"{}\"/><p:cNvGrpSpPr/><p:nvPr/>",
        id,
        escape_attribute(name)
    );
    out.push_str("</p:nvGrpSpPr><p:grpSpPr/>");

    for child in children {
        out.push_str(child);
    }

    out.push_str("</p:grpSp>");

    out
}
