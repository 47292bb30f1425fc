//! End-to-end conversion tests.

use proptest::prelude::*;

use svg2pptx::filters::{apply_component_transfer, apply_filter};
use svg2pptx::{
    convert_str, CanvasGeometry, ConversionContext, ConversionError, CoordinateSystem, Document,
    ResourceNeed, Services, Session,
};

fn square_canvas() -> CanvasGeometry {
    CanvasGeometry::new(9_144_000, 9_144_000)
}

fn context_for(document: &Document, session: Session) -> ConversionContext {
    let viewbox = document.get_viewbox(&session).unwrap();
    let coords = CoordinateSystem::new(viewbox, square_canvas()).unwrap();
    ConversionContext::new(session, coords, Services::default())
}

#[test]
fn rect_covers_the_whole_canvas() {
    let conversion = convert_str(
        r#"<svg viewBox="0 0 100 100">
             <rect x="0" y="0" width="100" height="100"/>
           </svg>"#,
        square_canvas(),
    )
    .unwrap();

    assert_eq!(conversion.fragments.len(), 1);

    let s = &conversion.fragments[0];
    assert!(s.contains("<a:off x=\"0\" y=\"0\"/>"));
    assert!(s.contains("<a:ext cx=\"9144000\" cy=\"9144000\"/>"));
}

#[test]
fn fragments_follow_document_order() {
    let conversion = convert_str(
        r#"<svg viewBox="0 0 100 100">
             <rect id="under" width="100" height="100"/>
             <circle id="over" cx="50" cy="50" r="10"/>
           </svg>"#,
        square_canvas(),
    )
    .unwrap();

    assert_eq!(conversion.fragments.len(), 2);
    assert!(conversion.fragments[0].contains("name=\"under\""));
    assert!(conversion.fragments[1].contains("name=\"over\""));

    let all = conversion.drawingml();
    assert!(all.find("under").unwrap() < all.find("over").unwrap());
}

#[test]
fn unknown_elements_are_skipped_but_siblings_convert() {
    let conversion = convert_str(
        r#"<svg viewBox="0 0 100 100">
             <video src="movie.ogg"/>
             <rect width="10" height="10"/>
           </svg>"#,
        square_canvas(),
    )
    .unwrap();

    assert_eq!(conversion.fragments.len(), 1);
    assert!(conversion.fragments[0].contains("prst=\"rect\""));
}

#[test]
fn invalid_viewport_aborts_the_document() {
    let err = convert_str(r#"<svg viewBox="0 0 0 100"><rect/></svg>"#, square_canvas())
        .unwrap_err();

    assert!(matches!(err, ConversionError::InvalidViewport(_)));
}

#[test]
fn rootless_size_aborts_the_document() {
    let err = convert_str("<svg><rect/></svg>", square_canvas()).unwrap_err();
    assert!(matches!(err, ConversionError::InvalidDocumentRoot(_)));
}

#[test]
fn discrete_zero_one_maps_to_binary_threshold() {
    let conversion = convert_str(
        r#"<svg viewBox="0 0 100 100">
             <defs>
               <filter id="thresh">
                 <feComponentTransfer>
                   <feFuncR type="discrete" tableValues="0 1"/>
                   <feFuncG type="discrete" tableValues="0 1"/>
                   <feFuncB type="discrete" tableValues="0 1"/>
                 </feComponentTransfer>
               </filter>
             </defs>
             <rect width="100" height="100" filter="url(#thresh)"/>
           </svg>"#,
        square_canvas(),
    )
    .unwrap();

    assert_eq!(conversion.fragments.len(), 1);
    assert!(conversion.fragments[0].contains("<a:biLevel thresh=\"50000\"/>"));
}

#[test]
fn malformed_table_values_degrade_without_failing() {
    let session = Session::default();
    let document = Document::load_from_str(
        r#"<svg viewBox="0 0 100 100">
             <filter id="f">
               <feComponentTransfer>
                 <feFuncR type="discrete" tableValues="abc def"/>
               </feComponentTransfer>
             </filter>
           </svg>"#,
        &session,
    )
    .unwrap();

    let ctx = context_for(&document, session);
    let filter = document.lookup_internal("f").unwrap();

    let result = apply_filter(&filter, &ctx);

    // the red channel fell back to identity, so nothing matches a native
    // pattern; the filter still succeeds with the complex fallback
    assert!(result.success);
    assert!(!result.drawingml.is_empty());
    assert_eq!(result.metadata.classification, "complex");
    assert!(result.drawingml.contains("R=identity"));
}

#[test]
fn duotone_filter_round_trips_through_the_color_service() {
    let conversion = convert_str(
        r#"<svg viewBox="0 0 100 100">
             <filter id="duo">
               <feComponentTransfer>
                 <feFuncR type="discrete" tableValues="0.2 0.8"/>
                 <feFuncG type="discrete" tableValues="0.2 0.8"/>
                 <feFuncB type="discrete" tableValues="0.2 0.8"/>
               </feComponentTransfer>
             </filter>
             <rect width="100" height="100" filter="url(#duo)"/>
           </svg>"#,
        square_canvas(),
    )
    .unwrap();

    let s = &conversion.fragments[0];
    assert!(s.contains("<a:duotone><a:srgbClr val=\"333333\"/><a:srgbClr val=\"CCCCCC\"/></a:duotone>"));
}

#[test]
fn filter_with_no_supported_primitive_degrades_to_no_effect() {
    let conversion = convert_str(
        r#"<svg viewBox="0 0 100 100">
             <filter id="blur"><feGaussianBlur stdDeviation="3"/></filter>
             <rect width="100" height="100" filter="url(#blur)"/>
           </svg>"#,
        square_canvas(),
    )
    .unwrap();

    assert_eq!(conversion.fragments.len(), 1);
    assert!(!conversion.fragments[0].contains("biLevel"));
    assert!(!conversion.fragments[0].contains("effectLst"));
}

#[test]
fn text_declares_its_font() {
    let conversion = convert_str(
        r#"<svg viewBox="0 0 100 100">
             <text x="10" y="20" font-family="Inter">hello</text>
           </svg>"#,
        square_canvas(),
    )
    .unwrap();

    assert_eq!(
        conversion.resources,
        vec![ResourceNeed::Font("Inter".to_string())]
    );
}

#[test]
fn conversion_is_deterministic() {
    let svg = r##"<svg viewBox="0 0 100 100">
                   <g transform="translate(5 5)">
                     <rect width="20" height="20" fill="#336699"/>
                     <path d="M 0 0 L 10 10 Z"/>
                   </g>
                 </svg>"##;

    let a = convert_str(svg, square_canvas()).unwrap();
    let b = convert_str(svg, square_canvas()).unwrap();

    assert_eq!(a, b);
}

fn func_type() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("identity"),
        Just("table"),
        Just("discrete"),
        Just("linear"),
        Just("gamma"),
    ]
}

fn table_values() -> impl Strategy<Value = String> {
    proptest::collection::vec(-2.0..2.0f64, 0..6)
        .prop_map(|v| v.iter().map(|n| format!("{:.3}", n)).collect::<Vec<_>>().join(" "))
}

prop_compose! {
    fn fe_func(name: &'static str)(
        ty in func_type(),
        values in table_values(),
        slope in -3.0..3.0f64,
        intercept in -1.0..1.0f64,
        amplitude in -2.0..2.0f64,
        exponent in 0.01..5.0f64,
        offset in -1.0..1.0f64,
    ) -> String {
        format!(
            "<{name} type=\"{ty}\" tableValues=\"{values}\" slope=\"{slope:.3}\" \
             intercept=\"{intercept:.3}\" amplitude=\"{amplitude:.3}\" \
             exponent=\"{exponent:.3}\" offset=\"{offset:.3}\"/>",
        )
    }
}

proptest! {
    /// Any syntactically valid feComponentTransfer yields a successful
    /// result with non-empty output, and never panics.
    #[test]
    fn component_transfer_never_fails(
        r in proptest::option::of(fe_func("feFuncR")),
        g in proptest::option::of(fe_func("feFuncG")),
        b in proptest::option::of(fe_func("feFuncB")),
        a in proptest::option::of(fe_func("feFuncA")),
    ) {
        let svg = format!(
            r#"<svg viewBox="0 0 10 10"><feComponentTransfer>{}{}{}{}</feComponentTransfer></svg>"#,
            r.unwrap_or_default(),
            g.unwrap_or_default(),
            b.unwrap_or_default(),
            a.unwrap_or_default(),
        );

        let session = Session::default();
        let document = Document::load_from_str(&svg, &session).unwrap();
        let ctx = context_for(&document, session);

        let fe = document.root().children().next().unwrap();
        let result = apply_component_transfer(&fe, &ctx);

        prop_assert!(result.success);
        prop_assert!(!result.drawingml.is_empty());
        prop_assert!(result.metadata.complexity >= 0.5);
    }
}
