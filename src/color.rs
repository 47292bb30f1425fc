//! CSS color values, and the color service used for duotone output.

use cssparser::{Parser, ParserInput};
use rgb::RGB8;

use crate::error::ValueErrorKind;

/// Parses and formats colors for effect generation.
///
/// Duotone effects need their two poles as `RRGGBB` hex; color parsing
/// itself is a collaborator concern, injected so that a caller with a
/// richer color pipeline can substitute its own.
pub trait ColorService: Send + Sync {
    fn parse_color(&self, spec: &str) -> Result<RGB8, ValueErrorKind>;

    /// Uppercase `RRGGBB` hex, the form DrawingML's `srgbClr` wants.
    fn format_hex(&self, color: RGB8) -> String {
        format!("{:02X}{:02X}{:02X}", color.r, color.g, color.b)
    }
}

/// The default color service, backed by cssparser's `<color>` grammar.
///
/// Handles `#rgb`/`#rrggbb` hex, `rgb()` functional notation, and the CSS
/// named colors.  `currentColor` has no meaning without a cascade, so it is
/// rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct CssColorService;

impl ColorService for CssColorService {
    fn parse_color(&self, spec: &str) -> Result<RGB8, ValueErrorKind> {
        let mut input = ParserInput::new(spec);
        let mut parser = Parser::new(&mut input);

        let color = cssparser::Color::parse(&mut parser)
            .map_err(|_| ValueErrorKind::parse_error("invalid color"))?;

        parser
            .expect_exhausted()
            .map_err(|_| ValueErrorKind::parse_error("invalid color"))?;

        match color {
            cssparser::Color::RGBA(rgba) => Ok(RGB8::new(rgba.red, rgba.green, rgba.blue)),
            cssparser::Color::CurrentColor => Err(ValueErrorKind::value_error(
                "color must not be currentColor",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        let svc = CssColorService;

        assert_eq!(svc.parse_color("#ff0000").unwrap(), RGB8::new(255, 0, 0));
        assert_eq!(svc.parse_color("#0f8").unwrap(), RGB8::new(0, 255, 136));
    }

    #[test]
    fn parses_functional_and_named_colors() {
        let svc = CssColorService;

        assert_eq!(
            svc.parse_color("rgb(128, 64, 32)").unwrap(),
            RGB8::new(128, 64, 32)
        );
        assert_eq!(svc.parse_color("lime").unwrap(), RGB8::new(0, 255, 0));
    }

    #[test]
    fn rejects_garbage() {
        let svc = CssColorService;

        assert!(svc.parse_color("").is_err());
        assert!(svc.parse_color("#xyz").is_err());
        assert!(svc.parse_color("currentColor").is_err());
        assert!(svc.parse_color("red green").is_err());
    }

    #[test]
    fn formats_uppercase_hex() {
        let svc = CssColorService;

        assert_eq!(svc.format_hex(RGB8::new(255, 0, 170)), "FF00AA");
        assert_eq!(svc.format_hex(RGB8::new(0, 0, 0)), "000000");
    }
}
