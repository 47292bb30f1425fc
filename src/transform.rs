//! Affine transformations, and parsing of `transform` attribute values.
//!
//! Composition follows [SVG semantics][transform-attr]: in a transform
//! list, the transform written last is applied to a point first.
//!
//! [transform-attr]: https://www.w3.org/TR/SVG11/coords.html#TransformAttribute

use cssparser::{Parser, Token};

use crate::angle::Angle;
use crate::error::*;
use crate::parsers::{optional_comma, Parse};
use crate::rect::Rect;

/// Determinants smaller than this are treated as singular.
const DETERMINANT_EPSILON: f64 = 1e-12;

/// A 2D affine transform.
///
/// Maps `(x, y)` to `(xx·x + xy·y + x0, yx·x + yy·y + y0)`; `(xx, yx, xy,
/// yy, x0, y0)` are the `(a, b, c, d, e, f)` of the SVG `matrix()` form.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub xx: f64,
    pub yx: f64,
    pub xy: f64,
    pub yy: f64,
    pub x0: f64,
    pub y0: f64,
}

impl Transform {
    #[inline]
    pub fn new_unchecked(xx: f64, yx: f64, xy: f64, yy: f64, x0: f64, y0: f64) -> Self {
        Self {
            xx,
            xy,
            x0,
            yx,
            yy,
            y0,
        }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new_unchecked(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    #[inline]
    pub fn new_translate(tx: f64, ty: f64) -> Self {
        Self::new_unchecked(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[inline]
    pub fn new_scale(sx: f64, sy: f64) -> Self {
        Self::new_unchecked(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    #[inline]
    pub fn new_rotate(a: Angle) -> Self {
        let (s, c) = a.radians().sin_cos();
        Self::new_unchecked(c, s, -s, c, 0.0, 0.0)
    }

    /// Rotation about the point `(cx, cy)`, like SVG's `rotate(a cx cy)`.
    #[inline]
    pub fn new_rotate_about(a: Angle, cx: f64, cy: f64) -> Self {
        Transform::new_translate(cx, cy)
            .pre_rotate(a)
            .pre_translate(-cx, -cy)
    }

    #[inline]
    pub fn new_skew(ax: Angle, ay: Angle) -> Self {
        Self::new_unchecked(1.0, ay.radians().tan(), ax.radians().tan(), 1.0, 0.0, 0.0)
    }

    /// Matrix product; `t1` is applied to a point first, then `t2`.
    #[must_use]
    pub fn multiply(t1: &Transform, t2: &Transform) -> Self {
        Transform {
            xx: t1.xx * t2.xx + t1.yx * t2.xy,
            yx: t1.xx * t2.yx + t1.yx * t2.yy,
            xy: t1.xy * t2.xx + t1.yy * t2.xy,
            yy: t1.xy * t2.yx + t1.yy * t2.yy,
            x0: t1.x0 * t2.xx + t1.y0 * t2.xy + t2.x0,
            y0: t1.x0 * t2.yx + t1.y0 * t2.yy + t2.y0,
        }
    }

    /// Function composition: `a.compose(&b)` is `a ∘ b`, which applies `b`
    /// to a point first.
    ///
    /// `a.compose(&b).transform_point(x, y) ==
    /// a.transform_point(b.transform_point(x, y))`.
    #[inline]
    #[must_use]
    pub fn compose(&self, other: &Transform) -> Self {
        self.pre_transform(other)
    }

    /// Folds a sequence of transforms in SVG transform-list order.
    ///
    /// The result equals `ts[0].compose(&ts[1]).compose(&ts[2])…`; a point
    /// goes through the last transform in the slice first, exactly as if
    /// the list had been written in a `transform` attribute.
    pub fn compose_sequence(ts: &[Transform]) -> Self {
        ts.iter().fold(Transform::identity(), |acc, t| acc.compose(t))
    }

    #[inline]
    pub fn pre_transform(&self, t: &Transform) -> Self {
        Self::multiply(t, self)
    }

    #[inline]
    pub fn post_transform(&self, t: &Transform) -> Self {
        Self::multiply(self, t)
    }

    #[inline]
    pub fn pre_translate(&self, x: f64, y: f64) -> Self {
        self.pre_transform(&Transform::new_translate(x, y))
    }

    #[inline]
    pub fn pre_scale(&self, sx: f64, sy: f64) -> Self {
        self.pre_transform(&Transform::new_scale(sx, sy))
    }

    #[inline]
    pub fn pre_rotate(&self, angle: Angle) -> Self {
        self.pre_transform(&Transform::new_rotate(angle))
    }

    #[inline]
    fn determinant(&self) -> f64 {
        self.xx * self.yy - self.xy * self.yx
    }

    #[inline]
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();

        det.is_finite() && det.abs() > DETERMINANT_EPSILON
    }

    /// Inverts the transform, or fails with
    /// [`ConversionError::NonInvertibleTransform`] when the determinant is
    /// (close to) zero or not finite.
    pub fn invert(&self) -> Result<Self, ConversionError> {
        let det = self.determinant();

        if !det.is_finite() || det.abs() <= DETERMINANT_EPSILON {
            return Err(ConversionError::NonInvertibleTransform);
        }

        let inv_det = 1.0 / det;

        Ok(Transform::new_unchecked(
            inv_det * self.yy,
            inv_det * (-self.yx),
            inv_det * (-self.xy),
            inv_det * self.xx,
            inv_det * (self.xy * self.y0 - self.yy * self.x0),
            inv_det * (self.yx * self.x0 - self.xx * self.y0),
        ))
    }

    #[inline]
    pub fn transform_distance(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx * self.xx + dy * self.xy, dx * self.yx + dy * self.yy)
    }

    #[inline]
    pub fn transform_point(&self, px: f64, py: f64) -> (f64, f64) {
        let (x, y) = self.transform_distance(px, py);
        (x + self.x0, y + self.y0)
    }

    /// Transforms every point in the slice.
    ///
    /// Equivalent, index by index, to calling [`Self::transform_point`] on
    /// each element; there are no inter-element dependencies.
    pub fn transform_points(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points
            .iter()
            .map(|&(x, y)| self.transform_point(x, y))
            .collect()
    }

    /// Axis-aligned bounding box of the transformed rectangle corners.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let points = [
            self.transform_point(rect.x0, rect.y0),
            self.transform_point(rect.x1, rect.y0),
            self.transform_point(rect.x0, rect.y1),
            self.transform_point(rect.x1, rect.y1),
        ];

        let (mut xmin, mut ymin, mut xmax, mut ymax) = {
            let (x, y) = points[0];

            (x, y, x, y)
        };

        for &(x, y) in points.iter().skip(1) {
            if x < xmin {
                xmin = x;
            }

            if x > xmax {
                xmax = x;
            }

            if y < ymin {
                ymin = y;
            }

            if y > ymax {
                ymax = y;
            }
        }

        Rect {
            x0: xmin,
            y0: ymin,
            x1: xmax,
            y1: ymax,
        }
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Transform {
        Transform::identity()
    }
}

/// Builds a transform by chaining operations in transform-list order.
///
/// `TransformBuilder::new().translate(20.0, 30.0).scale(10.0, 10.0).build()`
/// equals parsing `"translate(20 30) scale(10)"`, and equals the manual
/// fold `identity.compose(&translate).compose(&scale)`.
#[derive(Debug, Default, Clone)]
pub struct TransformBuilder {
    t: Transform,
}

impl TransformBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn transform(mut self, t: Transform) -> Self {
        self.t = self.t.compose(&t);
        self
    }

    #[must_use]
    pub fn translate(self, tx: f64, ty: f64) -> Self {
        self.transform(Transform::new_translate(tx, ty))
    }

    #[must_use]
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.transform(Transform::new_scale(sx, sy))
    }

    /// Uniform scale, like the one-argument SVG `scale()` form.
    #[must_use]
    pub fn uniform_scale(self, s: f64) -> Self {
        self.scale(s, s)
    }

    #[must_use]
    pub fn rotate(self, a: Angle) -> Self {
        self.transform(Transform::new_rotate(a))
    }

    #[must_use]
    pub fn rotate_about(self, a: Angle, cx: f64, cy: f64) -> Self {
        self.transform(Transform::new_rotate_about(a, cx, cy))
    }

    #[must_use]
    pub fn skew_x(self, a: Angle) -> Self {
        self.transform(Transform::new_skew(a, Angle::new(0.0)))
    }

    #[must_use]
    pub fn skew_y(self, a: Angle) -> Self {
        self.transform(Transform::new_skew(Angle::new(0.0), a))
    }

    pub fn build(self) -> Transform {
        self.t
    }
}

impl Parse for Transform {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
        parse_transform_list(parser)
    }
}

fn parse_transform_list<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
    let mut t = Transform::identity();

    loop {
        if parser.is_exhausted() {
            break;
        }

        t = parse_transform_command(parser)?.post_transform(&t);
        optional_comma(parser);
    }

    Ok(t)
}

fn parse_transform_command<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
    let loc = parser.current_source_location();

    match parser.next()?.clone() {
        Token::Function(ref name) => parse_transform_function(name, parser),

        Token::Ident(ref name) => {
            parser.expect_parenthesis_block()?;
            parse_transform_function(name, parser)
        }

        tok => Err(loc.new_unexpected_token_error(tok.clone())),
    }
}

fn parse_transform_function<'i>(
    name: &str,
    parser: &mut Parser<'i, '_>,
) -> Result<Transform, ParseError<'i>> {
    let loc = parser.current_source_location();

    match name {
        "matrix" => parse_matrix_args(parser),
        "translate" => parse_translate_args(parser),
        "scale" => parse_scale_args(parser),
        "rotate" => parse_rotate_args(parser),
        "skewX" => parse_skew_x_args(parser),
        "skewY" => parse_skew_y_args(parser),
        _ => Err(loc.new_custom_error(ValueErrorKind::parse_error(
            "expected matrix|translate|scale|rotate|skewX|skewY",
        ))),
    }
}

fn parse_matrix_args<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
    parser.parse_nested_block(|p| {
        let xx = f64::parse(p)?;
        optional_comma(p);

        let yx = f64::parse(p)?;
        optional_comma(p);

        let xy = f64::parse(p)?;
        optional_comma(p);

        let yy = f64::parse(p)?;
        optional_comma(p);

        let x0 = f64::parse(p)?;
        optional_comma(p);

        let y0 = f64::parse(p)?;

        Ok(Transform::new_unchecked(xx, yx, xy, yy, x0, y0))
    })
}

fn parse_translate_args<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
    parser.parse_nested_block(|p| {
        let tx = f64::parse(p)?;

        let ty = p
            .try_parse(|p| {
                optional_comma(p);
                f64::parse(p)
            })
            .unwrap_or(0.0);

        Ok(Transform::new_translate(tx, ty))
    })
}

fn parse_scale_args<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
    parser.parse_nested_block(|p| {
        let x = f64::parse(p)?;

        let y = p
            .try_parse(|p| {
                optional_comma(p);
                f64::parse(p)
            })
            .unwrap_or(x);

        Ok(Transform::new_scale(x, y))
    })
}

fn parse_rotate_args<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
    parser.parse_nested_block(|p| {
        let angle = Angle::from_degrees(f64::parse(p)?);

        let (tx, ty) = p
            .try_parse(|p| -> Result<_, ParseError<'i>> {
                optional_comma(p);
                let tx = f64::parse(p)?;

                optional_comma(p);
                let ty = f64::parse(p)?;

                Ok((tx, ty))
            })
            .unwrap_or((0.0, 0.0));

        Ok(Transform::new_rotate_about(angle, tx, ty))
    })
}

fn parse_skew_x_args<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
    parser.parse_nested_block(|p| {
        let angle = Angle::from_degrees(f64::parse(p)?);
        Ok(Transform::new_skew(angle, Angle::new(0.0)))
    })
}

fn parse_skew_y_args<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
    parser.parse_nested_block(|p| {
        let angle = Angle::from_degrees(f64::parse(p)?);
        Ok(Transform::new_skew(Angle::new(0.0), angle))
    })
}
