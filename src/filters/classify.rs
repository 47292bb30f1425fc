//! Classification of transfer functions into native PowerPoint effects.
//!
//! The classifier inspects one `feComponentTransfer`'s per-channel transfer
//! functions and picks the closest effect PowerPoint can express natively.
//! Patterns are tried in a fixed priority order and the first match wins;
//! when nothing matches, the result is the complex fallback, never an
//! error.
//!
//! The tolerance bands below are deliberate heuristics.  They widen each
//! pattern enough to absorb authoring-tool rounding, and their values are
//! part of the observable classification contract, so tests pin them.

use itertools::Itertools;
use rgb::RGB8;

use super::component_transfer::{ComponentTransferParams, TransferFunction};

/// How far each of two discrete values may sit from {0, 1} and still count
/// as a binary (black/white) split.
pub const BINARY_BAND_TOLERANCE: f64 = 0.1;

/// Minimum separation between two discrete values for a duotone mapping.
pub const DUOTONE_MIN_SEPARATION: f64 = 0.2;

/// Acceptable band for the sum of the three linear slopes of a grayscale
/// luminance mapping (ideally 1.0).
pub const GRAYSCALE_SLOPE_SUM_MIN: f64 = 0.8;
pub const GRAYSCALE_SLOPE_SUM_MAX: f64 = 1.2;

/// Luminance weights put green first; require green ≥ this fraction of the
/// larger of red and blue.
pub const GRAYSCALE_GREEN_DOMINANCE: f64 = 0.8;

/// Exponent range PowerPoint's single gamma knob can plausibly express.
pub const GAMMA_EXPONENT_MIN: f64 = 0.5;
pub const GAMMA_EXPONENT_MAX: f64 = 3.0;

/// Amplitude band for a gamma mapping that is "just" a gamma curve.
pub const GAMMA_AMPLITUDE_MIN: f64 = 0.8;
pub const GAMMA_AMPLITUDE_MAX: f64 = 1.2;

/// Offsets beyond this make a gamma curve something else entirely.
pub const GAMMA_OFFSET_LIMIT: f64 = 0.2;

/// "Approximately one" / "approximately zero" band for slopes.
pub const SLOPE_EPSILON: f64 = 0.1;

/// "Approximately zero" band for intercepts.
pub const INTERCEPT_EPSILON: f64 = 0.1;

/// The native effect chosen for a filter, with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectClassification {
    /// Hard threshold to black/white (`a:biLevel`).
    Binary { threshold: u32, inverted: bool },

    /// Two-color remapping (`a:duotone`).
    Duotone { color1: RGB8, color2: RGB8 },

    /// Luminance mapping (`a:grayscl`); `weights` is `None` for the
    /// single-channel form.
    Grayscale {
        weights: Option<(f64, f64, f64)>,
        inverted: bool,
    },

    /// Gamma correction (`a:gamma` / `a:invGamma`).
    Gamma {
        exponent: f64,
        amplitude: f64,
        offset: f64,
        inverse: bool,
    },

    /// No native mapping; rendered as a placeholder with reduced fidelity.
    Complex { summary: String },
}

impl EffectClassification {
    pub fn name(&self) -> &'static str {
        match self {
            EffectClassification::Binary { .. } => "binary",
            EffectClassification::Duotone { .. } => "duotone",
            EffectClassification::Grayscale { .. } => "grayscale",
            EffectClassification::Gamma { .. } => "gamma",
            EffectClassification::Complex { .. } => "complex",
        }
    }
}

/// Classifies transfer functions, first match in priority order wins.
pub fn classify(params: &ComponentTransferParams) -> EffectClassification {
    if let Some(c) = classify_binary(params) {
        return c;
    }

    if let Some(c) = classify_duotone(params) {
        return c;
    }

    if let Some(c) = classify_grayscale(params) {
        return c;
    }

    if let Some(c) = classify_gamma(params) {
        return c;
    }

    EffectClassification::Complex {
        summary: channel_summary(params),
    }
}

/// Two discrete values sitting at (or near) the extremes.
fn is_binary_pair(values: &[f64]) -> bool {
    if values.len() != 2 {
        return false;
    }

    let lo = values[0].min(values[1]);
    let hi = values[0].max(values[1]);

    lo <= BINARY_BAND_TOLERANCE && hi >= 1.0 - BINARY_BAND_TOLERANCE
}

/// Two distinct discrete values that are not a binary pair.
fn is_duotone_pair(values: &[f64]) -> bool {
    values.len() == 2
        && !is_binary_pair(values)
        && (values[0] - values[1]).abs() > DUOTONE_MIN_SEPARATION
}

/// Applies the single/multi-channel voting rule shared by the binary and
/// duotone patterns: a lone defined RGB channel decides by itself, while
/// two or more defined channels need at least two matching votes.
fn rgb_vote<F: Fn(&TransferFunction) -> bool>(
    params: &ComponentTransferParams,
    matches: F,
) -> bool {
    let defined: Vec<&TransferFunction> = params.rgb().into_iter().flatten().collect();

    match defined.len() {
        0 => false,
        1 => matches(defined[0]),
        _ => defined.iter().filter(|f| matches(f)).count() >= 2,
    }
}

fn discrete_values(f: &TransferFunction) -> Option<&[f64]> {
    match f {
        TransferFunction::Discrete(v) => Some(v),
        _ => None,
    }
}

fn classify_binary(params: &ComponentTransferParams) -> Option<EffectClassification> {
    if !rgb_vote(params, |f| {
        discrete_values(f).map(is_binary_pair).unwrap_or(false)
    }) {
        return None;
    }

    // Threshold and polarity come from the first qualifying channel.
    let qualifying = params
        .rgb()
        .into_iter()
        .flatten()
        .filter_map(discrete_values)
        .find(|v| is_binary_pair(v));

    let (threshold, inverted) = match qualifying {
        Some(v) => {
            let midpoint = (v[0] + v[1]) / 2.0;
            ((midpoint * 100_000.0).round() as u32, v[0] > v[1])
        }
        None => (50_000, false),
    };

    Some(EffectClassification::Binary {
        threshold,
        inverted,
    })
}

fn classify_duotone(params: &ComponentTransferParams) -> Option<EffectClassification> {
    if !rgb_vote(params, |f| {
        discrete_values(f).map(|v| is_duotone_pair(v)).unwrap_or(false)
    }) {
        return None;
    }

    // Each defined discrete channel contributes its index-0 value to the
    // dark pole and index-1 to the light pole; a missing channel spans the
    // full range.
    let component = |f: &Option<TransferFunction>, idx: usize, missing: u8| -> u8 {
        match f.as_ref().and_then(discrete_values) {
            Some(v) if v.len() == 2 => (v[idx].clamp(0.0, 1.0) * 255.0).round() as u8,
            _ => missing,
        }
    };

    let color1 = RGB8::new(
        component(&params.red, 0, 0),
        component(&params.green, 0, 0),
        component(&params.blue, 0, 0),
    );
    let color2 = RGB8::new(
        component(&params.red, 1, 255),
        component(&params.green, 1, 255),
        component(&params.blue, 1, 255),
    );

    Some(EffectClassification::Duotone { color1, color2 })
}

fn linear_params(f: &TransferFunction) -> Option<(f64, f64)> {
    match *f {
        TransferFunction::Linear { slope, intercept } => Some((slope, intercept)),
        _ => None,
    }
}

fn classify_grayscale(params: &ComponentTransferParams) -> Option<EffectClassification> {
    let linears: Vec<Option<(f64, f64)>> = params
        .rgb()
        .into_iter()
        .map(|f| f.as_ref().and_then(linear_params))
        .collect();

    let inverted = linears.iter().flatten().any(|&(slope, intercept)| {
        slope < 0.0 || (intercept > 0.8 && slope < 0.5)
    });

    // Luminance form: all three channels linear, slopes summing to ~1,
    // green dominant as in the standard weights.
    if let (Some((r, _)), Some((g, _)), Some((b, _))) = (linears[0], linears[1], linears[2]) {
        let sum = r.abs() + g.abs() + b.abs();

        if (GRAYSCALE_SLOPE_SUM_MIN..=GRAYSCALE_SLOPE_SUM_MAX).contains(&sum)
            && g.abs() >= GRAYSCALE_GREEN_DOMINANCE * r.abs().max(b.abs())
        {
            return Some(EffectClassification::Grayscale {
                weights: Some((r, g, b)),
                inverted,
            });
        }
    }

    // Single-channel form: one near-unit slope with near-zero intercept,
    // and at least one other channel explicitly zeroed out.
    let defined: Vec<(f64, f64)> = linears.iter().flatten().copied().collect();

    let has_selector = defined.iter().any(|&(slope, intercept)| {
        (GRAYSCALE_SLOPE_SUM_MIN..=GRAYSCALE_SLOPE_SUM_MAX).contains(&slope.abs())
            && intercept.abs() <= INTERCEPT_EPSILON
    });
    let has_zeroed = defined.iter().any(|&(slope, _)| slope.abs() <= SLOPE_EPSILON);
    let exactly_one_selector = defined
        .iter()
        .filter(|&&(slope, intercept)| {
            (GRAYSCALE_SLOPE_SUM_MIN..=GRAYSCALE_SLOPE_SUM_MAX).contains(&slope.abs())
                && intercept.abs() <= INTERCEPT_EPSILON
        })
        .count()
        == 1;

    if has_selector && exactly_one_selector && has_zeroed {
        return Some(EffectClassification::Grayscale {
            weights: None,
            inverted,
        });
    }

    None
}

fn gamma_params(f: &TransferFunction) -> Option<(f64, f64, f64)> {
    match *f {
        TransferFunction::Gamma {
            amplitude,
            exponent,
            offset,
        } => Some((amplitude, exponent, offset)),
        _ => None,
    }
}

fn is_plain_gamma(amplitude: f64, exponent: f64, offset: f64) -> bool {
    (GAMMA_EXPONENT_MIN..=GAMMA_EXPONENT_MAX).contains(&exponent)
        && (GAMMA_AMPLITUDE_MIN..=GAMMA_AMPLITUDE_MAX).contains(&amplitude)
        && offset.abs() < GAMMA_OFFSET_LIMIT
}

fn classify_gamma(params: &ComponentTransferParams) -> Option<EffectClassification> {
    let qualifying: Vec<(f64, f64, f64)> = params
        .rgb()
        .into_iter()
        .flatten()
        .filter_map(gamma_params)
        .filter(|&(a, e, o)| is_plain_gamma(a, e, o))
        .collect();

    if qualifying.len() < 2 {
        return None;
    }

    // PowerPoint exposes one global gamma knob; the first qualifying
    // channel provides the parameters and the rest stay metadata.
    let (amplitude, exponent, offset) = qualifying[0];

    Some(EffectClassification::Gamma {
        exponent,
        amplitude,
        offset,
        inverse: exponent < 1.0,
    })
}

fn function_summary(f: &TransferFunction) -> String {
    match f {
        TransferFunction::Identity => "identity".to_string(),
        TransferFunction::Table(v) => format!("table[{}]", v.len()),
        TransferFunction::Discrete(v) => format!("discrete[{}]", v.len()),
        TransferFunction::Linear { slope, intercept } => {
            format!("linear({}, {})", slope, intercept)
        }
        TransferFunction::Gamma {
            amplitude,
            exponent,
            offset,
        } => format!("gamma({}, {}, {})", amplitude, exponent, offset),
    }
}

fn channel_summary(params: &ComponentTransferParams) -> String {
    let one = |f: &Option<TransferFunction>| match f {
        Some(func) => function_summary(func),
        None => "none".to_string(),
    };

    format!(
        "R={} G={} B={} A={}",
        one(&params.red),
        one(&params.green),
        one(&params.blue),
        one(&params.alpha)
    )
}

fn type_tag(f: &TransferFunction) -> &'static str {
    match f {
        TransferFunction::Identity => "identity",
        TransferFunction::Table(_) => "table",
        TransferFunction::Discrete(_) => "discrete",
        TransferFunction::Linear { .. } => "linear",
        TransferFunction::Gamma { .. } => "gamma",
    }
}

/// Diagnostic complexity score over all defined channels.
///
/// Carried in the filter metadata for observability; branch selection never
/// consults it.
pub fn complexity_score(params: &ComponentTransferParams) -> f64 {
    let mut score = 0.5;

    for f in params.defined() {
        score += match f {
            TransferFunction::Identity => 0.1,
            TransferFunction::Discrete(v) => {
                if v.len() == 2 {
                    0.5
                } else {
                    0.3 * v.len() as f64
                }
            }
            TransferFunction::Linear { .. } => 0.4,
            TransferFunction::Gamma { .. } => 0.6,
            TransferFunction::Table(v) => 0.2 * v.len() as f64,
        };
    }

    if params.defined().map(type_tag).unique().count() > 1 {
        score += 1.0;
    }

    score
}
