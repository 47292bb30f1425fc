//! Processing limits, mostly to mitigate malicious SVG documents.

/// Maximum number of entries in a `tableValues` attribute.
///
/// Longer lists are rejected at parse time and the transfer function falls
/// back to identity.
pub const MAX_TABLE_VALUES: usize = 256;

/// Maximum nesting depth of `g`/`svg` elements the group converter follows.
pub const MAX_GROUP_DEPTH: usize = 64;

/// Maximum number of attributes loaded per element; the rest are dropped.
pub const MAX_LOADED_ATTRIBUTES: usize = u16::MAX as usize;
