//! Translate SVG documents into OOXML DrawingML fragments.
//!
//! This crate converts an SVG element tree into the DrawingML vocabulary
//! that PowerPoint uses for shapes and effects, for embedding into a PPTX
//! package by a separate packaging stage.  It bridges two incompatible
//! models: SVG's continuous user-space coordinates and per-pixel filter
//! graph on one side, and PowerPoint's integer EMU geometry and fixed,
//! small set of native color effects on the other.
//!
//! The main pieces are:
//!
//! * An affine [`Transform`] engine and a per-document [`CoordinateSystem`]
//!   that maps the root view box onto an EMU canvas.
//! * A [`ConverterRegistry`] that dispatches each element to the first
//!   registered converter claiming it, in document order; fragment order is
//!   the paint order of the slide.
//! * A filter-mapping engine that classifies `feComponentTransfer` transfer
//!   functions and emits the closest native effect (`biLevel`, `duotone`,
//!   `grayscl`, `gamma`), falling back to a placeholder when no native
//!   mapping exists.
//!
//! A malformed element never fails the document: it is skipped with a log
//! line while its siblings keep converting.  Only a structurally unusable
//! root (no usable viewport) aborts a conversion.
//!
//! # Example
//!
//! ```
//! use svg2pptx::{convert_str, CanvasGeometry};
//!
//! let svg = r##"<svg viewBox="0 0 100 100">
//!                <rect x="0" y="0" width="100" height="100" fill="#ff0000"/>
//!              </svg>"##;
//!
//! let conversion = convert_str(svg, CanvasGeometry::default()).unwrap();
//! assert_eq!(conversion.fragments.len(), 1);
//! assert!(conversion.drawingml().contains("<a:prstGeom prst=\"rect\">"));
//! ```
//!
//! Set the `SVG2PPTX_LOG` environment variable to get a log of skipped
//! elements and degraded attributes on stdout.

#![allow(clippy::too_many_arguments)]

pub use crate::api::*;

mod api;

pub mod angle;
pub mod color;
pub mod context;
pub mod converters;
pub mod coord;
pub mod document;
pub mod drawingml;
pub mod element;
pub mod error;
pub mod filters;
mod limits;
#[macro_use]
mod log;
pub mod node;
pub mod parsers;
pub mod rect;
pub mod registry;
pub mod session;
pub mod transform;
pub mod viewbox;
pub mod xml;

pub use crate::context::{ConversionContext, ResourceNeed, Services};
pub use crate::coord::{Axis, CanvasGeometry, CoordinateSystem};
pub use crate::document::Document;
pub use crate::error::{ConversionError, ElementError, FilterError, ValueErrorKind};
pub use crate::registry::{ConverterRegistry, ElementConverter};
pub use crate::session::Session;
pub use crate::transform::{Transform, TransformBuilder};
