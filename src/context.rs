//! Per-document conversion state.

use std::sync::Arc;

use crate::color::{ColorService, CssColorService};
use crate::coord::CoordinateSystem;
use crate::session::Session;
use crate::transform::Transform;

/// Collaborator services injected into a conversion.
///
/// Constructed once per `convert()` call and threaded through the context;
/// there are no process-wide singletons.
#[derive(Clone)]
pub struct Services {
    pub color: Arc<dyn ColorService>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            color: Arc::new(CssColorService),
        }
    }
}

/// A resource the emitted slide will need from the packaging stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceNeed {
    Font(String),
}

/// Explicit state bundle for one document conversion.
///
/// Exclusively owns the coordinate system, accumulates output fragments in
/// document order, and carries the session and services so that no callee
/// needs global state.  Created per `convert()` call and discarded after.
pub struct ConversionContext {
    pub session: Session,
    pub coords: CoordinateSystem,
    pub services: Services,

    /// Accumulated transform of the enclosing groups.
    pub current_transform: Transform,

    /// Nesting depth of the group being converted.
    pub group_depth: usize,

    fragments: Vec<String>,
    resources: Vec<ResourceNeed>,
    next_shape_id: u32,
}

impl ConversionContext {
    pub fn new(session: Session, coords: CoordinateSystem, services: Services) -> Self {
        Self {
            session,
            coords,
            services,
            current_transform: Transform::identity(),
            group_depth: 0,
            fragments: Vec::new(),
            resources: Vec::new(),
            // id 1 is conventionally the slide's group container
            next_shape_id: 2,
        }
    }

    /// Allocates the next `cNvPr` shape id.
    pub fn next_shape_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    /// Appends an output fragment; order of calls is paint order.
    pub fn push_fragment(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    pub fn declare_resource(&mut self, need: ResourceNeed) {
        if !self.resources.contains(&need) {
            self.resources.push(need);
        }
    }

    pub fn into_output(self) -> (Vec<String>, Vec<ResourceNeed>) {
        (self.fragments, self.resources)
    }
}
