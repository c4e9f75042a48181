use minemesh_core::Direction;
use minemesh_world::{BlockState, FaceProperties, Fluid, Transparency};

use crate::face_culling::covers;

/// Visibility of one fluid face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FluidCull {
    /// Hidden; no quad is emitted.
    Culled,
    /// Drawn with the flowing texture.
    Visible,
    /// Drawn against a see-through neighbour, with the overlay texture if the
    /// fluid has one.
    Overlay,
}

impl FluidCull {
    /// True unless the face is culled.
    #[inline]
    pub fn is_visible(self) -> bool {
        self != FluidCull::Culled
    }
}

/// Classify the fluid face pointing `direction`.
///
/// `height` is the fluid surface height of the face; side faces only need to
/// be covered up to it.
pub fn can_fluid_cull(
    neighbour: Option<&BlockState>,
    direction: Direction,
    fluid: &dyn Fluid,
    height: f32,
) -> FluidCull {
    if fluid.matches(neighbour) {
        return FluidCull::Culled;
    }
    let Some(side) = neighbour.and_then(|neighbour| neighbour.cull_side(direction.inverse())) else {
        return FluidCull::Visible;
    };
    let face = if direction.is_horizontal() {
        FaceProperties::new([0.0, 0.0], [1.0, height], Transparency::Opaque)
    } else {
        FaceProperties::full(Transparency::Opaque)
    };
    if !covers(side, &face) {
        return FluidCull::Visible;
    }
    if side.transparency() == Some(Transparency::Opaque) {
        FluidCull::Culled
    } else {
        FluidCull::Overlay
    }
}
