//! Animation Primitives - Surface-Agnostic Flap Transitions
//!
//! This module describes a glyph transition geometrically, independent of
//! any specific rendering surface. The animator drives these primitives and
//! surfaces translate the resulting [`FlapFrame`]s into their own drawing
//! operations.
//!
//! ```text
//! CharacterAnimator (owns TransitionClock + FlapGeometry)
//!     │
//!     ├─→ TUI Surface (block-element flaps in a 3x3 cell tile)
//!     └─→ Test Surface (records every frame)
//! ```

mod geometry;
mod timing;

pub use geometry::{
    FlapFrame, FlapGeometry, FlapPart, FlapPhase, PartGeometry, StepProp, POSITION_FLOOR,
};
pub use timing::{EasingFunction, TransitionClock};
