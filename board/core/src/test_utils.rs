//! Test Utilities
//!
//! A [`RecordingSurface`] that keeps the visual state of every container in
//! memory and logs each surface call, so boards can be driven and inspected
//! without a terminal.
//!
//! # Usage
//!
//! ```ignore
//! use flightboard_core::test_utils::RecordingSurface;
//!
//! let mut board = FlightBoard::with_seed(RecordingSurface::new(), 7);
//! board.attach(container, config)?;
//! assert_eq!(board.surface().text(container).as_deref(), Some("AB"));
//! ```

use std::collections::HashMap;

use crate::animation::FlapFrame;
use crate::surface::{ContainerId, TileStyle, TileSurface};

/// One recorded surface call
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// `render_static`
    RenderStatic {
        /// Target container
        container: ContainerId,
        /// Offsets of every tile
        offsets: Vec<u32>,
    },
    /// `set_static_offset`
    SetStatic {
        /// Target container
        container: ContainerId,
        /// Tile position
        position: usize,
        /// New sprite offset
        offset: u32,
    },
    /// `show_overlay`
    ShowOverlay {
        /// Target container
        container: ContainerId,
        /// Tile position
        position: usize,
        /// Screen position of the overlay
        origin: (i32, i32),
    },
    /// `update_overlay`
    UpdateOverlay {
        /// Target container
        container: ContainerId,
        /// Tile position
        position: usize,
    },
    /// `remove_overlay`
    RemoveOverlay {
        /// Target container
        container: ContainerId,
        /// Tile position
        position: usize,
    },
    /// `clear`
    Clear {
        /// Target container
        container: ContainerId,
    },
}

#[derive(Debug, Default)]
struct ContainerVisuals {
    style: Option<TileStyle>,
    tiles: Vec<u32>,
    overlays: HashMap<usize, ((i32, i32), FlapFrame)>,
}

/// In-memory surface that records every call
#[derive(Debug, Default)]
pub struct RecordingSurface {
    origins: HashMap<ContainerId, (i32, i32)>,
    containers: HashMap<ContainerId, ContainerVisuals>,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Create an empty surface
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a container at a screen position
    pub fn set_origin(&mut self, container: ContainerId, origin: (i32, i32)) {
        self.origins.insert(container, origin);
    }

    /// Every call made so far
    #[must_use]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Forget recorded calls (visual state is kept)
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Static tile offsets of a container
    #[must_use]
    pub fn static_offsets(&self, container: ContainerId) -> Option<&[u32]> {
        self.containers
            .get(&container)
            .map(|visuals| visuals.tiles.as_slice())
    }

    /// Static offset of one tile
    #[must_use]
    pub fn static_offset(&self, container: ContainerId, position: usize) -> Option<u32> {
        self.containers
            .get(&container)
            .and_then(|visuals| visuals.tiles.get(position).copied())
    }

    /// Text spelled by the static tiles
    #[must_use]
    pub fn text(&self, container: ContainerId) -> Option<String> {
        let visuals = self.containers.get(&container)?;
        let style = visuals.style.as_ref()?;
        Some(
            visuals
                .tiles
                .iter()
                .map(|&offset| style.glyph_for_offset(offset))
                .collect(),
        )
    }

    /// Latest frame of an overlay tile
    #[must_use]
    pub fn overlay(&self, container: ContainerId, position: usize) -> Option<&FlapFrame> {
        self.containers
            .get(&container)
            .and_then(|visuals| visuals.overlays.get(&position))
            .map(|(_, frame)| frame)
    }

    /// Screen position of an overlay tile
    #[must_use]
    pub fn overlay_origin(&self, container: ContainerId, position: usize) -> Option<(i32, i32)> {
        self.containers
            .get(&container)
            .and_then(|visuals| visuals.overlays.get(&position))
            .map(|(origin, _)| *origin)
    }

    /// Whether a tile currently has an overlay
    #[must_use]
    pub fn has_overlay(&self, container: ContainerId, position: usize) -> bool {
        self.overlay(container, position).is_some()
    }

    /// Number of overlays shown for a container
    #[must_use]
    pub fn overlay_count(&self, container: ContainerId) -> usize {
        self.containers
            .get(&container)
            .map_or(0, |visuals| visuals.overlays.len())
    }

    /// Whether anything is drawn for a container
    #[must_use]
    pub fn is_rendered(&self, container: ContainerId) -> bool {
        self.containers.contains_key(&container)
    }
}

impl TileSurface for RecordingSurface {
    fn origin(&self, container: ContainerId) -> (i32, i32) {
        self.origins.get(&container).copied().unwrap_or((0, 0))
    }

    fn render_static(&mut self, container: ContainerId, style: &TileStyle, offsets: &[u32]) {
        let visuals = self.containers.entry(container).or_default();
        visuals.style = Some(style.clone());
        visuals.tiles = offsets.to_vec();
        self.ops.push(SurfaceOp::RenderStatic {
            container,
            offsets: offsets.to_vec(),
        });
    }

    fn set_static_offset(&mut self, container: ContainerId, position: usize, offset: u32) {
        if let Some(tile) = self
            .containers
            .get_mut(&container)
            .and_then(|visuals| visuals.tiles.get_mut(position))
        {
            *tile = offset;
        }
        self.ops.push(SurfaceOp::SetStatic {
            container,
            position,
            offset,
        });
    }

    fn show_overlay(
        &mut self,
        container: ContainerId,
        position: usize,
        origin: (i32, i32),
        frame: &FlapFrame,
    ) {
        self.containers
            .entry(container)
            .or_default()
            .overlays
            .insert(position, (origin, frame.clone()));
        self.ops.push(SurfaceOp::ShowOverlay {
            container,
            position,
            origin,
        });
    }

    fn update_overlay(&mut self, container: ContainerId, position: usize, frame: &FlapFrame) {
        if let Some((_, current)) = self
            .containers
            .get_mut(&container)
            .and_then(|visuals| visuals.overlays.get_mut(&position))
        {
            *current = frame.clone();
        }
        self.ops.push(SurfaceOp::UpdateOverlay {
            container,
            position,
        });
    }

    fn remove_overlay(&mut self, container: ContainerId, position: usize) {
        if let Some(visuals) = self.containers.get_mut(&container) {
            visuals.overlays.remove(&position);
        }
        self.ops.push(SurfaceOp::RemoveOverlay {
            container,
            position,
        });
    }

    fn clear(&mut self, container: ContainerId) {
        self.containers.remove(&container);
        self.ops.push(SurfaceOp::Clear { container });
    }
}
