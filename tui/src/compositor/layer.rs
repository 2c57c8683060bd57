//! Layer - A single compositable layer

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::LayerId;

/// A single layer in the compositor
pub struct Layer {
    /// Unique identifier
    pub id: LayerId,
    /// Z-order (higher = in front)
    pub z_index: i32,
    /// Position and size
    pub bounds: Rect,
    /// The layer's render buffer
    pub buffer: Buffer,
}

impl Layer {
    /// Create a new layer
    pub fn new(id: LayerId, bounds: Rect, z_index: i32) -> Self {
        // Buffer uses origin coordinates (0,0) internally
        let buffer_area = Rect::new(0, 0, bounds.width, bounds.height);
        Self {
            id,
            z_index,
            bounds,
            buffer: Buffer::empty(buffer_area),
        }
    }

    /// Reallocate the buffer for new bounds
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.buffer = Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height));
    }

    /// Whether a cell lets lower layers show through
    ///
    /// Blank cells without a background are holes; a blank cell with a
    /// background (a flap edge, a tile body) occludes.
    pub fn is_transparent(&self, x: u16, y: u16) -> bool {
        self.buffer
            .cell((x, y))
            .map_or(true, |cell| cell.symbol() == " " && cell.bg == Color::Reset)
    }
}
