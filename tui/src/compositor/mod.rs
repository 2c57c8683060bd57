//! Layered Compositor
//!
//! Manages z-ordered layers for rendering. The board uses three: static
//! tiles at the back, flap overlays above them and the status line on top.
//! Each layer has its own buffer and is composited into one output buffer.

mod layer;

use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

pub use layer::Layer;

/// Unique identifier for a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(u32);

/// The compositor manages all layers and composites them together
pub struct Compositor {
    /// All layers by ID
    layers: HashMap<LayerId, Layer>,
    /// Layers sorted by z-index for rendering
    render_order: Vec<LayerId>,
    /// Next layer ID to assign
    next_id: u32,
    /// Output buffer (composited result)
    output: Buffer,
    /// Total area
    area: Rect,
}

impl Compositor {
    /// Create a new compositor for the given area
    pub fn new(area: Rect) -> Self {
        Self {
            layers: HashMap::new(),
            render_order: Vec::new(),
            next_id: 0,
            output: Buffer::empty(area),
            area,
        }
    }

    /// Create a new layer and return its ID
    pub fn create_layer(&mut self, bounds: Rect, z_index: i32) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        self.layers.insert(id, Layer::new(id, bounds, z_index));
        self.update_render_order();

        id
    }

    /// Get mutable access to a layer's buffer for rendering
    pub fn layer_buffer_mut(&mut self, id: LayerId) -> Option<&mut Buffer> {
        self.layers.get_mut(&id).map(|l| &mut l.buffer)
    }

    /// Move and resize a layer
    pub fn set_layer_bounds(&mut self, id: LayerId, bounds: Rect) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.set_bounds(bounds);
        }
    }

    /// Resize the entire compositor
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.output = Buffer::empty(area);
    }

    /// Composite all layers into the output buffer
    pub fn composite(&mut self) -> &Buffer {
        self.output.reset();

        // Back to front
        for id in &self.render_order {
            if let Some(layer) = self.layers.get(id) {
                Self::blit_layer(&mut self.output, self.area, layer);
            }
        }

        &self.output
    }

    /// Blit a layer onto the output buffer, skipping transparent cells
    fn blit_layer(output: &mut Buffer, area: Rect, layer: &Layer) {
        let lb = layer.bounds;

        for ly in 0..lb.height {
            for lx in 0..lb.width {
                let dst_x = lb.x.saturating_add(lx);
                let dst_y = lb.y.saturating_add(ly);
                if dst_x >= area.width || dst_y >= area.height {
                    continue;
                }
                if layer.is_transparent(lx, ly) {
                    continue;
                }

                if let (Some(src), Some(dst)) =
                    (layer.buffer.cell((lx, ly)), output.cell_mut((dst_x, dst_y)))
                {
                    *dst = src.clone();
                }
            }
        }
    }

    /// Update render order based on z-indices
    fn update_render_order(&mut self) {
        self.render_order = self.layers.keys().copied().collect();
        self.render_order
            .sort_by_key(|id| self.layers.get(id).map_or(0, |l| l.z_index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Style;

    #[test]
    fn test_front_layer_occludes_back_layer() {
        let mut compositor = Compositor::new(Rect::new(0, 0, 4, 1));
        let back = compositor.create_layer(Rect::new(0, 0, 4, 1), 0);
        let front = compositor.create_layer(Rect::new(1, 0, 2, 1), 10);

        compositor
            .layer_buffer_mut(back)
            .unwrap()
            .set_string(0, 0, "abcd", Style::default());
        compositor
            .layer_buffer_mut(front)
            .unwrap()
            .set_string(0, 0, "X", Style::default());

        let output = compositor.composite();
        let row: String = (0..4)
            .map(|x| output.cell((x, 0)).unwrap().symbol().to_string())
            .collect();
        // Second front cell is a hole
        assert_eq!(row, "aXcd");
    }

    #[test]
    fn test_layers_clip_to_area() {
        let mut compositor = Compositor::new(Rect::new(0, 0, 2, 1));
        let layer = compositor.create_layer(Rect::new(1, 0, 3, 1), 0);
        compositor
            .layer_buffer_mut(layer)
            .unwrap()
            .set_string(0, 0, "xyz", Style::default());

        let output = compositor.composite();
        assert_eq!(output.cell((1, 0)).unwrap().symbol(), "x");
    }
}
