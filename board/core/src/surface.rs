//! Rendering Surface Abstraction
//!
//! The board renders through a [`TileSurface`]: every tile is one
//! rectangular region whose visible content is selected by a sprite offset
//! into a fixed strip of glyphs. Surfaces decide what a "sprite sheet" is:
//! an image on a canvas, block characters in a terminal, or a recording in
//! tests.

use std::fmt;

use crate::animation::FlapFrame;
use crate::config::BoardConfig;

/// Identifies the container a board is attached to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

impl ContainerId {
    /// Wrap a host-provided container handle
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw handle
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fb{}", self.0)
    }
}

/// Shading settings carried by a tile style
#[derive(Clone, Debug, PartialEq)]
pub struct Shading {
    /// Peak opacity of highlight and shadow
    pub opacity: f32,
    /// Highlight image for surfaces without opacity support
    pub highlight_image: String,
    /// Shadow image for surfaces without opacity support
    pub shadow_image: String,
}

/// Everything a surface needs to draw a board's tiles
#[derive(Clone, Debug, PartialEq)]
pub struct TileStyle {
    /// Sprite sheet reference
    pub image: String,
    /// Glyphs in sprite sheet order (offset / width indexes into this)
    pub strip: String,
    /// Tile width in board units
    pub width: u32,
    /// Tile height in board units
    pub height: u32,
    /// Shading overlays, when enabled
    pub shading: Option<Shading>,
}

impl TileStyle {
    /// Derive the style from a board configuration
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            image: config.letters_image.clone(),
            strip: config.letters_seq.clone(),
            width: config.tile_width(),
            height: config.tile_height(),
            shading: config.shading.then(|| Shading {
                opacity: config.opacity,
                highlight_image: config.shading_images[0].clone(),
                shadow_image: config.shading_images[1].clone(),
            }),
        }
    }

    /// Glyph selected by a sprite offset (blank when out of range)
    #[must_use]
    pub fn glyph_for_offset(&self, offset: u32) -> char {
        let index = (offset / self.width.max(1)) as usize;
        self.strip
            .chars()
            .nth(index)
            .or_else(|| self.strip.chars().next())
            .unwrap_or(' ')
    }
}

/// Host rendering surface for boards
///
/// Coordinates are board units (the unit of `lettersSize`).
pub trait TileSurface {
    /// Screen offset of the container's first tile
    fn origin(&self, container: ContainerId) -> (i32, i32);

    /// Lay out one static tile per offset, replacing previous content
    fn render_static(&mut self, container: ContainerId, style: &TileStyle, offsets: &[u32]);

    /// Change the glyph a static tile shows
    fn set_static_offset(&mut self, container: ContainerId, position: usize, offset: u32);

    /// Place an overlay tile at a screen position
    fn show_overlay(
        &mut self,
        container: ContainerId,
        position: usize,
        origin: (i32, i32),
        frame: &FlapFrame,
    );

    /// Redraw an overlay tile
    fn update_overlay(&mut self, container: ContainerId, position: usize, frame: &FlapFrame);

    /// Remove an overlay tile
    fn remove_overlay(&mut self, container: ContainerId, position: usize);

    /// Remove every visual belonging to the container
    fn clear(&mut self, container: ContainerId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_from_config() {
        let config = BoardConfig::default();
        let style = TileStyle::from_config(&config);

        assert_eq!(style.width, 25);
        assert_eq!(style.height, 34);
        assert_eq!(style.image, "img/flightBoardLarge.png");
        let shading = style.shading.unwrap();
        assert_eq!(shading.opacity, 0.5);
        assert_eq!(shading.shadow_image, "img/flightBoardShad.png");
    }

    #[test]
    fn test_style_without_shading() {
        let config = BoardConfig::default().with_shading(false);
        assert!(TileStyle::from_config(&config).shading.is_none());
    }

    #[test]
    fn test_glyph_for_offset() {
        let style = TileStyle::from_config(&BoardConfig::default());
        assert_eq!(style.glyph_for_offset(0), ' ');
        assert_eq!(style.glyph_for_offset(25), 'A');
        assert_eq!(style.glyph_for_offset(50), 'B');
        assert_eq!(style.glyph_for_offset(25 * 1000), ' ');
    }

    #[test]
    fn test_container_display() {
        assert_eq!(ContainerId::new(42).to_string(), "fb42");
    }
}
