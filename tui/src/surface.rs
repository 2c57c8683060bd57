//! Terminal Tile Surface
//!
//! Draws boards with block characters. Each tile is a `3 x 3` cell card:
//!
//! ```text
//!  ▄▄▄   top flap edge
//!   A    glyph row
//!  ▀▀▀   bottom flap edge
//! ```
//!
//! Static tiles and flap overlays are kept as plain state and painted into
//! two compositor layers, overlays in front.

use std::collections::{BTreeMap, HashMap};

use flightboard_core::{ContainerId, FlapFrame, FlapPhase, TileStyle, TileSurface};
use ratatui::buffer::Buffer;
use ratatui::style::Style;

use crate::theme;

/// Tile width in cells
pub const TILE_COLS: u16 = 3;
/// Tile height in cells
pub const TILE_ROWS: u16 = 3;
/// Blank columns between tiles
pub const TILE_GAP: u16 = 1;

/// Lower block eighths up to the half block a settled top edge shows
const TOP_RAMP: [&str; 5] = [" ", "▁", "▂", "▃", "▄"];

/// Cells needed to draw `tiles` tiles side by side
#[must_use]
pub fn board_width(tiles: usize) -> u16 {
    let tiles = u16::try_from(tiles).unwrap_or(u16::MAX);
    tiles
        .saturating_mul(TILE_COLS + TILE_GAP)
        .saturating_sub(TILE_GAP)
}

#[derive(Debug)]
struct BoardTiles {
    style: TileStyle,
    offsets: Vec<u32>,
    overlays: BTreeMap<usize, FlapFrame>,
}

/// [`TileSurface`] over terminal cells
#[derive(Debug, Default)]
pub struct TerminalSurface {
    anchors: HashMap<ContainerId, (u16, u16)>,
    boards: BTreeMap<ContainerId, BoardTiles>,
}

impl TerminalSurface {
    /// Create an empty surface
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a container's first tile at a cell position
    pub fn place(&mut self, container: ContainerId, x: u16, y: u16) {
        self.anchors.insert(container, (x, y));
    }

    /// Cell position of a container's first tile
    #[must_use]
    pub fn anchor(&self, container: ContainerId) -> (u16, u16) {
        self.anchors.get(&container).copied().unwrap_or((0, 0))
    }

    /// Glyphs currently shown by the static tiles
    #[must_use]
    pub fn glyphs(&self, container: ContainerId) -> Option<String> {
        let board = self.boards.get(&container)?;
        Some(
            board
                .offsets
                .iter()
                .map(|&offset| board.style.glyph_for_offset(offset))
                .collect(),
        )
    }

    /// Number of tiles mid-flip
    #[must_use]
    pub fn overlay_count(&self, container: ContainerId) -> usize {
        self.boards
            .get(&container)
            .map_or(0, |board| board.overlays.len())
    }

    /// Paint every static tile
    pub fn paint_tiles(&self, buf: &mut Buffer) {
        for (container, board) in &self.boards {
            let (ax, ay) = self.anchor(*container);
            for (position, &offset) in board.offsets.iter().enumerate() {
                let glyph = board.style.glyph_for_offset(offset);
                let x = tile_x(ax, position);
                put_row(buf, x, ay, "▄", theme::edge_style());
                put_glyph(buf, x, ay + 1, glyph, theme::glyph_style());
                put_row(buf, x, ay + 2, "▀", theme::edge_style());
            }
        }
    }

    /// Paint every flap overlay
    pub fn paint_overlays(&self, buf: &mut Buffer) {
        for (container, board) in &self.boards {
            let (ax, ay) = self.anchor(*container);
            for (&position, frame) in &board.overlays {
                let x = tile_x(ax, position);
                let shadow = frame.shadow.map_or(0.0, |part| part.opacity);
                let highlight = frame.highlight.map_or(0.0, |part| part.opacity);
                let old_top = frame.old_top_fraction();

                let (top_style, bottom_style) = match frame.phase {
                    FlapPhase::First => (
                        theme::flap_style(shadow, 0.0),
                        theme::flap_style(0.0, 0.0),
                    ),
                    FlapPhase::Second => (
                        theme::flap_style(0.0, 0.0),
                        theme::flap_style(0.0, highlight),
                    ),
                };
                put_row(buf, x, ay, top_ramp(old_top), top_style);

                // The old glyph stays readable until its top half is mostly folded
                let offset = if old_top > 0.5 {
                    frame.from_offset
                } else {
                    frame.to_offset
                };
                let glyph_style = theme::glyph_style().fg(theme::GLYPH_MOVING);
                put_glyph(buf, x, ay + 1, board.style.glyph_for_offset(offset), glyph_style);

                put_row(buf, x, ay + 2, bottom_edge(frame), bottom_style);
            }
        }
    }
}

impl TileSurface for TerminalSurface {
    fn origin(&self, _container: ContainerId) -> (i32, i32) {
        // Overlays are addressed relative to the container's anchor
        (0, 0)
    }

    fn render_static(&mut self, container: ContainerId, style: &TileStyle, offsets: &[u32]) {
        let overlays = self
            .boards
            .remove(&container)
            .map(|board| board.overlays)
            .unwrap_or_default();
        self.boards.insert(
            container,
            BoardTiles {
                style: style.clone(),
                offsets: offsets.to_vec(),
                overlays,
            },
        );
    }

    fn set_static_offset(&mut self, container: ContainerId, position: usize, offset: u32) {
        if let Some(tile) = self
            .boards
            .get_mut(&container)
            .and_then(|board| board.offsets.get_mut(position))
        {
            *tile = offset;
        }
    }

    fn show_overlay(
        &mut self,
        container: ContainerId,
        position: usize,
        _origin: (i32, i32),
        frame: &FlapFrame,
    ) {
        if let Some(board) = self.boards.get_mut(&container) {
            board.overlays.insert(position, frame.clone());
        }
    }

    fn update_overlay(&mut self, container: ContainerId, position: usize, frame: &FlapFrame) {
        if let Some(current) = self
            .boards
            .get_mut(&container)
            .and_then(|board| board.overlays.get_mut(&position))
        {
            *current = frame.clone();
        }
    }

    fn remove_overlay(&mut self, container: ContainerId, position: usize) {
        if let Some(board) = self.boards.get_mut(&container) {
            board.overlays.remove(&position);
        }
    }

    fn clear(&mut self, container: ContainerId) {
        self.boards.remove(&container);
    }
}

fn tile_x(anchor_x: u16, position: usize) -> u16 {
    let position = u16::try_from(position).unwrap_or(u16::MAX);
    anchor_x.saturating_add(position.saturating_mul(TILE_COLS + TILE_GAP))
}

/// Top edge for the visible fraction of the folding old top
fn top_ramp(fraction: f32) -> &'static str {
    let index = (fraction.clamp(0.0, 1.0) * 4.0).round() as usize;
    TOP_RAMP[index.min(TOP_RAMP.len() - 1)]
}

/// Bottom edge: the old bottom until the new bottom has mostly unfolded
fn bottom_edge(frame: &FlapFrame) -> &'static str {
    match frame.phase {
        FlapPhase::First => "▀",
        FlapPhase::Second if frame.new_bottom_fraction() < 0.5 => "▔",
        FlapPhase::Second => "▀",
    }
}

fn put_row(buf: &mut Buffer, x: u16, y: u16, symbol: &str, style: Style) {
    for dx in 0..TILE_COLS {
        if let Some(cell) = buf.cell_mut((x.saturating_add(dx), y)) {
            cell.set_symbol(symbol).set_style(style);
        }
    }
}

fn put_glyph(buf: &mut Buffer, x: u16, y: u16, glyph: char, style: Style) {
    let mut text = [0u8; 4];
    put_row(buf, x, y, " ", style);
    if let Some(cell) = buf.cell_mut((x.saturating_add(TILE_COLS / 2), y)) {
        cell.set_symbol(glyph.encode_utf8(&mut text)).set_style(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightboard_core::{BoardConfig, FlapGeometry};
    use ratatui::layout::Rect;

    const C: ContainerId = ContainerId::new(1);

    fn style() -> TileStyle {
        TileStyle::from_config(&BoardConfig::default())
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, y)).map_or(" ", |c| c.symbol()).to_string())
            .collect()
    }

    #[test]
    fn test_board_width() {
        assert_eq!(board_width(1), 3);
        assert_eq!(board_width(4), 15);
        assert_eq!(board_width(0), 0);
    }

    #[test]
    fn test_paint_static_tiles() {
        let mut surface = TerminalSurface::new();
        surface.place(C, 1, 0);
        // 'A' and 'B' with a 25-unit tile width
        surface.render_static(C, &style(), &[25, 50]);

        let mut buf = Buffer::empty(Rect::new(0, 0, 9, 3));
        surface.paint_tiles(&mut buf);

        assert_eq!(row(&buf, 0), " ▄▄▄ ▄▄▄ ");
        assert_eq!(row(&buf, 1), "  A   B  ");
        assert_eq!(row(&buf, 2), " ▀▀▀ ▀▀▀ ");
        assert_eq!(surface.glyphs(C).as_deref(), Some("AB"));
    }

    #[test]
    fn test_overlay_switches_glyph_mid_fold() {
        let mut surface = TerminalSurface::new();
        surface.render_static(C, &style(), &[25]);

        let mut frame = FlapFrame::new(25, 50, 25, 34, None);
        surface.show_overlay(C, 0, (0, 0), &frame);
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 3));
        surface.paint_overlays(&mut buf);
        assert_eq!(row(&buf, 1), " A ");
        assert_eq!(row(&buf, 0), "▄▄▄");

        let mut geometry = FlapGeometry::new(34, None);
        geometry.apply(0.4, &mut frame);
        surface.update_overlay(C, 0, &frame);
        surface.paint_overlays(&mut buf);
        assert_eq!(row(&buf, 1), " B ");
    }

    #[test]
    fn test_overlay_lifecycle() {
        let mut surface = TerminalSurface::new();
        let frame = FlapFrame::new(0, 25, 25, 34, Some(0.5));

        // No board yet: nothing to overlay
        surface.show_overlay(C, 0, (0, 0), &frame);
        assert_eq!(surface.overlay_count(C), 0);

        surface.render_static(C, &style(), &[0, 0]);
        surface.show_overlay(C, 1, (25, 0), &frame);
        assert_eq!(surface.overlay_count(C), 1);

        surface.set_static_offset(C, 1, 25);
        surface.remove_overlay(C, 1);
        assert_eq!(surface.overlay_count(C), 0);
        assert_eq!(surface.glyphs(C).as_deref(), Some(" A"));

        surface.clear(C);
        assert_eq!(surface.glyphs(C), None);
    }

    #[test]
    fn test_painting_clips_to_buffer() {
        let mut surface = TerminalSurface::new();
        surface.place(C, 2, 1);
        surface.render_static(C, &style(), &[25, 25, 25]);

        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 2));
        surface.paint_tiles(&mut buf);
        assert_eq!(row(&buf, 1), "  ▄▄");
    }

    #[test]
    fn test_top_ramp() {
        assert_eq!(top_ramp(1.0), "▄");
        assert_eq!(top_ramp(0.5), "▂");
        assert_eq!(top_ramp(0.0), " ");
        assert_eq!(top_ramp(3.0), "▄");
    }
}
