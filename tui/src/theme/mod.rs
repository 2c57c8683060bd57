//! Theme and Colors
//!
//! The classic departures-hall palette: charcoal flaps on a near-black
//! board with warm amber lettering.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Board Palette
// ============================================================================

/// Board background behind the tiles
pub const BOARD_BG: Color = Color::Rgb(18, 18, 20);

/// Flap body
pub const FLAP: Color = Color::Rgb(48, 48, 52);

/// Flap edge above and below the glyph row
pub const FLAP_EDGE: Color = Color::Rgb(70, 70, 76);

/// Glyph lettering
pub const GLYPH: Color = Color::Rgb(255, 196, 64);

/// Glyph lettering while the flap moves
pub const GLYPH_MOVING: Color = Color::Rgb(230, 170, 50);

// ============================================================================
// UI Colors
// ============================================================================

/// Status line text while the board is stopped
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Status line text while auto-repeat is on
pub const ACCENT: Color = Color::Rgb(120, 200, 255);

// ============================================================================
// Styles
// ============================================================================

/// Glyph row of a settled tile
pub fn glyph_style() -> Style {
    Style::default()
        .fg(GLYPH)
        .bg(FLAP)
        .add_modifier(Modifier::BOLD)
}

/// Flap rows of a settled tile
pub fn edge_style() -> Style {
    Style::default().fg(FLAP_EDGE).bg(BOARD_BG)
}

/// Shading opacity above which shadow/highlight modifiers apply
pub const SHADING_THRESHOLD: f32 = 0.25;

/// Style of a moving flap row, shaded by the overlay opacities
pub fn flap_style(shadow: f32, highlight: f32) -> Style {
    let mut style = Style::default().fg(FLAP).bg(BOARD_BG);
    if shadow > SHADING_THRESHOLD {
        style = style.add_modifier(Modifier::DIM);
    }
    if highlight > SHADING_THRESHOLD {
        style = style.fg(FLAP_EDGE).add_modifier(Modifier::BOLD);
    }
    style
}
