//! Flightboard TUI - Terminal split-flap flight board
//!
//! A full-screen terminal board driven by `flightboard-core`.
//!
//! # Architecture
//!
//! - **Compositor**: Layered rendering (tiles, flap overlays, status line)
//! - **Surface**: `TileSurface` implementation drawing `3 x 3` cell tiles
//! - **App**: tokio event loop feeding frame deltas and key commands to the board

pub mod app;
pub mod compositor;
pub mod surface;
pub mod theme;

pub use app::App;
pub use surface::TerminalSurface;
