//! Flightboard Core - Headless Split-Flap Animation Engine
//!
//! This crate animates text "flight boards": rows of split-flap tiles that
//! flip through intermediate glyphs before settling on the next message.
//! It is completely independent of any UI framework; hosts render through
//! the [`TileSurface`] trait and drive time with [`FlightBoard::tick`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            Hosts                                 │
//! │    ┌──────────────┐    ┌──────────────┐    ┌─────────────────┐   │
//! │    │     TUI      │    │    Canvas    │    │ RecordingSurface│   │
//! │    │  (ratatui)   │    │              │    │     (tests)     │   │
//! │    └──────┬───────┘    └──────┬───────┘    └────────┬────────┘   │
//! │           └───────────────────┼─────────────────────┘            │
//! │                  TileSurface (down) / tick (up)                  │
//! └───────────────────────────────┼──────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────┼──────────────────────────────────┐
//! │                          FLIGHTBOARD CORE                        │
//! │  ┌────────────────────────────┴───────────────────────────────┐  │
//! │  │          FlightBoard (registry keyed by container)         │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐  │  │
//! │  │  │ BoardInstance│  │ RepeatTimer  │  │ FlipPlan         │  │  │
//! │  │  │ (indices)    │  │ (pause)      │  │ (glyph sequences)│  │  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────┘  │  │
//! │  │          CharacterAnimator × maxLength  ──mpsc──►  tally   │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use flightboard_core::{BoardConfig, ContainerId, FlightBoard, Selection};
//!
//! let mut board = FlightBoard::new(my_surface);
//! let departures = ContainerId::new(1);
//! board.attach(
//!     departures,
//!     BoardConfig::default()
//!         .with_messages(["LONDON  ON TIME", "PARIS   DELAYED"])
//!         .with_selection(Selection::Random)
//!         .with_after_flip(|previous, current| println!("{previous} -> {current}")),
//! )?;
//!
//! loop {
//!     board.tick(Duration::from_millis(16));
//!     // draw my_surface
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`glyph`]: Glyph index and sprite offsets
//! - [`sequence`]: Per-tile glyph sequences and flip plans
//! - [`animation`]: Flap geometry, easing and transition clocks
//! - [`animator`]: Per-tile character flip state machine
//! - [`timer`]: Auto-repeat countdown
//! - [`board`]: Per-container board state
//! - [`scheduler`]: The board registry and flip lifecycle
//! - [`commands`]: Command enum and text parsing
//! - [`config`]: Board options and config file loading
//! - [`surface`]: Rendering surface abstraction
//! - [`test_utils`]: In-memory recording surface
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod animator;
pub mod board;
pub mod commands;
pub mod config;
pub mod error;
pub mod glyph;
pub mod scheduler;
pub mod sequence;
pub mod surface;
pub mod test_utils;
pub mod timer;

// Re-exports for convenience
pub use animation::{EasingFunction, FlapFrame, FlapGeometry, FlapPhase, PartGeometry};
pub use animator::{AnimatorParams, AnimatorState, CharacterAnimator, TileCompletion};
pub use board::{BoardInstance, BoardStatus, FlipReport};
pub use commands::{BoardCommand, CommandOutput};
pub use error::BoardError;
pub use glyph::Alphabet;
pub use scheduler::FlightBoard;
pub use sequence::{build_sequence, FlipPlan, GlyphSequence, SequencePolicy, TilePlan};
pub use surface::{ContainerId, Shading, TileStyle, TileSurface};
pub use timer::RepeatTimer;

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_lookup, BoardConfig, ConfigError,
    ConfigOverrides, ConfigSource, FlipCallback, FlipHooks, Flips, LoadedConfig, Selection,
    Speed,
};
