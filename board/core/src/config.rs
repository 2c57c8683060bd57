//! Board Configuration
//!
//! Every option a board recognizes, with the stock defaults of the classic
//! flight board, plus file loading with the following priority (highest
//! first):
//!
//! 1. Environment variables (`FLIGHTBOARD_*`, see [`ConfigOverrides`])
//! 2. Configuration file (TOML or JSON)
//! 3. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! messages = ["LONDON   ON TIME", "PARIS    DELAYED"]
//! maxLength = 16
//! flips = [2, 6]
//! speed = "fast"
//! pause = 3000
//! selection = "random"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::EasingFunction;
use crate::glyph::Alphabet;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Failed to parse JSON
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

// =============================================================================
// Option Types
// =============================================================================

/// Duration of a single glyph transition
///
/// Either a number of milliseconds or one of the named speeds
/// (`slow`, `fast`); any other name means the default speed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Speed {
    /// Milliseconds per transition
    Millis(u64),
    /// Named speed
    Named(String),
}

impl Speed {
    /// Milliseconds for a named speed that is not recognized
    pub const DEFAULT_MILLIS: u64 = 400;

    /// Resolve to milliseconds
    #[must_use]
    pub fn as_millis(&self) -> u64 {
        match self {
            Self::Millis(ms) => *ms,
            Self::Named(name) => match name.as_str() {
                "slow" => 600,
                "fast" => 200,
                _ => Self::DEFAULT_MILLIS,
            },
        }
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::Millis(500)
    }
}

impl FromStr for Speed {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(s.parse::<u64>()
            .map_or_else(|_| Self::Named(s.to_lowercase()), Self::Millis))
    }
}

/// Number of intermediate flips before a tile lands on its target glyph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flips {
    /// Always the same number of flips
    Fixed(u32),
    /// Uniformly sampled from `[min, max]`
    Range([u32; 2]),
}

impl Flips {
    /// The `(min, max)` flip range
    #[must_use]
    pub fn range(self) -> (u32, u32) {
        match self {
            Self::Fixed(n) => (n, n),
            Self::Range([min, max]) => (min, max),
        }
    }
}

impl Default for Flips {
    fn default() -> Self {
        Self::Range([3, 5])
    }
}

/// How the next message is chosen after each flip
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Step through the messages in order
    #[default]
    Forward,
    /// Step through the messages in reverse order
    Backward,
    /// Any message other than the current one
    Random,
}

impl FromStr for Selection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            "random" => Ok(Self::Random),
            other => Err(ConfigError::Validation(format!(
                "unknown selection {other:?} (expected forward, backward or random)"
            ))),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
            Self::Random => write!(f, "random"),
        }
    }
}

// =============================================================================
// Lifecycle Hooks
// =============================================================================

/// Callback receiving a pair of messages
pub type FlipCallback = Rc<dyn Fn(&str, &str)>;

/// Lifecycle callbacks around each flip
#[derive(Clone, Default)]
pub struct FlipHooks {
    /// Called with `(current, next)` just before a flip starts
    pub before_flip: Option<FlipCallback>,
    /// Called with `(previous, current)` once every tile has settled
    pub after_flip: Option<FlipCallback>,
}

impl fmt::Debug for FlipHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlipHooks")
            .field("before_flip", &self.before_flip.is_some())
            .field("after_flip", &self.after_flip.is_some())
            .finish()
    }
}

// =============================================================================
// Board Configuration
// =============================================================================

/// Configuration for one board
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Sprite sheet holding every glyph side by side
    pub letters_image: String,
    /// Width and height of one glyph tile
    pub letters_size: [u32; 2],
    /// Glyph order within the sprite sheet, blank glyph first
    pub letters_seq: String,
    /// Messages to rotate through
    pub messages: Vec<String>,
    /// Number of tiles on the board
    pub max_length: usize,
    /// Intermediate flips per tile and flip
    pub flips: Flips,
    /// Step through the alphabet instead of random glyphs
    pub sequential: bool,
    /// Duration of a single glyph transition
    pub speed: Speed,
    /// Flip automatically after each pause
    pub repeat: bool,
    /// Pause between flips in milliseconds
    pub pause: u64,
    /// How the next message is chosen
    pub selection: Selection,
    /// Draw highlight and shadow overlays during transitions
    pub shading: bool,
    /// Peak opacity of the highlight and shadow overlays
    pub opacity: f32,
    /// Highlight and shadow images for surfaces without opacity support
    pub shading_images: [String; 2],
    /// Easing applied to each transition's progress
    pub easing: EasingFunction,
    /// Lifecycle callbacks
    #[serde(skip)]
    pub hooks: FlipHooks,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            letters_image: "img/flightBoardLarge.png".to_string(),
            letters_size: [25, 34],
            letters_seq: " ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".to_string(),
            messages: vec![
                "SEE THE FLIGHT BOARD".to_string(),
                "CHANGE MESSAGES".to_string(),
            ],
            max_length: 20,
            flips: Flips::default(),
            sequential: false,
            speed: Speed::default(),
            repeat: true,
            pause: 2000,
            selection: Selection::Forward,
            shading: true,
            opacity: 0.5,
            shading_images: [
                "img/flightBoardHigh.png".to_string(),
                "img/flightBoardShad.png".to_string(),
            ],
            easing: EasingFunction::Swing,
            hooks: FlipHooks::default(),
        }
    }
}

impl BoardConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the messages to rotate through
    #[must_use]
    pub fn with_messages<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages = messages.into_iter().map(Into::into).collect();
        self
    }

    /// Set the number of tiles
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the selection policy
    #[must_use]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Set the flip count range
    #[must_use]
    pub fn with_flips(mut self, flips: Flips) -> Self {
        self.flips = flips;
        self
    }

    /// Enable or disable sequential glyph traversal
    #[must_use]
    pub fn with_sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    /// Set the transition speed
    #[must_use]
    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    /// Enable or disable auto-repeat
    #[must_use]
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set the pause between flips in milliseconds
    #[must_use]
    pub fn with_pause(mut self, pause_ms: u64) -> Self {
        self.pause = pause_ms;
        self
    }

    /// Enable or disable shading overlays
    #[must_use]
    pub fn with_shading(mut self, shading: bool) -> Self {
        self.shading = shading;
        self
    }

    /// Register the before-flip callback
    #[must_use]
    pub fn with_before_flip(mut self, callback: impl Fn(&str, &str) + 'static) -> Self {
        self.hooks.before_flip = Some(Rc::new(callback));
        self
    }

    /// Register the after-flip callback
    #[must_use]
    pub fn with_after_flip(mut self, callback: impl Fn(&str, &str) + 'static) -> Self {
        self.hooks.after_flip = Some(Rc::new(callback));
        self
    }

    /// Tile width in board units
    #[must_use]
    pub fn tile_width(&self) -> u32 {
        self.letters_size[0]
    }

    /// Tile height in board units
    #[must_use]
    pub fn tile_height(&self) -> u32 {
        self.letters_size[1]
    }

    /// Pause between automatic flips
    #[must_use]
    pub fn pause_duration(&self) -> Duration {
        Duration::from_millis(self.pause)
    }

    /// Check every invariant and build the glyph index
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] describing the first violation.
    pub fn validate(&self) -> Result<Alphabet, ConfigError> {
        let alphabet = Alphabet::new(&self.letters_seq)?;

        if self.messages.is_empty() {
            return Err(ConfigError::Validation(
                "at least one message is required".to_string(),
            ));
        }
        if self.max_length == 0 {
            return Err(ConfigError::Validation(
                "maxLength must be at least 1".to_string(),
            ));
        }
        if self.letters_size[0] == 0 || self.letters_size[1] == 0 {
            return Err(ConfigError::Validation(format!(
                "lettersSize must be non-zero, got {:?}",
                self.letters_size
            )));
        }
        // Sprite offsets and tile origins are addressed in i32 surface units
        let width = u64::from(self.letters_size[0]);
        let span = u64::try_from(alphabet.len().max(self.max_length)).unwrap_or(u64::MAX);
        if width.saturating_mul(span) > u64::from(i32::MAX.unsigned_abs()) {
            return Err(ConfigError::Validation(format!(
                "lettersSize width {} is too large for {span} tiles or glyphs",
                self.letters_size[0]
            )));
        }
        let (min, max) = self.flips.range();
        if min == 0 || min > max {
            return Err(ConfigError::Validation(format!(
                "flips must satisfy 1 <= min <= max, got [{min}, {max}]"
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ConfigError::Validation(format!(
                "opacity must be within 0.0..=1.0, got {}",
                self.opacity
            )));
        }

        Ok(alphabet)
    }
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the effective configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Environment variable
    Env,
    /// Configuration file
    File,
    /// Default values
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// A loaded configuration together with its provenance
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    /// The effective board configuration
    pub board: BoardConfig,
    /// Path of the file that was read, if any
    pub path: Option<PathBuf>,
    /// Highest-priority source that contributed a value
    pub source: ConfigSource,
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/flightboard/board.toml`, typically
/// `~/.config/flightboard/board.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("flightboard").join("board.toml"))
}

/// Load configuration from the default path, defaults and environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// an environment override is malformed.
pub fn load_config() -> Result<LoadedConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// A missing file is not an error: defaults are used. Files ending in
/// `.json` are parsed as JSON, everything else as TOML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if an
/// environment override is malformed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
    load_config_with_lookup(path, |key| std::env::var(key).ok())
}

/// Load configuration from a specific path, reading overrides through `lookup`
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_lookup(
    path: Option<PathBuf>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<LoadedConfig, ConfigError> {
    let mut loaded = LoadedConfig {
        board: BoardConfig::default(),
        path: None,
        source: ConfigSource::Default,
    };

    if let Some(config_path) = path {
        if config_path.exists() {
            loaded.board = parse_config_file(&config_path)?;
            loaded.source = ConfigSource::File;
            tracing::info!(path = %config_path.display(), "Loaded board configuration");
            loaded.path = Some(config_path);
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    let env = ConfigOverrides::from_lookup(lookup)?;
    if !env.is_empty() {
        env.apply(&mut loaded.board);
        loaded.source = ConfigSource::Env;
    }

    Ok(loaded)
}

fn parse_config_file(path: &Path) -> Result<BoardConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(toml::from_str(&content)?)
    }
}

// =============================================================================
// Overrides
// =============================================================================

/// `FLIGHTBOARD_*` values that override whatever the file or defaults provide
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    /// Transition speed override
    pub speed: Option<Speed>,
    /// Pause override in milliseconds
    pub pause: Option<u64>,
    /// Selection policy override
    pub selection: Option<Selection>,
    /// Auto-repeat override
    pub repeat: Option<bool>,
}

impl ConfigOverrides {
    /// Create an empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides through a variable lookup (`FLIGHTBOARD_*` names)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for unparseable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut overrides = Self::new();

        if let Some(speed) = lookup("FLIGHTBOARD_SPEED") {
            overrides.speed = speed.parse().ok();
        }
        if let Some(pause) = lookup("FLIGHTBOARD_PAUSE") {
            let ms = pause.trim().parse::<u64>().map_err(|_| {
                ConfigError::Validation(format!("FLIGHTBOARD_PAUSE is not a number: {pause:?}"))
            })?;
            overrides.pause = Some(ms);
        }
        if let Some(selection) = lookup("FLIGHTBOARD_SELECTION") {
            overrides.selection = Some(selection.parse()?);
        }
        if let Some(repeat) = lookup("FLIGHTBOARD_REPEAT") {
            let repeat = repeat.trim();
            overrides.repeat = Some(repeat != "0" && !repeat.eq_ignore_ascii_case("false"));
        }

        Ok(overrides)
    }

    /// Whether no override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut BoardConfig) {
        if let Some(ref speed) = self.speed {
            config.speed = speed.clone();
        }
        if let Some(pause) = self.pause {
            config.pause = pause;
        }
        if let Some(selection) = self.selection {
            config.selection = selection;
        }
        if let Some(repeat) = self.repeat {
            config.repeat = repeat;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
