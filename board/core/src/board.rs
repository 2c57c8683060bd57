//! Board Instance State
//!
//! Everything one attached board owns: its validated configuration, the
//! current and next message indices, the pending repeat timer and the flip
//! in flight (animators plus their completion channel).
//!
//! At most one flip is in flight per board, and a flip in flight excludes a
//! pending repeat timer: the timer is armed only once a flip has settled.

use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;

use crate::animator::{AnimatorParams, CharacterAnimator, TileCompletion};
use crate::config::{BoardConfig, ConfigError, FlipHooks, Selection};
use crate::glyph::Alphabet;
use crate::sequence::{FlipPlan, SequencePolicy};
use crate::surface::{ContainerId, TileStyle, TileSurface};
use crate::timer::RepeatTimer;

/// Snapshot of a board's scheduling state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardStatus {
    /// Index of the message on display
    pub current_index: usize,
    /// Index of the message the next flip targets
    pub next_index: usize,
    /// Whether a flip is animating
    pub flipping: bool,
    /// Whether auto-repeat is enabled
    pub repeat: bool,
    /// Whether the repeat timer is counting down
    pub timer_pending: bool,
}

/// A settled flip: the messages shown before and after it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlipReport {
    /// Message shown before the flip
    pub previous: String,
    /// Message shown now
    pub current: String,
}

/// Animators and bookkeeping of the flip in flight
#[derive(Debug)]
struct FlipInFlight {
    animators: Vec<CharacterAnimator>,
    pending: usize,
    completions: mpsc::UnboundedReceiver<TileCompletion>,
}

/// Per-container board state
#[derive(Debug)]
pub struct BoardInstance {
    config: BoardConfig,
    alphabet: Alphabet,
    style: TileStyle,
    params: AnimatorParams,
    current: usize,
    next: usize,
    repeat: bool,
    timer: RepeatTimer,
    flight: Option<FlipInFlight>,
}

impl BoardInstance {
    /// Validate a configuration and build idle board state
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the configuration is invalid.
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        let alphabet = config.validate()?;
        Ok(Self {
            style: TileStyle::from_config(&config),
            params: AnimatorParams::from_config(&config),
            repeat: config.repeat,
            alphabet,
            config,
            current: 0,
            next: 0,
            timer: RepeatTimer::new(),
            flight: None,
        })
    }

    /// The board's configuration
    #[must_use]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// The board's glyph index
    #[must_use]
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// How the board's tiles are drawn
    #[must_use]
    pub fn style(&self) -> &TileStyle {
        &self.style
    }

    /// Lifecycle callbacks
    #[must_use]
    pub fn hooks(&self) -> &FlipHooks {
        &self.config.hooks
    }

    /// Index of the message on display
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Index of the message the next flip targets
    #[must_use]
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Number of configured messages
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.config.messages.len()
    }

    /// Message at an index; the index one past the last is the blank board
    #[must_use]
    pub fn message(&self, index: usize) -> &str {
        self.config.messages.get(index).map_or("", String::as_str)
    }

    /// Message on display
    #[must_use]
    pub fn current_message(&self) -> &str {
        self.message(self.current)
    }

    /// Message the next flip targets
    #[must_use]
    pub fn next_message(&self) -> &str {
        self.message(self.next)
    }

    /// Sprite offsets of every tile for a message
    #[must_use]
    pub fn offsets(&self, index: usize) -> Vec<u32> {
        self.alphabet.offsets_for(
            self.message(index),
            self.config.max_length,
            self.params.tile_width,
        )
    }

    /// Whether a flip is animating
    #[must_use]
    pub fn is_flipping(&self) -> bool {
        self.flight.is_some()
    }

    /// Whether the repeat timer is counting down
    #[must_use]
    pub fn timer_pending(&self) -> bool {
        self.timer.is_pending()
    }

    /// Snapshot of the scheduling state
    #[must_use]
    pub fn status(&self) -> BoardStatus {
        BoardStatus {
            current_index: self.current,
            next_index: self.next,
            flipping: self.is_flipping(),
            repeat: self.repeat,
            timer_pending: self.timer.is_pending(),
        }
    }

    /// Index the selection policy picks after the current next index
    ///
    /// Random selection never returns the current index when more than one
    /// message is configured.
    pub fn choose_next<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let count = self.message_count();
        match self.config.selection {
            Selection::Forward => (self.next + 1) % count,
            Selection::Backward => (self.next + count - 1) % count,
            Selection::Random => {
                if count < 2 {
                    return 0;
                }
                let pick = rng.gen_range(0..count - 1);
                if pick == self.current {
                    count - 1
                } else {
                    pick
                }
            }
        }
    }

    /// Move the next index along the selection policy
    pub fn select_next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        self.next = self.choose_next(rng);
        self.next
    }

    /// Override the next index; indices past the blank board are rejected
    pub fn set_target(&mut self, target: usize) -> bool {
        if target > self.message_count() {
            return false;
        }
        self.next = target;
        true
    }

    /// Promote the next message to current, pick a new next and arm the
    /// repeat timer when auto-repeat is on
    pub fn prepare_next<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current = self.next;
        self.select_next(rng);
        self.arm_timer();
    }

    /// Arm the repeat timer if auto-repeat is on and nothing is pending
    pub fn arm_timer(&mut self) {
        if self.repeat && self.flight.is_none() && !self.timer.is_pending() {
            self.timer.arm(self.config.pause_duration());
        }
    }

    /// Cancel the repeat timer
    pub fn cancel_timer(&mut self) {
        self.timer.cancel();
    }

    /// Enable or disable auto-repeat
    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    /// Advance the repeat timer; true when it fires
    pub fn advance_timer(&mut self, delta: Duration) -> bool {
        self.timer.advance(delta)
    }

    /// Launch one animator per tile from the current to the next message
    pub fn begin_flip<S, R>(&mut self, container: ContainerId, surface: &mut S, rng: &mut R)
    where
        S: TileSurface + ?Sized,
        R: Rng + ?Sized,
    {
        let max_length = self.config.max_length;
        let plan = FlipPlan::build(
            &self.alphabet,
            &self.alphabet.fit(self.current_message(), max_length),
            &self.alphabet.fit(self.next_message(), max_length),
            SequencePolicy::from_config(&self.config),
            self.config.speed.as_millis(),
            rng,
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let (x, y) = surface.origin(container);
        let pending = plan.len();
        let animators = plan
            .tiles
            .into_iter()
            .map(|tile| {
                let offset = i32::try_from(tile.position as u64 * u64::from(self.params.tile_width))
                    .unwrap_or(i32::MAX);
                CharacterAnimator::spawn(
                    container,
                    tile,
                    (x.saturating_add(offset), y),
                    self.params,
                    &self.alphabet,
                    surface,
                    tx.clone(),
                )
            })
            .collect();

        self.timer.cancel();
        self.flight = Some(FlipInFlight {
            animators,
            pending,
            completions: rx,
        });
    }

    /// Advance every animator of the flip in flight
    ///
    /// Returns the report once the last tile has settled. The caller is
    /// expected to run [`prepare_next`](Self::prepare_next) afterwards.
    pub fn advance_flip<S: TileSurface + ?Sized>(
        &mut self,
        container: ContainerId,
        delta: Duration,
        surface: &mut S,
    ) -> Option<FlipReport> {
        let flight = self.flight.as_mut()?;
        for animator in flight.animators.iter_mut().filter(|a| !a.is_done()) {
            animator.tick(delta, &self.alphabet, surface);
        }
        self.collect_completions(container)
    }

    /// Drain the completion channel; finish the flip when nothing is pending
    pub fn collect_completions(&mut self, container: ContainerId) -> Option<FlipReport> {
        let flight = self.flight.as_mut()?;
        while let Ok(completion) = flight.completions.try_recv() {
            flight.pending = flight.pending.saturating_sub(1);
            tracing::trace!(
                container = %container,
                position = completion.position,
                glyph = %completion.glyph,
                remaining = flight.pending,
                "Tile settled"
            );
        }
        if flight.pending > 0 {
            return None;
        }

        self.flight = None;
        Some(FlipReport {
            previous: self.current_message().to_string(),
            current: self.next_message().to_string(),
        })
    }

    /// Abort the flip in flight, restoring the pre-flip message
    ///
    /// Returns whether a flip was aborted.
    pub fn abort_flip<S: TileSurface + ?Sized>(
        &mut self,
        container: ContainerId,
        surface: &mut S,
    ) -> bool {
        let Some(mut flight) = self.flight.take() else {
            return false;
        };
        for animator in &mut flight.animators {
            animator.abort(surface);
        }
        surface.render_static(container, &self.style, &self.offsets(self.current));
        true
    }
}
