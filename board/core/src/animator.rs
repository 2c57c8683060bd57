//! Character Flip Animator
//!
//! Drives one tile through its glyph sequence. Each adjacent pair of glyphs
//! is one full flap transition; transitions are chained, never overlapped.
//!
//! # States
//!
//! ```text
//!            tick (transition incomplete)
//!              ┌──────┐
//!              ▼      │
//!  spawn ──► Active ──┘── tick (last pair finished) ──► Done
//!    │                                                   ▲
//!    └──────────── sequence shorter than 2 ──────────────┘
//! ```
//!
//! On reaching `Done` the animator removes its overlay, snaps the static
//! tile to the final glyph and reports exactly one [`TileCompletion`] on the
//! flip's completion channel. An aborted animator reports nothing.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::animation::{EasingFunction, FlapFrame, FlapGeometry, TransitionClock};
use crate::config::BoardConfig;
use crate::glyph::Alphabet;
use crate::sequence::{GlyphSequence, TilePlan};
use crate::surface::{ContainerId, TileSurface};

/// Notification that one tile has settled on its target glyph
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileCompletion {
    /// Tile position on the board
    pub position: usize,
    /// Glyph the tile landed on
    pub glyph: char,
}

/// Lifecycle of an animator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    /// At least one glyph pair left to flip through
    Active,
    /// Sequence exhausted or aborted
    Done,
}

/// Settings shared by all animators of a board
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatorParams {
    /// Tile width in board units
    pub tile_width: u32,
    /// Tile height in board units
    pub tile_height: u32,
    /// Peak shading opacity, when shading is enabled
    pub shading: Option<f32>,
    /// Easing applied to transition progress
    pub easing: EasingFunction,
}

impl AnimatorParams {
    /// Derive animator settings from a board configuration
    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            tile_width: config.tile_width(),
            tile_height: config.tile_height(),
            shading: config.shading.then_some(config.opacity),
            easing: config.easing,
        }
    }
}

/// Animates one tile through its glyph sequence
#[derive(Debug)]
pub struct CharacterAnimator {
    container: ContainerId,
    position: usize,
    origin: (i32, i32),
    sequence: GlyphSequence,
    params: AnimatorParams,
    clock: TransitionClock,
    geometry: FlapGeometry,
    frame: Option<FlapFrame>,
    state: AnimatorState,
    completions: mpsc::UnboundedSender<TileCompletion>,
}

impl CharacterAnimator {
    /// Create an animator and show its first transition
    ///
    /// A sequence shorter than two glyphs completes immediately.
    pub fn spawn<S: TileSurface + ?Sized>(
        container: ContainerId,
        plan: TilePlan,
        origin: (i32, i32),
        params: AnimatorParams,
        alphabet: &Alphabet,
        surface: &mut S,
        completions: mpsc::UnboundedSender<TileCompletion>,
    ) -> Self {
        let mut animator = Self {
            container,
            position: plan.position,
            origin,
            sequence: plan.sequence,
            params,
            clock: TransitionClock::new(plan.speed),
            geometry: FlapGeometry::new(params.tile_height, params.shading),
            frame: None,
            state: AnimatorState::Active,
            completions,
        };

        if animator.begin_step(alphabet) {
            if let Some(frame) = animator.frame.as_ref() {
                surface.show_overlay(container, animator.position, origin, frame);
            }
        } else {
            animator.finish(alphabet, surface);
        }

        animator
    }

    /// Tile position on the board
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// Whether the animator has finished or been aborted
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == AnimatorState::Done
    }

    /// Glyphs not yet fully shown
    #[must_use]
    pub fn remaining(&self) -> &GlyphSequence {
        &self.sequence
    }

    /// Screen position of the overlay tile
    #[must_use]
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// Advance the running transition by `delta`
    ///
    /// Time left over after a transition ends carries into the next one.
    pub fn tick<S: TileSurface + ?Sized>(
        &mut self,
        delta: Duration,
        alphabet: &Alphabet,
        surface: &mut S,
    ) {
        let mut delta = delta;
        while self.state == AnimatorState::Active {
            let leftover = self.clock.advance(delta);
            let progress = self.params.easing.apply(self.clock.progress());
            let Some(frame) = self.frame.as_mut() else {
                return;
            };
            self.geometry.apply(progress, frame);

            if !self.clock.is_complete() {
                surface.update_overlay(self.container, self.position, frame);
                return;
            }

            // Snap the static tile to the exact target offset
            let to_offset = frame.to_offset;
            surface.set_static_offset(self.container, self.position, to_offset);
            self.sequence.advance();

            if !self.begin_step(alphabet) {
                self.finish(alphabet, surface);
                return;
            }
            if let Some(frame) = self.frame.as_ref() {
                surface.update_overlay(self.container, self.position, frame);
            }
            if leftover.is_zero() {
                return;
            }
            delta = leftover;
        }
    }

    /// Stop immediately without reporting completion
    pub fn abort<S: TileSurface + ?Sized>(&mut self, surface: &mut S) {
        if self.state == AnimatorState::Done {
            return;
        }
        if self.frame.take().is_some() {
            surface.remove_overlay(self.container, self.position);
        }
        self.state = AnimatorState::Done;
        tracing::trace!(
            container = %self.container,
            position = self.position,
            "Character animation aborted"
        );
    }

    /// Prepare the transition for the leading glyph pair
    fn begin_step(&mut self, alphabet: &Alphabet) -> bool {
        let Some((from, to)) = self.sequence.current_pair() else {
            return false;
        };

        let width = self.params.tile_width;
        let mut frame = FlapFrame::new(
            alphabet.offset_for(from, width),
            alphabet.offset_for(to, width),
            width,
            self.params.tile_height,
            self.params.shading,
        );
        self.geometry = FlapGeometry::new(self.params.tile_height, self.params.shading);
        self.geometry.apply(0.0, &mut frame);
        self.clock = TransitionClock::new(self.clock.duration());
        self.frame = Some(frame);

        tracing::trace!(
            container = %self.container,
            position = self.position,
            %from,
            %to,
            "Glyph transition started"
        );
        true
    }

    /// Release the overlay, settle the static tile and report completion
    fn finish<S: TileSurface + ?Sized>(&mut self, alphabet: &Alphabet, surface: &mut S) {
        if self.frame.take().is_some() {
            surface.remove_overlay(self.container, self.position);
        }

        let glyph = self.sequence.last().unwrap_or_else(|| alphabet.blank());
        surface.set_static_offset(
            self.container,
            self.position,
            alphabet.offset_for(glyph, self.params.tile_width),
        );
        self.state = AnimatorState::Done;

        // The receiver is gone only when the flip was abandoned
        let _ = self.completions.send(TileCompletion {
            position: self.position,
            glyph,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingSurface, SurfaceOp};

    const C: ContainerId = ContainerId::new(1);

    fn alphabet() -> Alphabet {
        Alphabet::new(" ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789").unwrap()
    }

    fn params() -> AnimatorParams {
        AnimatorParams {
            tile_width: 10,
            tile_height: 20,
            shading: None,
            easing: EasingFunction::Linear,
        }
    }

    fn plan(glyphs: &[char], speed_ms: u64) -> TilePlan {
        TilePlan {
            position: 3,
            sequence: GlyphSequence::new(glyphs.to_vec()),
            speed: Duration::from_millis(speed_ms),
        }
    }

    #[test]
    fn test_single_glyph_completes_immediately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut surface = RecordingSurface::new();
        let animator = CharacterAnimator::spawn(
            C,
            plan(&['B'], 100),
            (30, 0),
            params(),
            &alphabet(),
            &mut surface,
            tx,
        );

        assert!(animator.is_done());
        assert_eq!(
            rx.try_recv().unwrap(),
            TileCompletion {
                position: 3,
                glyph: 'B'
            }
        );
        assert_eq!(surface.static_offset(C, 3), Some(20));
        assert!(!surface.has_overlay(C, 3));
    }

    #[test]
    fn test_steps_chain_sequentially() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut surface = RecordingSurface::new();
        let alphabet = alphabet();
        let mut animator = CharacterAnimator::spawn(
            C,
            plan(&['A', 'B', 'C'], 100),
            (30, 0),
            params(),
            &alphabet,
            &mut surface,
            tx,
        );
        assert_eq!(animator.state(), AnimatorState::Active);
        assert!(surface.has_overlay(C, 3));

        animator.tick(Duration::from_millis(50), &alphabet, &mut surface);
        assert!(rx.try_recv().is_err());

        // First pair done: static tile snapped to 'B'
        animator.tick(Duration::from_millis(50), &alphabet, &mut surface);
        assert_eq!(surface.static_offset(C, 3), Some(20));
        assert_eq!(animator.remaining().glyphs(), &['B', 'C']);
        assert!(rx.try_recv().is_err());

        animator.tick(Duration::from_millis(100), &alphabet, &mut surface);
        assert!(animator.is_done());
        assert_eq!(rx.try_recv().unwrap().glyph, 'C');
        assert_eq!(surface.static_offset(C, 3), Some(30));
        assert!(!surface.has_overlay(C, 3));
        // Exactly one completion
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_large_delta_runs_through_all_steps() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut surface = RecordingSurface::new();
        let alphabet = alphabet();
        let mut animator = CharacterAnimator::spawn(
            C,
            plan(&['A', 'X', 'Q', 'Z'], 100),
            (0, 0),
            params(),
            &alphabet,
            &mut surface,
            tx,
        );

        animator.tick(Duration::from_secs(10), &alphabet, &mut surface);
        assert!(animator.is_done());
        assert_eq!(rx.try_recv().unwrap().glyph, 'Z');
    }

    #[test]
    fn test_abort_reports_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut surface = RecordingSurface::new();
        let alphabet = alphabet();
        let mut animator = CharacterAnimator::spawn(
            C,
            plan(&['A', 'B'], 100),
            (0, 0),
            params(),
            &alphabet,
            &mut surface,
            tx,
        );

        animator.abort(&mut surface);
        animator.abort(&mut surface);
        assert!(animator.is_done());
        assert!(!surface.has_overlay(C, 3));

        animator.tick(Duration::from_secs(1), &alphabet, &mut surface);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_overlay_updates_with_progress() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut surface = RecordingSurface::new();
        let alphabet = alphabet();
        let mut animator = CharacterAnimator::spawn(
            C,
            plan(&['A', 'B'], 100),
            (0, 0),
            params(),
            &alphabet,
            &mut surface,
            tx,
        );

        animator.tick(Duration::from_millis(25), &alphabet, &mut surface);
        let frame = surface.overlay(C, 3).unwrap();
        assert_eq!(frame.from_offset, 10);
        assert_eq!(frame.to_offset, 20);
        assert_eq!(frame.old_top.height, 6.0);

        let updates = surface
            .ops()
            .iter()
            .filter(|op| matches!(op, SurfaceOp::UpdateOverlay { .. }))
            .count();
        assert_eq!(updates, 1);
    }
}
