//! Flip Scheduler
//!
//! [`FlightBoard`] owns every attached board, keyed by container, together
//! with the rendering surface and the random source. The host drives it by
//! calling [`FlightBoard::tick`] from its frame loop; each tick advances the
//! animators of boards that are flipping and the repeat timers of boards
//! that are idle.
//!
//! # Flip Lifecycle
//!
//! ```text
//!   attach ──► idle ──(timer fires / flip)──► flipping ──(all tiles settled)──┐
//!               ▲                                                           │
//!               └──── current := next, select next, arm timer, afterFlip ◄──┘
//! ```
//!
//! `flip` always aborts a flip already in flight before starting a new one,
//! so there is never more than one flip per board.

use std::collections::HashMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::{BoardInstance, BoardStatus, FlipReport};
use crate::commands::{BoardCommand, CommandOutput};
use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::surface::{ContainerId, TileSurface};

/// Registry of boards sharing one rendering surface
pub struct FlightBoard<S: TileSurface> {
    boards: HashMap<ContainerId, BoardInstance>,
    surface: S,
    rng: StdRng,
}

impl<S: TileSurface> FlightBoard<S> {
    /// Create a scheduler seeded from the operating system
    pub fn new(surface: S) -> Self {
        Self {
            boards: HashMap::new(),
            surface,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a scheduler with a deterministic random source
    pub fn with_seed(surface: S, seed: u64) -> Self {
        Self {
            boards: HashMap::new(),
            surface,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The rendering surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The rendering surface, mutably
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Whether a board is attached to the container
    pub fn is_attached(&self, container: ContainerId) -> bool {
        self.boards.contains_key(&container)
    }

    /// Containers with an attached board, in ascending order
    pub fn containers(&self) -> Vec<ContainerId> {
        let mut containers: Vec<_> = self.boards.keys().copied().collect();
        containers.sort_unstable();
        containers
    }

    /// State of an attached board
    pub fn board(&self, container: ContainerId) -> Option<&BoardInstance> {
        self.boards.get(&container)
    }

    /// Scheduling snapshot of an attached board
    pub fn status(&self, container: ContainerId) -> Option<BoardStatus> {
        self.boards.get(&container).map(BoardInstance::status)
    }

    /// Attach a board to a container
    ///
    /// Renders message 0 without animation and arms the first cycle.
    /// Returns `Ok(false)` when a board is already attached.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Config`] when the configuration is invalid.
    pub fn attach(&mut self, container: ContainerId, config: BoardConfig) -> Result<bool, BoardError> {
        if self.boards.contains_key(&container) {
            tracing::debug!(container = %container, "Board already attached, ignoring");
            return Ok(false);
        }

        let board = BoardInstance::new(config)?;
        self.install(container, board);
        tracing::debug!(container = %container, "Board attached");
        Ok(true)
    }

    /// Replace the configuration of an attached board
    ///
    /// The board restarts from message 0. Nothing happens when no board is
    /// attached.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Config`] when the configuration is invalid; the
    /// board then keeps running with its previous configuration.
    pub fn reconfigure(&mut self, container: ContainerId, config: BoardConfig) -> Result<(), BoardError> {
        if !self.boards.contains_key(&container) {
            tracing::debug!(container = %container, "Reconfigure on detached container ignored");
            return Ok(());
        }

        let board = BoardInstance::new(config)?;
        if let Some(mut previous) = self.boards.remove(&container) {
            previous.cancel_timer();
            previous.abort_flip(container, &mut self.surface);
        }
        self.install(container, board);
        tracing::debug!(container = %container, "Board reconfigured");
        Ok(())
    }

    /// Stop and remove a board, clearing its visuals
    ///
    /// Returns whether a board was attached.
    pub fn detach(&mut self, container: ContainerId) -> bool {
        let Some(mut board) = self.boards.remove(&container) else {
            return false;
        };
        board.cancel_timer();
        board.abort_flip(container, &mut self.surface);
        self.surface.clear(container);
        tracing::debug!(container = %container, "Board detached");
        true
    }

    /// Cancel the repeat timer and abort any flip in flight
    ///
    /// Unless `temporary_only` is set, auto-repeat stays disabled until
    /// [`start`](Self::start).
    pub fn stop(&mut self, container: ContainerId, temporary_only: bool) {
        let Some(board) = self.boards.get_mut(&container) else {
            return;
        };
        board.cancel_timer();
        if board.abort_flip(container, &mut self.surface) {
            tracing::debug!(container = %container, "Flip aborted");
        }
        if !temporary_only {
            board.set_repeat(false);
            tracing::debug!(container = %container, "Auto-repeat disabled");
        }
    }

    /// Re-enable auto-repeat without touching the displayed message
    pub fn start(&mut self, container: ContainerId) {
        let Some(board) = self.boards.get_mut(&container) else {
            return;
        };
        board.set_repeat(true);
        board.arm_timer();
        tracing::debug!(container = %container, "Auto-repeat enabled");
    }

    /// Flip to the next message, or to `target` when it is a valid index
    ///
    /// Valid targets are `0..=message_count`; the last one is the blank
    /// board. Other targets are ignored and the flip proceeds to the
    /// previously selected message.
    pub fn flip(&mut self, container: ContainerId, target: Option<usize>) {
        self.stop(container, true);
        let Some(board) = self.boards.get_mut(&container) else {
            return;
        };

        if let Some(target) = target {
            if !board.set_target(target) {
                tracing::debug!(
                    container = %container,
                    target,
                    messages = board.message_count(),
                    "Flip target out of range, ignoring"
                );
            }
        }

        if let Some(before_flip) = board.hooks().before_flip.clone() {
            before_flip(board.current_message(), board.next_message());
        }

        tracing::debug!(
            container = %container,
            from = board.current_index(),
            to = board.next_index(),
            "Flip started"
        );
        board.begin_flip(container, &mut self.surface, &mut self.rng);

        // Tiles that settled while spawning
        if let Some(report) = board.collect_completions(container) {
            self.finish_flip(container, &report);
        }
    }

    /// Move the next message along the selection policy
    ///
    /// Returns the new next index.
    pub fn select_next(&mut self, container: ContainerId) -> Option<usize> {
        let board = self.boards.get_mut(&container)?;
        Some(board.select_next(&mut self.rng))
    }

    /// Message on display
    pub fn current(&self, container: ContainerId) -> Option<String> {
        self.boards
            .get(&container)
            .map(|board| board.current_message().to_string())
    }

    /// Message the next flip targets
    pub fn next(&self, container: ContainerId) -> Option<String> {
        self.boards
            .get(&container)
            .map(|board| board.next_message().to_string())
    }

    /// Advance every board by `delta`
    pub fn tick(&mut self, delta: Duration) {
        for container in self.containers() {
            let Some(board) = self.boards.get_mut(&container) else {
                continue;
            };

            if board.is_flipping() {
                if let Some(report) = board.advance_flip(container, delta, &mut self.surface) {
                    self.finish_flip(container, &report);
                }
            } else if board.advance_timer(delta) {
                tracing::debug!(container = %container, "Repeat timer fired");
                self.flip(container, None);
            }
        }
    }

    /// Run one command
    ///
    /// # Errors
    ///
    /// Commands themselves never fail; the `Result` is shared with
    /// [`run`](Self::run).
    pub fn execute(
        &mut self,
        container: ContainerId,
        command: BoardCommand,
    ) -> Result<CommandOutput, BoardError> {
        if !self.is_attached(container) {
            tracing::debug!(container = %container, %command, "Command on detached container");
        }

        let output = match command {
            BoardCommand::Current => CommandOutput::Message(self.current(container)),
            BoardCommand::Next => CommandOutput::Message(self.next(container)),
            BoardCommand::Stop { temporary_only } => {
                self.stop(container, temporary_only);
                CommandOutput::Done
            }
            BoardCommand::Start => {
                self.start(container);
                CommandOutput::Done
            }
            BoardCommand::Flip { target } => {
                self.flip(container, target);
                CommandOutput::Done
            }
            BoardCommand::Detach => {
                self.detach(container);
                CommandOutput::Done
            }
        };
        Ok(output)
    }

    /// Parse and run a text command
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownCommand`] or
    /// [`BoardError::InvalidArgument`] when the text does not parse.
    pub fn run(&mut self, container: ContainerId, command: &str) -> Result<CommandOutput, BoardError> {
        let command = command.parse::<BoardCommand>()?;
        self.execute(container, command)
    }

    /// Render message 0, arm the first cycle and register the board
    fn install(&mut self, container: ContainerId, mut board: BoardInstance) {
        self.surface
            .render_static(container, board.style(), &board.offsets(0));
        board.prepare_next(&mut self.rng);
        self.boards.insert(container, board);
    }

    /// Promote the settled message and notify the after-flip hook
    fn finish_flip(&mut self, container: ContainerId, report: &FlipReport) {
        let Some(board) = self.boards.get_mut(&container) else {
            return;
        };
        board.prepare_next(&mut self.rng);
        tracing::debug!(
            container = %container,
            current = board.current_index(),
            next = board.next_index(),
            "Flip finished"
        );

        if let Some(after_flip) = board.hooks().after_flip.clone() {
            after_flip(&report.previous, &report.current);
        }
    }
}

impl<S: TileSurface + std::fmt::Debug> std::fmt::Debug for FlightBoard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightBoard")
            .field("boards", &self.boards)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}
