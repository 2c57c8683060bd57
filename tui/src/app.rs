//! Main Application
//!
//! The App struct manages the TUI lifecycle:
//! - Event loop (keyboard, resize) on a tokio select
//! - A `FlightBoard` drawing through a `TerminalSurface`
//! - A compositor with tile, overlay and status layers
//!
//! Time only reaches the board through `tick`: every frame the elapsed time
//! since the previous frame is handed to the scheduler.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::Terminal;

use flightboard_core::{BoardCommand, ContainerId, FlightBoard, LoadedConfig};

use crate::compositor::{Compositor, LayerId};
use crate::surface::{board_width, TerminalSurface, TILE_ROWS};
use crate::theme;

/// Target ~60 FPS so flaps move smoothly
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// The board shown by the app
const MAIN_BOARD: ContainerId = ContainerId::new(1);

/// Layer IDs for UI regions
struct AppLayers {
    tiles: LayerId,
    overlays: LayerId,
    status: LayerId,
}

/// Main application state
pub struct App {
    /// Is the app still running?
    running: bool,
    /// The flip scheduler and its terminal surface
    board: FlightBoard<TerminalSurface>,
    /// Number of tiles on the board
    max_length: usize,
    /// Where the configuration came from (shown in the status line)
    config_label: String,
    /// The layered compositor
    compositor: Compositor,
    /// Layer assignments
    layers: AppLayers,
    /// Last frame time
    last_frame: Instant,
}

impl App {
    /// Create the app and attach the configured board
    ///
    /// # Errors
    ///
    /// Fails when the board configuration is invalid.
    pub fn new(loaded: LoadedConfig, size: (u16, u16)) -> anyhow::Result<Self> {
        let area = Rect::new(0, 0, size.0, size.1);
        let mut compositor = Compositor::new(area);

        // Tiles and overlays share the board area; overlays in front
        let tiles = compositor.create_layer(area, 0);
        let overlays = compositor.create_layer(area, 10);
        let status = compositor.create_layer(Self::status_bounds(area), 20);

        let config_label = match &loaded.path {
            Some(path) => format!("{} ({})", loaded.source, path.display()),
            None => loaded.source.to_string(),
        };
        let max_length = loaded.board.max_length;

        let mut board = FlightBoard::new(TerminalSurface::new());
        let (x, y) = Self::board_anchor(area, max_length);
        board.surface_mut().place(MAIN_BOARD, x, y);
        board.attach(MAIN_BOARD, loaded.board)?;

        tracing::info!(config = %config_label, tiles = max_length, "Flight board ready");

        Ok(Self {
            running: true,
            board,
            max_length,
            config_label,
            compositor,
            layers: AppLayers {
                tiles,
                overlays,
                status,
            },
            last_frame: Instant::now(),
        })
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut frames = tokio::time::interval(FRAME_INTERVAL);
        frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        self.last_frame = Instant::now();
        self.render(terminal)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key);
                        }
                        Some(Ok(Event::Resize(w, h))) => self.handle_resize(w, h),
                        Some(Ok(_)) => {}
                        Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                        None => self.running = false,
                    }
                }

                // Frame tick
                _ = frames.tick() => {}
            }

            let now = Instant::now();
            self.update(now.duration_since(self.last_frame));
            self.last_frame = now;

            self.render(terminal)?;
        }

        Ok(())
    }

    /// Whether the app is still running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The flip scheduler
    pub fn board(&self) -> &FlightBoard<TerminalSurface> {
        &self.board
    }

    /// Advance the board by `delta`
    pub fn update(&mut self, delta: Duration) {
        self.board.tick(delta);
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        let command = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.running = false;
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
                return;
            }
            KeyCode::Char(' ') => BoardCommand::Flip { target: None },
            KeyCode::Char(c @ '0'..='9') => BoardCommand::Flip {
                target: c.to_digit(10).map(|d| d as usize),
            },
            KeyCode::Char('s') => {
                let repeating = self
                    .board
                    .status(MAIN_BOARD)
                    .is_some_and(|status| status.repeat);
                if repeating {
                    BoardCommand::Stop {
                        temporary_only: false,
                    }
                } else {
                    BoardCommand::Start
                }
            }
            _ => return,
        };

        tracing::debug!(%command, "Key command");
        if let Err(e) = self.board.execute(MAIN_BOARD, command) {
            tracing::warn!("Board command failed: {}", e);
        }
    }

    /// Handle terminal resize
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        let area = Rect::new(0, 0, width, height);

        self.compositor.resize(area);
        self.compositor.set_layer_bounds(self.layers.tiles, area);
        self.compositor.set_layer_bounds(self.layers.overlays, area);
        self.compositor
            .set_layer_bounds(self.layers.status, Self::status_bounds(area));

        let (x, y) = Self::board_anchor(area, self.max_length);
        self.board.surface_mut().place(MAIN_BOARD, x, y);
    }

    /// Paint all layers and composite them
    pub fn compose(&mut self) -> &Buffer {
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.tiles) {
            buf.reset();
            self.board.surface().paint_tiles(buf);
        }
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.overlays) {
            buf.reset();
            self.board.surface().paint_overlays(buf);
        }
        let status = self.status_line();
        let repeating = self
            .board
            .status(MAIN_BOARD)
            .is_some_and(|status| status.repeat);
        if let Some(buf) = self.compositor.layer_buffer_mut(self.layers.status) {
            buf.reset();
            let area = buf.area;
            let color = if repeating { theme::ACCENT } else { theme::DIM_GRAY };
            buf.set_stringn(
                area.x,
                area.y,
                &status,
                usize::from(area.width),
                Style::default().fg(color),
            );
        }

        self.compositor.composite()
    }

    /// Render the UI
    fn render(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        let output = self.compose();
        terminal.draw(|frame| {
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    if let (Some(src), Some(dst)) = (output.cell((x, y)), buf.cell_mut((x, y))) {
                        *dst = src.clone();
                    }
                }
            }
        })?;

        Ok(())
    }

    /// Status bar text
    fn status_line(&self) -> String {
        let Some(status) = self.board.status(MAIN_BOARD) else {
            return " no board | q to quit".to_string();
        };
        let next = self.board.next(MAIN_BOARD).unwrap_or_default();
        format!(
            " next: {} | repeat {} | space flip  0-9 jump  s stop/start  q quit | {}",
            next.trim_end(),
            if status.repeat { "on" } else { "off" },
            self.config_label,
        )
    }

    /// Center the board in the area above the status line
    fn board_anchor(area: Rect, tiles: usize) -> (u16, u16) {
        let width = board_width(tiles);
        let usable_height = area.height.saturating_sub(1);
        (
            area.width.saturating_sub(width) / 2,
            usable_height.saturating_sub(TILE_ROWS) / 2,
        )
    }

    fn status_bounds(area: Rect) -> Rect {
        Rect::new(0, area.height.saturating_sub(1), area.width, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightboard_core::{BoardConfig, ConfigSource};

    fn app(messages: &[&str]) -> App {
        let loaded = LoadedConfig {
            board: BoardConfig::default()
                .with_messages(messages.iter().copied())
                .with_max_length(4),
            path: None,
            source: ConfigSource::Default,
        };
        App::new(loaded, (40, 10)).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_board_is_centered() {
        assert_eq!(App::board_anchor(Rect::new(0, 0, 40, 10), 4), (12, 3));
        assert_eq!(App::board_anchor(Rect::new(0, 0, 5, 2), 4), (0, 0));
    }

    #[test]
    fn test_space_flips_and_tick_settles() {
        let mut app = app(&["AB", "CD"]);
        app.handle_key(press(KeyCode::Char(' ')));
        assert!(app.board().status(MAIN_BOARD).unwrap().flipping);

        app.update(Duration::from_secs(10));
        assert_eq!(app.board().current(MAIN_BOARD).as_deref(), Some("CD"));
    }

    #[test]
    fn test_digit_jumps_to_message() {
        let mut app = app(&["AB", "CD", "EF"]);
        app.handle_key(press(KeyCode::Char('2')));
        app.update(Duration::from_secs(10));
        assert_eq!(app.board().current(MAIN_BOARD).as_deref(), Some("EF"));
    }

    #[test]
    fn test_s_toggles_repeat() {
        let mut app = app(&["AB", "CD"]);
        app.handle_key(press(KeyCode::Char('s')));
        assert!(!app.board().status(MAIN_BOARD).unwrap().repeat);
        app.handle_key(press(KeyCode::Char('s')));
        assert!(app.board().status(MAIN_BOARD).unwrap().repeat);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app(&["AB"]);
        app.handle_key(press(KeyCode::Char('x')));
        assert!(app.is_running());
        app.handle_key(press(KeyCode::Esc));
        assert!(!app.is_running());

        let mut app = self::app(&["AB"]);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.is_running());
    }

    #[test]
    fn test_compose_draws_board_and_status() {
        let mut app = app(&["HI", "YO"]);
        let output = app.compose();

        // Glyph row of the first tile: anchor (12, 3) + 1 row, centre column
        assert_eq!(output.cell((13, 4)).unwrap().symbol(), "H");
        assert_eq!(output.cell((17, 4)).unwrap().symbol(), "I");
        let status: String = (0..8)
            .map(|x| output.cell((x, 9)).unwrap().symbol().to_string())
            .collect();
        assert_eq!(status, " next: Y");
    }

    #[test]
    fn test_resize_recenters_board() {
        let mut app = app(&["HI"]);
        app.handle_resize(20, 6);
        let output = app.compose();
        // width 15 -> x 2; usable height 5 -> y 1
        assert_eq!(output.cell((3, 2)).unwrap().symbol(), "H");
    }
}
