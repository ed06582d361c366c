//! App: terminal init, main loop, tick and key handling.

use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::{Args, GameKind};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseEvent, MouseEventKind};
use droptris::pong::{PADDLE_SPEED, PongGame};
use droptris::snake::{Direction as Heading, SnakeGame};
use droptris::tetris::{GameEvent, GameState, Rotation};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Frame budget (~60 FPS); input is polled for whatever is left of it.
const FRAME: Duration = Duration::from_millis(16);
/// Pong paddle travel per Up/Down press.
const PONG_NUDGE: f32 = PADDLE_SPEED * 4.0;

/// The engine being played. Owned by the app; the UI only borrows it.
pub enum Session {
    Tetris(GameState),
    Snake(SnakeGame),
    Pong(PongGame),
}

impl Session {
    pub fn new(kind: GameKind, seed: u64) -> Self {
        match kind {
            GameKind::Tetris => Self::Tetris(GameState::new(seed)),
            GameKind::Snake => Self::Snake(SnakeGame::new(seed)),
            GameKind::Pong => Self::Pong(PongGame::new(seed)),
        }
    }
}

/// Rows flashing after a line clear; the TachyonFX effect is created on first draw.
pub struct Flash {
    pub rows: Vec<usize>,
    pub effect: Option<Effect>,
    /// Last time the effect was processed (for delta).
    pub process_time: Option<Instant>,
}

pub struct App {
    args: Args,
    theme: Theme,
    session: Session,
    paused: bool,
    last_frame: Instant,
    flash: Option<Flash>,
    /// Terminal area of the last draw; maps mouse rows onto the pong field.
    area: Rect,
}

impl App {
    pub fn new(args: Args, theme: Theme, seed: u64) -> Self {
        let session = Session::new(args.game, seed);
        Self {
            args,
            theme,
            session,
            paused: false,
            last_frame: Instant::now(),
            flash: None,
            area: Rect::default(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        self.last_frame = Instant::now();

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;
        terminal.show_cursor()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                self.area = f.area();
                crate::ui::draw(f, &self.session, &self.theme, self.paused, &mut self.flash, now);
            })?;

            if self
                .flash
                .as_ref()
                .is_some_and(|fl| fl.effect.as_ref().is_some_and(|e| e.done()))
            {
                self.flash = None;
            }

            let timeout = FRAME.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            match key_to_action(key, self.args.game) {
                                Action::Quit => return Ok(()),
                                Action::Pause => self.paused = !self.paused,
                                _ if self.paused => {}
                                action => self.apply_action(action),
                            }
                        }
                        Event::Mouse(mouse) if !self.paused => self.apply_mouse(mouse),
                        _ => {}
                    }
                }
            }

            let now = Instant::now();
            let dt = now.duration_since(self.last_frame);
            self.last_frame = now;
            if !self.paused {
                self.advance(dt);
            }
        }
    }

    fn apply_action(&mut self, action: Action) {
        match &mut self.session {
            Session::Tetris(state) => match action {
                Action::MoveLeft => {
                    state.move_piece(-1);
                }
                Action::MoveRight => {
                    state.move_piece(1);
                }
                Action::SoftDrop => {
                    state.drop_piece();
                }
                Action::HardDrop => {
                    state.hard_drop();
                }
                Action::RotateCw => {
                    state.rotate(Rotation::Clockwise);
                }
                Action::RotateCcw => {
                    state.rotate(Rotation::CounterClockwise);
                }
                _ => {}
            },
            Session::Snake(game) => match action {
                Action::MoveUp => game.turn(Heading::Up),
                Action::MoveDown => game.turn(Heading::Down),
                Action::MoveLeft => game.turn(Heading::Left),
                Action::MoveRight => game.turn(Heading::Right),
                Action::Restart if game.is_game_over() => game.restart(),
                _ => {}
            },
            Session::Pong(game) => match action {
                Action::MoveUp => game.nudge_player(-PONG_NUDGE),
                Action::MoveDown => game.nudge_player(PONG_NUDGE),
                _ => {}
            },
        }
        self.collect_events();
    }

    fn apply_mouse(&mut self, mouse: MouseEvent) {
        let Session::Pong(game) = &mut self.session else {
            return;
        };
        if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            if let Some(y) = crate::ui::pong_pointer_y(self.area, mouse.row) {
                game.set_player_y(y);
            }
        }
    }

    /// Advance the active engine by the wall-clock time since the last frame.
    fn advance(&mut self, dt: Duration) {
        match &mut self.session {
            Session::Tetris(state) => state.tick(dt),
            Session::Snake(game) => game.tick(dt),
            Session::Pong(game) => game.tick(dt),
        }
        self.collect_events();
    }

    /// Turn engine events into visual effects.
    fn collect_events(&mut self) {
        let Session::Tetris(state) = &mut self.session else {
            return;
        };
        let height = state.playfield().height();
        for event in state.drain_events() {
            match event {
                GameEvent::LinesCleared { settled, .. } => self.start_flash(settled.collect()),
                GameEvent::ToppedOut { .. } => self.start_flash((0..height).collect()),
                GameEvent::Locked { .. } => {}
            }
        }
    }

    fn start_flash(&mut self, rows: Vec<usize>) {
        if self.args.no_animation {
            return;
        }
        self.flash = Some(Flash {
            rows,
            effect: None,
            process_time: None,
        });
    }
}
