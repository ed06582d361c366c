//! Game state: playfield, active piece, spawner, drop timer and score.

use super::piece::{Piece, Rotation, TetrominoKind};
use super::playfield::{ARENA_HEIGHT, ARENA_WIDTH, Playfield};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::ops::Range;
use std::time::Duration;

/// Time between forced descents.
pub const DROP_INTERVAL: Duration = Duration::from_millis(700);

/// Spawner: every kind equally likely, independent of history.
#[derive(Debug, Clone)]
pub struct Bag {
    rng: Pcg32,
}

impl Bag {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn next(&mut self) -> TetrominoKind {
        TetrominoKind::ALL[self.rng.random_range(0..TetrominoKind::ALL.len())]
    }
}

/// Things that happened since the host last drained them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Locked { kind: TetrominoKind },
    /// `rows` are pre-sweep indices; `settled` is where the stack closed up afterwards.
    LinesCleared {
        rows: Vec<usize>,
        settled: Range<usize>,
        points: u32,
    },
    /// Spawn collided: playfield wiped and score reset.
    ToppedOut { score: u32 },
}

#[derive(Debug, Clone)]
pub struct GameState {
    playfield: Playfield,
    piece: Piece,
    next: TetrominoKind,
    bag: Bag,
    score: u32,
    lines_cleared: u32,
    pieces_locked: u32,
    drop_timer: Duration,
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_size(ARENA_WIDTH, ARENA_HEIGHT, seed)
    }

    pub fn with_size(width: usize, height: usize, seed: u64) -> Self {
        let playfield = Playfield::new(width, height);
        let mut bag = Bag::new(seed);
        let first = bag.next();
        let next = bag.next();
        let mut state = Self {
            piece: Piece::spawn(first, playfield.width()),
            playfield,
            next,
            bag,
            score: 0,
            lines_cleared: 0,
            pieces_locked: 0,
            drop_timer: Duration::ZERO,
            events: Vec::new(),
        };
        state.place_spawned(first);
        state
    }

    #[inline]
    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    #[inline]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    /// Kind the next spawn will use.
    #[inline]
    pub fn next_kind(&self) -> TetrominoKind {
        self.next
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn drop_timer(&self) -> Duration {
        self.drop_timer
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the drop timer; at most one forced descent per call.
    pub fn tick(&mut self, dt: Duration) {
        self.drop_timer += dt;
        if self.drop_timer > DROP_INTERVAL {
            self.drop_piece();
        }
    }

    /// Shift horizontally; returns false (and changes nothing) on collision.
    pub fn move_piece(&mut self, dx: i32) -> bool {
        self.piece.x += dx;
        if self.playfield.collides(&self.piece) {
            self.piece.x -= dx;
            return false;
        }
        true
    }

    /// Move down one row. Returns false if the piece could not descend and was locked.
    pub fn drop_piece(&mut self) -> bool {
        self.drop_timer = Duration::ZERO;
        self.piece.y += 1;
        if self.playfield.collides(&self.piece) {
            self.piece.y -= 1;
            self.lock_piece();
            return false;
        }
        true
    }

    /// Drop until the piece locks. Returns rows descended.
    pub fn hard_drop(&mut self) -> u32 {
        let mut rows = 0;
        while self.drop_piece() {
            rows += 1;
        }
        rows
    }

    /// Rotate, then search x offsets +1, -2, +3, ... (applied cumulatively) for a free spot.
    /// Gives up once the next offset is wider than the rotated shape and restores the piece.
    pub fn rotate(&mut self, rotation: Rotation) -> bool {
        let original_x = self.piece.x;
        self.piece.shape = self.piece.shape.rotated(rotation);
        let width = self.piece.shape.width() as i32;
        let mut offset = 1i32;
        while self.playfield.collides(&self.piece) {
            self.piece.x += offset;
            offset = -(offset + offset.signum());
            if offset.abs() > width {
                log::trace!("rotation {:?} of {:?} blocked", rotation, self.piece.kind);
                self.piece.shape = self.piece.shape.rotated(rotation.reversed());
                self.piece.x = original_x;
                return false;
            }
        }
        true
    }

    fn lock_piece(&mut self) {
        self.playfield.merge(&self.piece);
        self.pieces_locked += 1;
        log::debug!(
            "locked {:?} at ({}, {})",
            self.piece.kind,
            self.piece.x,
            self.piece.y
        );
        self.events.push(GameEvent::Locked {
            kind: self.piece.kind,
        });

        let sweep = self.playfield.sweep();
        if !sweep.is_empty() {
            self.score = self.score.saturating_add(sweep.points);
            self.lines_cleared += sweep.count() as u32;
            log::info!(
                "cleared {} row(s) for {} points, score {}",
                sweep.count(),
                sweep.points,
                self.score
            );
            self.events.push(GameEvent::LinesCleared {
                settled: sweep.settled_rows(),
                rows: sweep.rows,
                points: sweep.points,
            });
        }

        self.spawn();
    }

    /// Replace the active piece with the queued kind and queue another.
    pub fn spawn(&mut self) {
        let kind = std::mem::replace(&mut self.next, self.bag.next());
        self.place_spawned(kind);
    }

    /// Put `kind` at the spawn position. A collision there wipes the board.
    fn place_spawned(&mut self, kind: TetrominoKind) {
        self.piece = Piece::spawn(kind, self.playfield.width());
        if self.playfield.collides(&self.piece) {
            log::info!("topped out with score {}", self.score);
            self.events.push(GameEvent::ToppedOut { score: self.score });
            self.playfield.clear();
            self.score = 0;
            self.lines_cleared = 0;
            self.pieces_locked = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetris::playfield::EMPTY;

    fn game_with(kind: TetrominoKind) -> GameState {
        let mut game = GameState::new(7);
        game.place_spawned(kind);
        game.drain_events();
        game
    }

    fn fill_row_except(game: &mut GameState, y: usize, gaps: &[usize]) {
        for x in 0..game.playfield.width() {
            if !gaps.contains(&x) {
                game.playfield.set(x, y, 3);
            }
        }
    }

    #[test]
    fn test_new_game_is_empty_with_spawned_piece() {
        let game = GameState::new(1);
        assert!(game.playfield().is_empty());
        assert_eq!(game.score(), 0);
        assert_eq!(game.piece().y, 0);
        assert!(!game.playfield().collides(game.piece()));
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let mut a = Bag::new(42);
        let mut b = Bag::new(42);
        let xs: Vec<_> = (0..50).map(|_| a.next()).collect();
        let ys: Vec<_> = (0..50).map(|_| b.next()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_bag_yields_every_kind() {
        let mut bag = Bag::new(3);
        let seen: std::collections::HashSet<_> = (0..500).map(|_| bag.next()).collect();
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_walk_o_to_left_wall() {
        let mut game = game_with(TetrominoKind::O);
        assert_eq!((game.piece().x, game.piece().y), (5, 0));
        for _ in 0..5 {
            assert!(game.move_piece(-1));
        }
        assert_eq!(game.piece().x, 0);
        assert!(!game.move_piece(-1));
        assert_eq!(game.piece().x, 0);
    }

    #[test]
    fn test_move_blocked_by_settled_cell() {
        let mut game = game_with(TetrominoKind::O);
        game.playfield.set(7, 1, 4);
        assert!(!game.move_piece(1));
        assert_eq!(game.piece().x, 5);
    }

    #[test]
    fn test_drop_descends_and_resets_timer() {
        let mut game = game_with(TetrominoKind::T);
        game.tick(Duration::from_millis(300));
        assert_eq!(game.drop_timer(), Duration::from_millis(300));
        assert!(game.drop_piece());
        assert_eq!(game.piece().y, 1);
        assert_eq!(game.drop_timer(), Duration::ZERO);
    }

    #[test]
    fn test_tick_drops_only_after_interval() {
        let mut game = game_with(TetrominoKind::T);
        game.tick(DROP_INTERVAL);
        assert_eq!(game.piece().y, 0);
        game.tick(Duration::from_millis(1));
        assert_eq!(game.piece().y, 1);
        assert_eq!(game.drop_timer(), Duration::ZERO);
    }

    #[test]
    fn test_long_pause_drops_once() {
        let mut game = game_with(TetrominoKind::T);
        game.tick(Duration::from_secs(10));
        assert_eq!(game.piece().y, 1);
    }

    #[test]
    fn test_lock_on_floor_merges_and_spawns() {
        let mut game = game_with(TetrominoKind::O);
        assert_eq!(game.hard_drop(), 18);
        assert_eq!(game.playfield().get(5, 18), Some(2));
        assert_eq!(game.playfield().get(6, 19), Some(2));
        assert_eq!(game.pieces_locked(), 1);
        assert_eq!(game.piece().y, 0);
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::Locked {
                kind: TetrominoKind::O
            }]
        );
    }

    #[test]
    fn test_lock_completing_bottom_row_scores_ten() {
        let mut game = game_with(TetrominoKind::O);
        fill_row_except(&mut game, 19, &[5, 6]);
        game.playfield.set(0, 18, 6);
        game.hard_drop();
        assert_eq!(game.score(), 10);
        assert_eq!(game.lines_cleared(), 1);
        // Row 19 now holds what was row 18: the O's top half plus the lone cell.
        let bottom: Vec<u8> = game.playfield().rows().last().map(<[u8]>::to_vec).unwrap();
        let mut expected = vec![EMPTY; 12];
        expected[0] = 6;
        expected[5] = 2;
        expected[6] = 2;
        assert_eq!(bottom, expected);
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::LinesCleared {
            rows: vec![19],
            settled: 19..20,
            points: 10
        }));
    }

    #[test]
    fn test_tetris_with_i_piece() {
        let mut game = game_with(TetrominoKind::I);
        assert!(game.rotate(Rotation::Clockwise));
        let column = game.piece().x as usize;
        for y in 16..20 {
            fill_row_except(&mut game, y, &[column]);
        }
        game.hard_drop();
        assert_eq!(game.score(), 150);
        assert_eq!(game.lines_cleared(), 4);
        assert!(game.playfield().is_empty());
    }

    #[test]
    fn test_rotate_four_times_in_open_space() {
        let mut game = game_with(TetrominoKind::J);
        game.drop_piece();
        game.drop_piece();
        let before = game.piece().clone();
        for _ in 0..4 {
            assert!(game.rotate(Rotation::CounterClockwise));
        }
        assert_eq!(game.piece(), &before);
    }

    #[test]
    fn test_rotate_kicks_off_right_wall() {
        let mut game = game_with(TetrominoKind::I);
        game.piece = Piece {
            kind: TetrominoKind::I,
            shape: TetrominoKind::I.shape().rotated(Rotation::Clockwise),
            x: 9,
            y: 5,
        };
        assert!(game.rotate(Rotation::CounterClockwise));
        assert_eq!(game.piece().shape, TetrominoKind::I.shape());
        assert_eq!(game.piece().x, 8);
        assert!(!game.playfield().collides(game.piece()));
    }

    #[test]
    fn test_rotate_gives_up_and_restores() {
        let mut game = game_with(TetrominoKind::I);
        let column = Piece {
            kind: TetrominoKind::I,
            shape: TetrominoKind::I.shape().rotated(Rotation::Clockwise),
            x: 10,
            y: 5,
        };
        game.piece = column.clone();
        assert!(!game.rotate(Rotation::Clockwise));
        assert_eq!(game.piece(), &column);
    }

    #[test]
    fn test_rotate_reaches_third_kick_step() {
        let mut game = game_with(TetrominoKind::I);
        game.piece = Piece {
            kind: TetrominoKind::I,
            shape: TetrominoKind::I.shape().rotated(Rotation::Clockwise),
            x: 5,
            y: 5,
        };
        game.playfield.set(6, 5, 3);
        // x=5, 6 and 4 all overlap the cell; the cumulative +3 lands on 7.
        assert!(game.rotate(Rotation::Clockwise));
        assert_eq!(game.piece().shape.width(), 4);
        assert_eq!(game.piece().x, 7);
        assert!(!game.playfield().collides(game.piece()));
    }

    #[test]
    fn test_rotate_width_three_gives_up_before_testing_last_offset() {
        let mut game = game_with(TetrominoKind::J);
        let upright = Piece {
            kind: TetrominoKind::J,
            shape: TetrominoKind::J.shape().rotated(Rotation::Clockwise),
            x: 5,
            y: 5,
        };
        for (x, y) in [(6, 6), (7, 6), (8, 6)] {
            game.playfield.set(x, y, 3);
        }
        assert!(!game.playfield().collides(&upright));

        let flat = upright.shape.rotated(Rotation::Clockwise);
        assert_eq!(flat.width(), 3);
        let at = |x| Piece {
            kind: TetrominoKind::J,
            shape: flat.clone(),
            x,
            y: 5,
        };
        for x in [5, 6, 4] {
            assert!(game.playfield().collides(&at(x)), "x={x}");
        }
        // Free, but the bound (|-4| > 3) stops the search before it is tested.
        assert!(!game.playfield().collides(&at(7)));

        game.piece = upright.clone();
        assert!(!game.rotate(Rotation::Clockwise));
        assert_eq!(game.piece(), &upright);
    }

    #[test]
    fn test_rotate_blocked_by_stack_restores() {
        let mut game = game_with(TetrominoKind::T);
        for y in 1..20 {
            fill_row_except(&mut game, y, &[]);
        }
        game.playfield.set(0, 0, 1);
        game.playfield.set(11, 0, 1);
        // Lifted so the flat T fits in row 0; any upright T reaches the full row 1.
        game.piece.y = -1;
        let before = game.piece().clone();
        assert!(!game.playfield().collides(&before));
        assert!(!game.rotate(Rotation::Clockwise));
        assert_eq!(game.piece(), &before);
    }

    #[test]
    fn test_spawn_into_stack_wipes_board_and_score() {
        let mut game = game_with(TetrominoKind::O);
        game.score = 70;
        game.lines_cleared = 3;
        fill_row_except(&mut game, 0, &[0]);
        fill_row_except(&mut game, 1, &[0]);
        game.spawn();
        assert!(game.playfield().is_empty());
        assert_eq!(game.score(), 0);
        assert_eq!(game.lines_cleared(), 0);
        assert_eq!(game.drain_events(), vec![GameEvent::ToppedOut { score: 70 }]);
        assert!(game.move_piece(1));
    }

    #[test]
    fn test_drop_on_full_stack_tops_out() {
        let mut game = game_with(TetrominoKind::O);
        for y in 2..20 {
            fill_row_except(&mut game, y, &[0]);
        }
        assert!(!game.drop_piece());
        // The O filled columns 5-6 of rows 0-1; the next spawn hits it.
        assert!(game.playfield().is_empty());
        assert!(
            game.drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ToppedOut { .. }))
        );
    }
}
