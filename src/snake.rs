//! Snake: body, food and the fixed-rate step rule on a square grid.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::collections::VecDeque;
use std::time::Duration;

pub const GRID_SIZE: i32 = 20;
pub const STEP_INTERVAL: Duration = Duration::from_millis(100);

const START: Point = Point { x: 10, y: 10 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn moved(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    fn in_grid(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    /// Front is the head.
    body: VecDeque<Point>,
    /// `None` until the first turn; the snake waits in place.
    direction: Option<Direction>,
    next_direction: Option<Direction>,
    food: Option<Point>,
    score: u32,
    game_over: bool,
    step_timer: Duration,
    rng: Pcg32,
}

impl SnakeGame {
    pub fn new(seed: u64) -> Self {
        let mut game = Self {
            body: VecDeque::from([START]),
            direction: None,
            next_direction: None,
            food: None,
            score: 0,
            game_over: false,
            step_timer: Duration::ZERO,
            rng: Pcg32::seed_from_u64(seed),
        };
        game.place_food();
        game
    }

    pub fn body(&self) -> impl Iterator<Item = Point> + '_ {
        self.body.iter().copied()
    }

    pub fn head(&self) -> Point {
        self.body.front().copied().unwrap_or(START)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Queue a turn for the next step. Reversing onto the neck is ignored.
    pub fn turn(&mut self, direction: Direction) {
        if self.game_over || self.direction == Some(direction.opposite()) {
            return;
        }
        self.next_direction = Some(direction);
    }

    /// Step whenever a full interval has accumulated; the remainder is dropped.
    pub fn tick(&mut self, dt: Duration) {
        self.step_timer += dt;
        if self.step_timer >= STEP_INTERVAL {
            self.step_timer = Duration::ZERO;
            self.step();
        }
    }

    pub fn step(&mut self) {
        if self.game_over {
            return;
        }
        self.direction = self.next_direction;
        let Some(direction) = self.direction else {
            return;
        };
        let head = self.head().moved(direction);
        if !head.in_grid() || self.body.contains(&head) {
            self.end();
            return;
        }
        self.body.push_front(head);
        if self.food == Some(head) {
            self.score += 1;
            log::debug!("snake ate at ({}, {}), length {}", head.x, head.y, self.body.len());
            self.place_food();
        } else {
            self.body.pop_back();
        }
    }

    /// Uniform over free cells. A full grid ends the game.
    fn place_food(&mut self) {
        let free: Vec<Point> = (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| Point::new(x, y)))
            .filter(|p| !self.body.contains(p))
            .collect();
        if free.is_empty() {
            self.food = None;
            self.end();
            return;
        }
        self.food = Some(free[self.rng.random_range(0..free.len())]);
    }

    fn end(&mut self) {
        self.game_over = true;
        log::info!("snake game over with score {}", self.score);
    }

    pub fn restart(&mut self) {
        self.body = VecDeque::from([START]);
        self.direction = None;
        self.next_direction = None;
        self.score = 0;
        self.game_over = false;
        self.step_timer = Duration::ZERO;
        self.place_food();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_with_food(food: Point) -> SnakeGame {
        let mut game = SnakeGame::new(9);
        game.food = Some(food);
        game
    }

    #[test]
    fn test_waits_for_first_turn() {
        let mut game = game_with_food(Point::new(0, 0));
        for _ in 0..10 {
            game.step();
        }
        assert_eq!(game.head(), START);
        assert!(!game.is_game_over());
    }

    #[test]
    fn test_moves_in_queued_direction() {
        let mut game = game_with_food(Point::new(0, 0));
        game.turn(Direction::Right);
        game.step();
        assert_eq!(game.head(), Point::new(11, 10));
        assert_eq!(game.len(), 1);
    }

    #[test]
    fn test_reverse_turn_is_ignored() {
        let mut game = game_with_food(Point::new(0, 0));
        game.turn(Direction::Right);
        game.step();
        game.turn(Direction::Left);
        game.step();
        assert_eq!(game.head(), Point::new(12, 10));
    }

    #[test]
    fn test_tick_steps_every_interval() {
        let mut game = game_with_food(Point::new(0, 0));
        game.turn(Direction::Down);
        game.tick(Duration::from_millis(60));
        assert_eq!(game.head(), START);
        game.tick(Duration::from_millis(40));
        assert_eq!(game.head(), Point::new(10, 11));
        game.tick(Duration::from_secs(3));
        assert_eq!(game.head(), Point::new(10, 12));
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut game = game_with_food(Point::new(11, 10));
        game.turn(Direction::Right);
        game.step();
        assert_eq!(game.score(), 1);
        assert_eq!(game.len(), 2);
        let food = game.food().unwrap();
        assert!(!game.body().any(|p| p == food));
        game.food = Some(Point::new(0, 0));
        game.step();
        assert_eq!(game.len(), 2);
        assert_eq!(game.body().collect::<Vec<_>>(), vec![Point::new(12, 10), Point::new(11, 10)]);
    }

    #[test]
    fn test_wall_ends_game() {
        let mut game = game_with_food(Point::new(0, 0));
        game.turn(Direction::Up);
        for _ in 0..10 {
            game.step();
        }
        assert_eq!(game.head(), Point::new(10, 0));
        assert!(!game.is_game_over());
        game.step();
        assert!(game.is_game_over());
        game.turn(Direction::Left);
        game.step();
        assert_eq!(game.head(), Point::new(10, 0));
    }

    #[test]
    fn test_running_into_body_ends_game() {
        let mut game = game_with_food(Point::new(0, 0));
        game.body = VecDeque::from([
            Point::new(5, 5),
            Point::new(6, 5),
            Point::new(6, 6),
            Point::new(5, 6),
            Point::new(4, 6),
        ]);
        game.direction = Some(Direction::Left);
        game.next_direction = Some(Direction::Left);
        game.turn(Direction::Down);
        game.step();
        assert!(game.is_game_over());
    }

    #[test]
    fn test_restart_resets() {
        let mut game = game_with_food(Point::new(11, 10));
        game.turn(Direction::Right);
        game.step();
        game.turn(Direction::Up);
        for _ in 0..20 {
            game.step();
        }
        assert!(game.is_game_over());
        game.restart();
        assert!(!game.is_game_over());
        assert_eq!(game.score(), 0);
        assert_eq!(game.body().collect::<Vec<_>>(), vec![START]);
        assert!(game.food().is_some_and(|f| f != START));
    }

    #[test]
    fn test_food_lands_on_last_free_cell() {
        let mut game = SnakeGame::new(1);
        game.body = (0..GRID_SIZE)
            .flat_map(|y| (0..GRID_SIZE).map(move |x| Point::new(x, y)))
            .filter(|&p| p != Point::new(19, 19))
            .collect();
        game.place_food();
        assert_eq!(game.food(), Some(Point::new(19, 19)));
        game.body.push_back(Point::new(19, 19));
        game.place_food();
        assert!(game.is_game_over());
        assert_eq!(game.food(), None);
    }
}
