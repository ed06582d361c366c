//! Pong: a pointer-driven player paddle against a paddle that chases the ball.
//!
//! Units are field pixels; [`PongGame::tick`] runs one [`PongGame::step`] per
//! [`FRAME_INTERVAL`] of elapsed time.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::time::Duration;

pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 500.0;
pub const PADDLE_WIDTH: f32 = 12.0;
pub const PADDLE_HEIGHT: f32 = 90.0;
pub const BALL_SIZE: f32 = 16.0;
pub const PLAYER_X: f32 = 25.0;
pub const AI_X: f32 = FIELD_WIDTH - PLAYER_X - PADDLE_WIDTH;
pub const PADDLE_SPEED: f32 = 6.0;
pub const BALL_SPEED: f32 = 6.0;
/// Simulation frame; speeds above are per frame.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Horizontal speed factor on every paddle hit.
const SPEEDUP: f32 = -1.1;
/// Vertical velocity added per unit of distance between ball and paddle centres.
const SPIN: f32 = 0.15;

/// Ball position is its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

impl Ball {
    fn center_y(&self) -> f32 {
        self.y + BALL_SIZE / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Ai,
}

#[derive(Debug, Clone)]
pub struct PongGame {
    player_y: f32,
    ai_y: f32,
    ball: Ball,
    player_points: u32,
    ai_points: u32,
    frame_timer: Duration,
    rng: Pcg32,
}

fn clamp_paddle(y: f32) -> f32 {
    y.clamp(0.0, FIELD_HEIGHT - PADDLE_HEIGHT)
}

impl PongGame {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball = Self::serve(&mut rng);
        Self {
            player_y: FIELD_HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0,
            ai_y: FIELD_HEIGHT / 2.0 - PADDLE_HEIGHT / 2.0,
            ball,
            player_points: 0,
            ai_points: 0,
            frame_timer: Duration::ZERO,
            rng,
        }
    }

    /// Centred ball heading left or right, with a random vertical component in [-6, 6).
    fn serve(rng: &mut Pcg32) -> Ball {
        let vx = if rng.random_bool(0.5) { BALL_SPEED } else { -BALL_SPEED };
        Ball {
            x: FIELD_WIDTH / 2.0 - BALL_SIZE / 2.0,
            y: FIELD_HEIGHT / 2.0 - BALL_SIZE / 2.0,
            vx,
            vy: BALL_SPEED * rng.random_range(-1.0..1.0),
        }
    }

    pub fn ball(&self) -> Ball {
        self.ball
    }

    /// Top edge of the player's paddle.
    pub fn player_y(&self) -> f32 {
        self.player_y
    }

    pub fn ai_y(&self) -> f32 {
        self.ai_y
    }

    pub fn points(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_points,
            Side::Ai => self.ai_points,
        }
    }

    /// Centre the player's paddle on the pointer.
    pub fn set_player_y(&mut self, pointer_y: f32) {
        self.player_y = clamp_paddle(pointer_y - PADDLE_HEIGHT / 2.0);
    }

    pub fn nudge_player(&mut self, dy: f32) {
        self.player_y = clamp_paddle(self.player_y + dy);
    }

    /// Run one step per whole frame accumulated; the remainder carries over.
    pub fn tick(&mut self, dt: Duration) {
        self.frame_timer += dt;
        while self.frame_timer >= FRAME_INTERVAL {
            self.frame_timer -= FRAME_INTERVAL;
            self.step();
        }
    }

    /// One frame. Returns who scored if the ball left the field.
    pub fn step(&mut self) -> Option<Side> {
        self.update_ai();
        self.update_ball()
    }

    fn update_ai(&mut self) {
        let target = self.ball.center_y() - PADDLE_HEIGHT / 2.0;
        let center = self.ai_y + PADDLE_HEIGHT / 2.0;
        if center < target {
            self.ai_y += PADDLE_SPEED;
        } else if center > target {
            self.ai_y -= PADDLE_SPEED;
        }
        self.ai_y = clamp_paddle(self.ai_y);
    }

    fn update_ball(&mut self) -> Option<Side> {
        let ball = &mut self.ball;
        ball.x += ball.vx;
        ball.y += ball.vy;

        if ball.y < 0.0 {
            ball.y = 0.0;
            ball.vy = -ball.vy;
        }
        if ball.y + BALL_SIZE > FIELD_HEIGHT {
            ball.y = FIELD_HEIGHT - BALL_SIZE;
            ball.vy = -ball.vy;
        }

        let overlaps = |paddle_y: f32, ball: &Ball| {
            ball.y + BALL_SIZE > paddle_y && ball.y < paddle_y + PADDLE_HEIGHT
        };

        if ball.x <= PLAYER_X + PADDLE_WIDTH && ball.x >= PLAYER_X && overlaps(self.player_y, ball) {
            ball.x = PLAYER_X + PADDLE_WIDTH;
            ball.vx *= SPEEDUP;
            ball.vy += (ball.center_y() - (self.player_y + PADDLE_HEIGHT / 2.0)) * SPIN;
        }

        if ball.x + BALL_SIZE >= AI_X
            && ball.x + BALL_SIZE <= AI_X + PADDLE_WIDTH
            && overlaps(self.ai_y, ball)
        {
            ball.x = AI_X - BALL_SIZE;
            ball.vx *= SPEEDUP;
            ball.vy += (ball.center_y() - (self.ai_y + PADDLE_HEIGHT / 2.0)) * SPIN;
        }

        let scorer = if ball.x < 0.0 {
            Side::Ai
        } else if ball.x + BALL_SIZE > FIELD_WIDTH {
            Side::Player
        } else {
            return None;
        };
        match scorer {
            Side::Player => self.player_points += 1,
            Side::Ai => self.ai_points += 1,
        }
        log::debug!(
            "point to {:?}: {} - {}",
            scorer,
            self.player_points,
            self.ai_points
        );
        self.ball = Self::serve(&mut self.rng);
        Some(scorer)
    }
}
