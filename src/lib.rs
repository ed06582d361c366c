//! Three single-screen arcade engines: a falling-block game, snake and pong.
//!
//! Each engine owns all of its state and is driven by a host that forwards
//! discrete commands and elapsed time, then reads the state back to draw it.

pub mod pong;
pub mod snake;
pub mod tetris;
