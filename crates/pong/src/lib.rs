//! Two-paddle ball sketch on a 2D canvas.
//!
//! Each paddle moves while its key is held; the ball travels diagonally and
//! reflects off the four canvas walls with a one-bit direction flag per axis.
//!
//! # Invariants
//! - The ball stays inside `[0, width] x [0, height]` on every tick.
//! - Paddles stay inside the canvas.
//! - The ball does not collide with the paddles.

mod ball;
mod game;
mod paddle;

pub use ball::Ball;
pub use game::{PongGame, PongSnapshot};
pub use paddle::Paddle;

pub fn crate_info() -> &'static str {
    "sketchbook-pong v0.1.0"
}
