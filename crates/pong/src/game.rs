use crate::{Ball, Paddle};
use glam::Vec2;
use serde::Serialize;
use sketchbook_common::{CanvasSize, Color, PongConfig};
use sketchbook_input::{Action, ActionState};
use sketchbook_render::{DrawList2d, Frame, Shape2d, Sketch};

/// Full pong state: canvas, two paddles and a ball.
#[derive(Debug, Clone)]
pub struct PongGame {
    size: CanvasSize,
    left: Paddle,
    right: Paddle,
    ball: Ball,
    initial: (Paddle, Paddle, Ball),
    paused: bool,
    ticks: u64,
}

/// Serializable positions after a tick, for headless runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PongSnapshot {
    pub tick: u64,
    pub ball: [f32; 2],
    pub ball_up: bool,
    pub ball_right: bool,
    pub left_paddle: [f32; 2],
    pub right_paddle: [f32; 2],
}

impl PongGame {
    pub fn new(config: &PongConfig) -> Self {
        let size = CanvasSize::new(config.width, config.height);
        let left = Paddle::left(size, config.paddle_speed);
        let right = Paddle::right(size, config.paddle_speed);
        let ball = Ball::centered(size, config.ball_radius, config.ball_speed);
        tracing::debug!(width = size.width, height = size.height, "pong canvas");
        Self {
            size,
            initial: (left.clone(), right.clone(), ball.clone()),
            left,
            right,
            ball,
            paused: false,
            ticks: 0,
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn paddles(&self) -> [&Paddle; 2] {
        [&self.left, &self.right]
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance one step: paddles first, then the ball.
    pub fn step(&mut self, input: &ActionState) {
        if self.paused {
            return;
        }
        self.left.update(input, self.size);
        self.right.update(input, self.size);
        self.ball.update(self.size);
        self.ticks += 1;
    }

    pub fn reset(&mut self) {
        let (left, right, ball) = self.initial.clone();
        self.left = left;
        self.right = right;
        self.ball = ball;
        self.ticks = 0;
        tracing::info!("pong reset");
    }

    /// Whether the ball and both paddles lie inside the canvas.
    pub fn in_bounds(&self) -> bool {
        let paddles_ok = self
            .paddles()
            .iter()
            .all(|p| p.y >= 0.0 && p.y + p.height <= self.size.height);
        paddles_ok && self.size.contains(self.ball.x, self.ball.y)
    }

    pub fn snapshot(&self) -> PongSnapshot {
        PongSnapshot {
            tick: self.ticks,
            ball: [self.ball.x, self.ball.y],
            ball_up: self.ball.up,
            ball_right: self.ball.right,
            left_paddle: [self.left.x, self.left.y],
            right_paddle: [self.right.x, self.right.y],
        }
    }

    pub fn draw_list(&self) -> DrawList2d {
        let mut list = DrawList2d::new(self.size, Color::BLACK);
        for paddle in self.paddles() {
            list.push(Shape2d::Rect {
                x: paddle.x,
                y: paddle.y,
                width: paddle.width,
                height: paddle.height,
                color: Color::WHITE,
            });
        }
        list.push(Shape2d::Circle {
            center: Vec2::new(self.ball.x, self.ball.y),
            radius: self.ball.radius,
            color: Color::WHITE,
        });
        list
    }
}

impl Default for PongGame {
    fn default() -> Self {
        Self::new(&PongConfig::default())
    }
}

impl Sketch for PongGame {
    fn name(&self) -> &'static str {
        "pong"
    }

    fn canvas_size(&self) -> Option<CanvasSize> {
        Some(self.size)
    }

    fn tick(&mut self, _dt: f32, input: &ActionState) {
        self.step(input);
    }

    fn on_action(&mut self, action: Action) {
        match action {
            Action::Reset => self.reset(),
            Action::TogglePause => {
                self.paused = !self.paused;
                tracing::info!(paused = self.paused, "pong pause toggled");
            }
            _ => {}
        }
    }

    fn frame(&self, _aspect: f32) -> Frame {
        Frame::Canvas(self.draw_list())
    }

    fn status(&self) -> String {
        format!(
            "tick {} ball ({:.0}, {:.0}){}",
            self.ticks,
            self.ball.x,
            self.ball.y,
            if self.paused { " [paused]" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketchbook_common::SplitMix64;

    #[test]
    fn frame_has_two_paddles_and_a_ball() {
        let game = PongGame::default();
        let Frame::Canvas(list) = game.frame(2.0) else {
            panic!("pong draws a canvas");
        };
        assert_eq!(list.clear, Color::BLACK);
        assert_eq!(list.len(), 3);
        assert!(matches!(list.shapes[2], Shape2d::Circle { radius, .. } if radius == 10.0));
    }

    #[test]
    fn long_simulation_stays_in_bounds() {
        let mut game = PongGame::default();
        let mut rng = SplitMix64::new(7);
        let mut input = ActionState::new();
        let actions = [
            Action::LeftPaddleUp,
            Action::LeftPaddleDown,
            Action::RightPaddleUp,
            Action::RightPaddleDown,
        ];
        for i in 0..30_000 {
            if i % 45 == 0 {
                input.clear();
                for action in actions {
                    if rng.next_f32() < 0.5 {
                        input.press(action);
                    }
                }
            }
            game.tick(1.0 / 60.0, &input);
            assert!(game.in_bounds(), "out of bounds at tick {i}: {:?}", game.snapshot());
        }
    }

    #[test]
    fn pause_freezes_and_reset_restores() {
        let mut game = PongGame::default();
        let input = ActionState::new();
        let start = game.snapshot();

        game.tick(1.0 / 60.0, &input);
        assert_ne!(game.snapshot(), start);

        game.on_action(Action::TogglePause);
        let frozen = game.snapshot();
        for _ in 0..10 {
            game.tick(1.0 / 60.0, &input);
        }
        assert_eq!(game.snapshot(), frozen);
        assert!(game.status().contains("paused"));

        game.on_action(Action::TogglePause);
        game.on_action(Action::Reset);
        assert_eq!(game.snapshot(), start);
    }

    #[test]
    fn ball_passes_through_paddle_column() {
        let mut game = PongGame::default();
        let input = ActionState::new();
        // Heading right from the centre, the ball reaches the right wall.
        let mut max_x = 0.0_f32;
        for _ in 0..200 {
            game.tick(1.0 / 60.0, &input);
            max_x = max_x.max(game.ball().x);
        }
        assert_eq!(max_x, 590.0);
    }

    #[test]
    fn snapshot_serializes() {
        let json = serde_json::to_string(&PongGame::default().snapshot()).unwrap();
        assert!(json.contains("\"ball\":[300.0,150.0]"));
    }
}
