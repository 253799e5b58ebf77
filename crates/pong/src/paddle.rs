use sketchbook_common::CanvasSize;
use sketchbook_input::{Action, ActionState};

/// A vertical bar moved by two held actions.
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per tick.
    pub speed: f32,
    pub up: Action,
    pub down: Action,
}

impl Paddle {
    pub const WIDTH: f32 = 20.0;
    pub const HEIGHT: f32 = 60.0;
    /// Gap between a paddle and its side wall.
    pub const MARGIN: f32 = 10.0;

    pub fn new(x: f32, y: f32, speed: f32, up: Action, down: Action) -> Self {
        Self {
            x,
            y,
            width: Self::WIDTH,
            height: Self::HEIGHT,
            speed,
            up,
            down,
        }
    }

    /// Left paddle, vertically centred, bound to the left-paddle actions.
    pub fn left(size: CanvasSize, speed: f32) -> Self {
        Self::new(
            Self::MARGIN,
            (size.height - Self::HEIGHT) / 2.0,
            speed,
            Action::LeftPaddleUp,
            Action::LeftPaddleDown,
        )
    }

    /// Right paddle, vertically centred, bound to the right-paddle actions.
    pub fn right(size: CanvasSize, speed: f32) -> Self {
        Self::new(
            size.width - Self::MARGIN - Self::WIDTH,
            (size.height - Self::HEIGHT) / 2.0,
            speed,
            Action::RightPaddleUp,
            Action::RightPaddleDown,
        )
    }

    pub fn move_up(&mut self) {
        self.y -= self.speed;
    }

    pub fn move_down(&mut self) {
        self.y += self.speed;
    }

    /// Apply held actions, then keep the paddle on the canvas.
    pub fn update(&mut self, input: &ActionState, size: CanvasSize) {
        if input.is_held(self.up) {
            self.move_up();
        }
        if input.is_held(self.down) {
            self.move_down();
        }
        self.y = self.y.clamp(0.0, (size.height - self.height).max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: CanvasSize = CanvasSize::new(600.0, 300.0);

    #[test]
    fn starting_positions() {
        let left = Paddle::left(SIZE, 2.0);
        let right = Paddle::right(SIZE, 2.0);
        assert_eq!((left.x, left.y), (10.0, 120.0));
        assert_eq!((right.x, right.y), (570.0, 120.0));
    }

    #[test]
    fn moves_only_while_held() {
        let mut paddle = Paddle::left(SIZE, 2.0);
        let mut input = ActionState::new();
        paddle.update(&input, SIZE);
        assert_eq!(paddle.y, 120.0);

        input.press(Action::LeftPaddleUp);
        paddle.update(&input, SIZE);
        assert_eq!(paddle.y, 118.0);

        input.release(Action::LeftPaddleUp);
        input.press(Action::LeftPaddleDown);
        paddle.update(&input, SIZE);
        paddle.update(&input, SIZE);
        assert_eq!(paddle.y, 122.0);
    }

    #[test]
    fn other_paddle_keys_are_ignored() {
        let mut paddle = Paddle::right(SIZE, 2.0);
        let mut input = ActionState::new();
        input.press(Action::LeftPaddleUp);
        paddle.update(&input, SIZE);
        assert_eq!(paddle.y, 120.0);
    }

    #[test]
    fn both_keys_cancel_out() {
        let mut paddle = Paddle::left(SIZE, 2.0);
        let mut input = ActionState::new();
        input.press(Action::LeftPaddleUp);
        input.press(Action::LeftPaddleDown);
        paddle.update(&input, SIZE);
        assert_eq!(paddle.y, 120.0);
    }

    #[test]
    fn clamped_to_canvas() {
        let mut paddle = Paddle::left(SIZE, 2.0);
        let mut input = ActionState::new();
        input.press(Action::LeftPaddleUp);
        for _ in 0..500 {
            paddle.update(&input, SIZE);
        }
        assert_eq!(paddle.y, 0.0);

        input.clear();
        input.press(Action::LeftPaddleDown);
        for _ in 0..500 {
            paddle.update(&input, SIZE);
        }
        assert_eq!(paddle.y, SIZE.height - paddle.height);
    }
}
