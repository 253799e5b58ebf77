use sketchbook_common::CanvasSize;

/// A ball moving diagonally at a fixed speed per axis.
///
/// `up` and `right` are the whole direction state: each flips when the ball
/// touches the matching wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Pixels per tick along each axis.
    pub speed: f32,
    pub up: bool,
    pub right: bool,
}

impl Ball {
    /// Ball at the canvas centre heading up and to the right.
    pub fn centered(size: CanvasSize, radius: f32, speed: f32) -> Self {
        Self {
            x: size.width / 2.0,
            y: size.height / 2.0,
            radius,
            speed,
            up: true,
            right: true,
        }
    }

    /// Move one step, then reflect off whichever walls the ball touches.
    pub fn update(&mut self, size: CanvasSize) {
        if self.up {
            self.y -= self.speed;
        } else {
            self.y += self.speed;
        }
        if self.right {
            self.x += self.speed;
        } else {
            self.x -= self.speed;
        }

        if self.y - self.radius <= 0.0 {
            self.up = false;
        }
        if self.y + self.radius >= size.height {
            self.up = true;
        }
        if self.x + self.radius >= size.width {
            self.right = false;
        }
        if self.x - self.radius <= 0.0 {
            self.right = true;
        }

        // A step can overshoot a wall by up to `speed`; pull the ball back in.
        self.x = self.x.clamp(self.radius, (size.width - self.radius).max(self.radius));
        self.y = self.y.clamp(self.radius, (size.height - self.radius).max(self.radius));
    }
}
