use glam::Vec2;
use serde::Deserialize;

use crate::sprite::SpriteSheet;

/// Tuning constants for the player-controlled body.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub start: Vec2,
    pub walk_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub sprite: SpriteSheet,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            start: Vec2::new(0.4, 1.0),
            walk_speed: 5.0,
            jump_speed: 7.0,
            gravity: -9.8,
            sprite: SpriteSheet::default(),
        }
    }
}

/// Largest walk or jump speed, and gravity magnitude, a config may ask for.
const MAX_TUNING_MAGNITUDE: f32 = 1000.0;

impl ActorConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.start.is_finite() {
            return Err(format!(
                "Actor config validation failed: start {} is not finite",
                self.start
            ));
        }
        for (name, speed) in [("walk_speed", self.walk_speed), ("jump_speed", self.jump_speed)] {
            if !speed.is_finite() || speed <= 0.0 || speed > MAX_TUNING_MAGNITUDE {
                return Err(format!(
                    "Actor config validation failed: {name} must be in (0, {MAX_TUNING_MAGNITUDE}] (got {speed})"
                ));
            }
        }
        if !self.gravity.is_finite() || self.gravity.abs() > MAX_TUNING_MAGNITUDE {
            return Err(format!(
                "Actor config validation failed: gravity magnitude must be at most {MAX_TUNING_MAGNITUDE} (got {})",
                self.gravity
            ));
        }
        self.sprite.validate()
    }
}

/// Position/velocity/acceleration state of the actor plus its walk-cycle
/// bookkeeping. Integration is semi-implicit Euler: velocity first, then
/// position from the updated velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct Kinematics {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
    jumping: bool,
    sprite_time: f32,
    frame: u32,
    mirrored: bool,
    config: ActorConfig,
}

impl Kinematics {
    pub fn new(config: ActorConfig) -> Self {
        Self {
            pos: config.start,
            vel: Vec2::ZERO,
            acc: Vec2::new(0.0, config.gravity),
            jumping: false,
            sprite_time: 0.0,
            frame: config.sprite.idle_frame,
            mirrored: false,
            config,
        }
    }

    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    /// Sprite frame picked by the last advance.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Start a jump. Ignored while a jump is already in progress; returns
    /// whether the jump was taken.
    pub fn jump(&mut self) -> bool {
        if self.jumping {
            return false;
        }
        self.vel.y = self.config.jump_speed;
        self.acc.y = self.config.gravity;
        self.jumping = true;
        true
    }

    /// Set horizontal velocity to `direction * walk_speed`. Zero stops.
    pub fn walk(&mut self, direction: f32) {
        self.vel.x = direction * self.config.walk_speed;
    }

    /// Integrate by `dt` seconds and reselect the sprite frame. `dt == 0`
    /// leaves position and velocity untouched.
    pub fn integrate(&mut self, dt: f32) {
        self.vel += self.acc * dt;
        self.pos += self.vel * dt;

        if self.vel.y == 0.0 {
            self.jumping = false;
        }

        let sheet = &self.config.sprite;
        if self.vel.x == 0.0 {
            self.frame = sheet.idle_frame;
            self.sprite_time = 0.0;
        } else {
            self.sprite_time += dt;
            self.frame = sheet.walk_frame(self.sprite_time);
        }
        if self.jumping {
            self.frame = sheet.jump_frame;
        }
        self.mirrored = self.vel.x < 0.0;
    }

    pub fn frame_uvs(&self) -> [Vec2; 4] {
        self.config.sprite.uvs(self.frame, self.mirrored)
    }

    pub(crate) fn restore(&mut self, pos: Vec2, vel: Vec2, acc: Vec2, jumping: bool) {
        self.pos = pos;
        self.vel = vel;
        self.acc = acc;
        self.jumping = jumping;
    }
}
