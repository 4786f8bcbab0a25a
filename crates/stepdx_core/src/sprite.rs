//! Sprite-sheet frame selection for the actor.
//!
//! The sheet is a single horizontal strip of equally wide frames. Walk frames
//! occupy the first `walk_frames` slots; idle and jump poses have fixed slots
//! further along the strip. Frame choice is purely cosmetic and never feeds
//! back into collision geometry.

use glam::Vec2;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpriteSheet {
    /// Number of frames laid out horizontally across the texture.
    pub columns: u32,
    pub walk_frames: u32,
    pub idle_frame: u32,
    pub jump_frame: u32,
    pub frames_per_second: f32,
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self {
            columns: 8,
            walk_frames: 4,
            idle_frame: 5,
            jump_frame: 7,
            frames_per_second: 6.0,
        }
    }
}

impl SpriteSheet {
    /// Walk-cycle frame for a sprite timer value in seconds.
    pub fn walk_frame(&self, sprite_time: f32) -> u32 {
        if self.walk_frames == 0 {
            return self.idle_frame;
        }
        let tick = (sprite_time * self.frames_per_second).max(0.0) as u32;
        tick % self.walk_frames
    }

    /// Texture coordinates for a frame, in the actor quad's vertex order
    /// (bottom-left, top-left, top-right, bottom-right). Mirrored frames swap
    /// the left and right U values so the sprite faces the other way.
    pub fn uvs(&self, frame: u32, mirrored: bool) -> [Vec2; 4] {
        let width = 1.0 / self.columns.max(1) as f32;
        let (left, right) = if mirrored {
            ((frame + 1) as f32 * width, frame as f32 * width)
        } else {
            (frame as f32 * width, (frame + 1) as f32 * width)
        };
        [
            Vec2::new(left, 1.0),
            Vec2::new(left, 0.0),
            Vec2::new(right, 0.0),
            Vec2::new(right, 1.0),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.columns == 0 {
            return Err("Sprite sheet validation failed: columns must be > 0".to_string());
        }
        for (name, frame) in [("idle_frame", self.idle_frame), ("jump_frame", self.jump_frame)] {
            if frame >= self.columns {
                return Err(format!(
                    "Sprite sheet validation failed: {name} {frame} is outside {} columns",
                    self.columns
                ));
            }
        }
        if self.walk_frames > self.columns {
            return Err(format!(
                "Sprite sheet validation failed: {} walk frames do not fit in {} columns",
                self.walk_frames, self.columns
            ));
        }
        if self.frames_per_second.is_nan() || self.frames_per_second < 0.0 {
            return Err("Sprite sheet validation failed: frames_per_second must be >= 0".to_string());
        }
        Ok(())
    }
}
