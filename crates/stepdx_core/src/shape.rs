//! Convex polygons that make up the world, including the actor itself.
//!
//! One [`Shape`] type covers every body in the game. Each shape keeps the base
//! vertex list it was built from and a derived list of *current* vertices,
//! recomputed on every [`Shape::advance`] from a variant-specific offset:
//!
//! - **Static** -- offset is always zero.
//! - **Platform** -- vertical triangular wave driven by accumulated time.
//! - **Actor** -- offset is the body's integrated position.
//!
//! All vertex lists are clockwise with y up, and must be convex. Geometry is
//! validated once at construction so the collision math never meets a
//! degenerate edge.

use glam::Vec2;
use serde::Deserialize;

use crate::actor::Kinematics;
use crate::draw::PolygonDraw;

/// Edges shorter than this are treated as degenerate.
const MIN_EDGE_LENGTH: f32 = 1e-6;

pub const DEFAULT_COLOR: [f32; 4] = [0.98, 0.92, 0.84, 1.0];

/// Vertical oscillation parameters for a moving platform.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlatformMotion {
    /// Seconds per rise (and per fall).
    pub speed: f32,
    pub max_height: f32,
}

impl Default for PlatformMotion {
    fn default() -> Self {
        Self {
            speed: 1.0,
            max_height: 1.0,
        }
    }
}

impl PlatformMotion {
    /// Vertical offset at `time`: rises linearly from 0 to `max_height` over
    /// `speed` seconds, then falls back over the next `speed` seconds.
    pub fn offset_at(&self, time: f32) -> f32 {
        let phase = time / self.speed;
        let leg = phase.floor();
        let along = phase - leg;
        if leg.rem_euclid(2.0) == 0.0 {
            self.max_height * along
        } else {
            self.max_height * (1.0 - along)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    Static,
    Platform { motion: PlatformMotion, time: f32 },
    Actor(Kinematics),
}

/// Texture assignment for a polygon. `uvs` always has one entry per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureBinding {
    pub key: String,
    pub uvs: Vec<Vec2>,
    pub transparent: bool,
}

/// Time-dependent state of a shape, used to save and rewind the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeState {
    Static,
    Platform {
        time: f32,
    },
    Actor {
        pos: Vec2,
        vel: Vec2,
        acc: Vec2,
        jumping: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    base: Vec<Vec2>,
    current: Vec<Vec2>,
    color: [f32; 4],
    texture: Option<TextureBinding>,
    motion: Motion,
}

impl Shape {
    pub fn new(vertices: Vec<Vec2>, motion: Motion) -> Result<Self, String> {
        validate_polygon(&vertices)?;
        match &motion {
            Motion::Platform { motion, .. } => {
                if !motion.speed.is_finite() || motion.speed <= 0.0 {
                    return Err(format!(
                        "Shape validation failed: platform speed must be > 0 (got {})",
                        motion.speed
                    ));
                }
            }
            Motion::Actor(body) => {
                if vertices.len() != 4 {
                    return Err(format!(
                        "Shape validation failed: actor must be a 4-vertex quad (got {})",
                        vertices.len()
                    ));
                }
                body.config().validate()?;
            }
            Motion::Static => {}
        }

        let mut shape = Self {
            current: vertices.clone(),
            base: vertices,
            color: DEFAULT_COLOR,
            texture: None,
            motion,
        };
        shape.advance(0.0);
        Ok(shape)
    }

    pub fn fixed(vertices: Vec<Vec2>) -> Result<Self, String> {
        Self::new(vertices, Motion::Static)
    }

    pub fn platform(vertices: Vec<Vec2>, motion: PlatformMotion) -> Result<Self, String> {
        Self::new(vertices, Motion::Platform { motion, time: 0.0 })
    }

    pub fn actor(vertices: Vec<Vec2>, body: Kinematics) -> Result<Self, String> {
        Self::new(vertices, Motion::Actor(body))
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Attach a texture. The UV list must match the vertex count; for the
    /// actor it is overwritten with sprite-frame coordinates on every advance.
    pub fn with_texture(
        mut self,
        key: impl Into<String>,
        uvs: Vec<Vec2>,
        transparent: bool,
    ) -> Result<Self, String> {
        if uvs.len() != self.base.len() {
            return Err(format!(
                "Shape validation failed: {} texture coordinates for {} vertices",
                uvs.len(),
                self.base.len()
            ));
        }
        self.texture = Some(TextureBinding {
            key: key.into(),
            uvs,
            transparent,
        });
        self.advance(0.0);
        Ok(self)
    }

    pub fn base_vertices(&self) -> &[Vec2] {
        &self.base
    }

    /// Vertices as of the last advance. This is what collision and
    /// rendering both read.
    pub fn vertices(&self) -> &[Vec2] {
        &self.current
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn texture(&self) -> Option<&TextureBinding> {
        self.texture.as_ref()
    }

    pub fn is_actor(&self) -> bool {
        matches!(self.motion, Motion::Actor(_))
    }

    pub fn kinematics(&self) -> Option<&Kinematics> {
        match &self.motion {
            Motion::Actor(body) => Some(body),
            _ => None,
        }
    }

    pub fn kinematics_mut(&mut self) -> Option<&mut Kinematics> {
        match &mut self.motion {
            Motion::Actor(body) => Some(body),
            _ => None,
        }
    }

    /// Velocity of the shape; zero for anything that is not the actor.
    pub fn velocity(&self) -> Vec2 {
        self.kinematics().map_or(Vec2::ZERO, |body| body.vel)
    }

    /// Advance time-dependent state by `dt` and rebuild current vertices.
    /// `dt == 0` only refreshes derived state from what is already stored.
    pub fn advance(&mut self, dt: f32) {
        let offset = match &mut self.motion {
            Motion::Static => return,
            Motion::Platform { motion, time } => {
                *time += dt;
                Vec2::new(0.0, motion.offset_at(*time))
            }
            Motion::Actor(body) => {
                body.integrate(dt);
                if let Some(texture) = &mut self.texture {
                    texture.uvs.clear();
                    texture.uvs.extend_from_slice(&body.frame_uvs());
                }
                body.pos
            }
        };

        self.current.clear();
        self.current.extend(self.base.iter().map(|v| *v + offset));
    }

    pub fn save_state(&self) -> ShapeState {
        match &self.motion {
            Motion::Static => ShapeState::Static,
            Motion::Platform { time, .. } => ShapeState::Platform { time: *time },
            Motion::Actor(body) => ShapeState::Actor {
                pos: body.pos,
                vel: body.vel,
                acc: body.acc,
                jumping: body.is_jumping(),
            },
        }
    }

    pub fn restore_state(&mut self, state: &ShapeState) -> Result<(), String> {
        match (&mut self.motion, state) {
            (Motion::Static, ShapeState::Static) => {}
            (Motion::Platform { time, .. }, ShapeState::Platform { time: saved }) => {
                *time = *saved;
            }
            (
                Motion::Actor(body),
                ShapeState::Actor {
                    pos,
                    vel,
                    acc,
                    jumping,
                },
            ) => body.restore(*pos, *vel, *acc, *jumping),
            _ => {
                return Err(format!(
                    "Restore failed: saved state {state:?} does not match shape variant"
                ));
            }
        }
        self.advance(0.0);
        Ok(())
    }

    pub fn draw_view(&self) -> PolygonDraw<'_> {
        PolygonDraw {
            vertices: &self.current,
            uvs: self.texture.as_ref().map(|t| t.uvs.as_slice()),
            color: self.color,
            texture: self.texture.as_ref().map(|t| t.key.as_str()),
            transparent: self.texture.as_ref().is_some_and(|t| t.transparent),
        }
    }
}

/// Check that a vertex list is a usable convex polygon: at least three
/// points, no zero-length edges, clockwise winding (y up) and no reflex
/// corners.
pub fn validate_polygon(vertices: &[Vec2]) -> Result<(), String> {
    if vertices.len() < 3 {
        return Err(format!(
            "Shape validation failed: need at least 3 vertices (got {})",
            vertices.len()
        ));
    }
    if let Some(v) = vertices.iter().find(|v| !v.is_finite()) {
        return Err(format!("Shape validation failed: non-finite vertex {v}"));
    }

    let n = vertices.len();
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        if a.distance(b) < MIN_EDGE_LENGTH {
            return Err(format!(
                "Shape validation failed: zero-length edge between vertices {} and {}",
                i,
                (i + 1) % n
            ));
        }
        twice_area += a.perp_dot(b);
    }
    if twice_area >= 0.0 {
        return Err("Shape validation failed: vertices must be in clockwise order".to_string());
    }

    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        let c = vertices[(i + 2) % n];
        if (b - a).perp_dot(c - b) > MIN_EDGE_LENGTH {
            return Err(format!(
                "Shape validation failed: polygon is not convex at vertex {}",
                (i + 1) % n
            ));
        }
    }
    Ok(())
}
