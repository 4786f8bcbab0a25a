//! JSON level files: world geometry, actor setup and playing-area size.

use glam::Vec2;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use stepdx_core::shape::DEFAULT_COLOR;
use stepdx_core::{
    ActorConfig, Kinematics, PlatformMotion, Shape, StepConfig, World, WorldBounds,
};

const SUPPORTED_VERSION: &str = "0.1";

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    #[serde(default)]
    pub playing_area: PlayingArea,
    /// Horizontal limits on the actor. Absent means the default bounds.
    #[serde(default)]
    pub bounds: Option<WorldBounds>,
    #[serde(default)]
    pub step: StepConfig,
    /// Texture stretched over the whole playing area behind the world.
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub actor: LevelActor,
    pub shapes: Vec<LevelShape>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PlayingArea {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayingArea {
    fn default() -> Self {
        Self {
            width: 32.0,
            height: 4.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelActor {
    #[serde(flatten)]
    pub config: ActorConfig,
    #[serde(default = "default_actor_vertices")]
    pub vertices: Vec<[f32; 2]>,
    #[serde(default = "default_actor_color")]
    pub color: [f32; 4],
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default = "default_transparent_sprite")]
    pub transparent: bool,
}

impl Default for LevelActor {
    fn default() -> Self {
        Self {
            config: ActorConfig::default(),
            vertices: default_actor_vertices(),
            color: default_actor_color(),
            texture: None,
            transparent: default_transparent_sprite(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Static,
    Platform,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelShape {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub kind: ShapeKind,
    pub vertices: Vec<[f32; 2]>,
    /// Per-vertex texture coordinates. Textured shapes without them get
    /// coordinates spanning the polygon's bounding box.
    #[serde(default)]
    pub uvs: Option<Vec<[f32; 2]>>,
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub max_height: Option<f32>,
}

/// A validated level, ready to simulate.
#[derive(Debug, Clone)]
pub struct Level {
    pub level_id: String,
    pub playing_area: PlayingArea,
    pub background: Option<String>,
    pub world: World,
}

pub fn load_level_from_path(level_path: &Path) -> Result<Level, String> {
    let raw = fs::read_to_string(level_path)
        .map_err(|e| format!("Failed to read level file {}: {e}", level_path.display()))?;
    let file: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", level_path.display()))?;
    build_level(&file)
}

/// Validate `file` and build the world it describes.
pub fn build_level(file: &LevelFile) -> Result<Level, String> {
    validate_header(file)?;

    let actor = build_actor(&file.actor)?;
    let mut shapes = Vec::with_capacity(file.shapes.len());
    let mut ids = HashSet::new();
    for (index, spec) in file.shapes.iter().enumerate() {
        let label = spec.id.clone().unwrap_or_else(|| format!("#{index}"));
        if let Some(id) = &spec.id {
            if !ids.insert(id.as_str()) {
                return Err(format!("Level validation failed: duplicate shape id '{id}'"));
            }
        }
        let shape = build_shape(spec)
            .map_err(|e| format!("Level validation failed: shape {label}: {e}"))?;
        shapes.push(shape);
    }
    if shapes.is_empty() {
        log::warn!(
            "Level '{}' has no shapes. The actor will fall forever.",
            file.level_id
        );
    }

    let world = World::new(actor, shapes)?
        .with_bounds(Some(file.bounds.unwrap_or_default()))
        .with_step_config(file.step);

    Ok(Level {
        level_id: file.level_id.clone(),
        playing_area: file.playing_area,
        background: file.background.clone(),
        world,
    })
}

fn validate_header(file: &LevelFile) -> Result<(), String> {
    if file.version != SUPPORTED_VERSION {
        return Err(format!(
            "Level validation failed: unsupported version '{}' (expected '{SUPPORTED_VERSION}')",
            file.version
        ));
    }
    if file.level_id.trim().is_empty() {
        return Err("Level validation failed: level_id is empty".to_string());
    }
    let area = file.playing_area;
    let finite = area.width.is_finite() && area.height.is_finite();
    if !finite || area.width <= 0.0 || area.height <= 0.0 {
        return Err(format!(
            "Level validation failed: playing area must be positive (got {} x {})",
            area.width, area.height
        ));
    }
    if let Some(bounds) = file.bounds {
        if bounds.min_x.is_nan() || bounds.max_x.is_nan() || bounds.min_x > bounds.max_x {
            return Err(format!(
                "Level validation failed: bounds min_x {} exceeds max_x {}",
                bounds.min_x, bounds.max_x
            ));
        }
    }
    if file.step.max_substep <= 0.0 || file.step.max_displacement <= 0.0 {
        return Err("Level validation failed: step limits must be > 0".to_string());
    }
    Ok(())
}

fn build_actor(spec: &LevelActor) -> Result<Shape, String> {
    let vertices = to_vec2(&spec.vertices);
    let actor = Shape::actor(vertices, Kinematics::new(spec.config))
        .map_err(|e| format!("Level validation failed: actor: {e}"))?
        .with_color(spec.color);
    match &spec.texture {
        Some(key) => {
            // Coordinates are replaced by sprite frames on every advance.
            let uvs = actor
                .kinematics()
                .map(|body| body.frame_uvs().to_vec())
                .unwrap_or_default();
            actor
                .with_texture(key.as_str(), uvs, spec.transparent)
                .map_err(|e| format!("Level validation failed: actor: {e}"))
        }
        None => Ok(actor),
    }
}

fn build_shape(spec: &LevelShape) -> Result<Shape, String> {
    let vertices = to_vec2(&spec.vertices);
    let shape = match spec.kind {
        ShapeKind::Static => {
            if spec.speed.is_some() || spec.max_height.is_some() {
                log::warn!("Static shape has platform motion fields; they are ignored");
            }
            Shape::fixed(vertices)?
        }
        ShapeKind::Platform => {
            let defaults = PlatformMotion::default();
            Shape::platform(
                vertices,
                PlatformMotion {
                    speed: spec.speed.unwrap_or(defaults.speed),
                    max_height: spec.max_height.unwrap_or(defaults.max_height),
                },
            )?
        }
    }
    .with_color(spec.color);

    match (&spec.texture, &spec.uvs) {
        (Some(key), Some(uvs)) => shape.with_texture(key.as_str(), to_vec2(uvs), spec.transparent),
        (Some(key), None) => {
            let uvs = bounding_box_uvs(shape.base_vertices());
            shape.with_texture(key.as_str(), uvs, spec.transparent)
        }
        (None, Some(_)) => {
            log::warn!("Shape has uvs but no texture; they are ignored");
            Ok(shape)
        }
        (None, None) => Ok(shape),
    }
}

/// Map each vertex into the unit square spanned by the polygon's bounding
/// box, with v growing downwards.
fn bounding_box_uvs(vertices: &[Vec2]) -> Vec<Vec2> {
    let min = vertices.iter().copied().fold(Vec2::splat(f32::MAX), Vec2::min);
    let max = vertices.iter().copied().fold(Vec2::splat(f32::MIN), Vec2::max);
    let size = (max - min).max(Vec2::splat(f32::EPSILON));
    vertices
        .iter()
        .map(|v| Vec2::new((v.x - min.x) / size.x, (max.y - v.y) / size.y))
        .collect()
}

fn to_vec2(points: &[[f32; 2]]) -> Vec<Vec2> {
    points.iter().copied().map(Vec2::from).collect()
}

fn default_actor_vertices() -> Vec<[f32; 2]> {
    vec![[-0.1, 0.0], [-0.1, 0.5], [0.1, 0.5], [0.1, 0.0]]
}

const fn default_actor_color() -> [f32; 4] {
    [1.0, 0.0, 0.0, 1.0]
}

const fn default_color() -> [f32; 4] {
    DEFAULT_COLOR
}

const fn default_transparent_sprite() -> bool {
    true
}
