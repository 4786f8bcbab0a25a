//! Read-only hand-off from the simulation to whatever draws it.

use glam::Vec2;

/// Everything a renderer needs to draw one polygon as a triangle fan.
#[derive(Debug, Clone, Copy)]
pub struct PolygonDraw<'a> {
    pub vertices: &'a [Vec2],
    /// Per-vertex texture coordinates, present only for textured shapes.
    pub uvs: Option<&'a [Vec2]>,
    pub color: [f32; 4],
    pub texture: Option<&'a str>,
    pub transparent: bool,
}

pub trait PolygonSink {
    fn draw_polygon(&mut self, polygon: PolygonDraw<'_>);
}
