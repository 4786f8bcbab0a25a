use std::sync::Arc;

use stepdx_core::{PolygonDraw, PolygonSink};

use crate::vertex::PolygonVertex;

/// Texture key for polygons drawn with flat colour only. The renderer binds a
/// 1x1 white texture under this key so one pipeline covers both cases.
pub const WHITE_TEXTURE_KEY: &str = "__white";

/// A contiguous run of indices that share the same texture binding and
/// blending mode.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub transparent: bool,
    pub index_start: u32,
    pub index_count: u32,
}

/// Collects polygons as triangle fans into one indexed mesh.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<PolygonVertex>,
    indices: Vec<u32>,
    draw_calls: Vec<DrawCall>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous frame's geometry, keeping allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    pub fn vertices(&self) -> &[PolygonVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl PolygonSink for MeshBuilder {
    fn draw_polygon(&mut self, polygon: PolygonDraw<'_>) {
        let n = polygon.vertices.len();
        if n < 3 {
            log::warn!("Skipping polygon with {n} vertices");
            return;
        }
        let uvs = match polygon.uvs {
            Some(uvs) if uvs.len() != n => {
                log::warn!(
                    "Polygon has {} texture coordinates for {n} vertices; drawing it untextured",
                    uvs.len()
                );
                None
            }
            uvs => uvs,
        };
        let base_index = self.vertices.len() as u32;

        for (i, v) in polygon.vertices.iter().enumerate() {
            let tex_coords = uvs.map_or([0.0, 0.0], |uvs| uvs[i].to_array());
            self.vertices.push(PolygonVertex {
                position: v.to_array(),
                tex_coords,
                color: polygon.color,
            });
        }

        let draw_start = self.indices.len() as u32;
        for i in 1..(n as u32 - 1) {
            self.indices
                .extend_from_slice(&[base_index, base_index + i, base_index + i + 1]);
        }

        let texture_key = match (polygon.texture, uvs) {
            (Some(key), Some(_)) => key,
            _ => WHITE_TEXTURE_KEY,
        };
        push_draw_call(
            &mut self.draw_calls,
            Arc::from(texture_key),
            polygon.transparent,
            draw_start,
            (n as u32 - 2) * 3,
        );
    }
}

/// Append a draw call, merging with the previous one when texture and blend
/// mode match and the indices are contiguous. Shapes are drawn in world order,
/// so neighbouring shapes on the same texture collapse into one call.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: Arc<str>,
    transparent: bool,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && last.transparent == transparent && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        transparent,
        index_start,
        index_count,
    });
}

/// Number of texture binds a renderer needs to walk `draw_calls` in order.
pub fn count_texture_binds(draw_calls: &[DrawCall]) -> usize {
    let mut binds = 0usize;
    let mut current: Option<&str> = None;
    for draw in draw_calls {
        let key: &str = &draw.texture_key;
        if current != Some(key) {
            current = Some(key);
            binds += 1;
        }
    }
    binds
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ]
    }

    fn flat(vertices: &[Vec2]) -> PolygonDraw<'_> {
        PolygonDraw {
            vertices,
            uvs: None,
            color: [1.0, 0.0, 0.0, 1.0],
            texture: None,
            transparent: false,
        }
    }

    #[test]
    fn polygon_becomes_triangle_fan() {
        let pentagon = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(1.0, 0.0),
        ];
        let mut mesh = MeshBuilder::new();
        mesh.draw_polygon(flat(&pentagon));

        assert_eq!(mesh.vertices().len(), 5);
        assert_eq!(mesh.indices(), &[0, 1, 2, 0, 2, 3, 0, 3, 4]);
        assert_eq!(mesh.draw_calls().len(), 1);
        assert_eq!(mesh.draw_calls()[0].index_count, 9);
    }

    #[test]
    fn untextured_polygon_uses_white_texture() {
        let vertices = square();
        let mut mesh = MeshBuilder::new();
        mesh.draw_polygon(flat(&vertices));
        assert_eq!(&*mesh.draw_calls()[0].texture_key, WHITE_TEXTURE_KEY);
        assert!(mesh.vertices().iter().all(|v| v.tex_coords == [0.0, 0.0]));
        assert_eq!(mesh.vertices()[2].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn textured_polygon_keeps_uvs() {
        let vertices = square();
        let uvs = vec![
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
        ];
        let mut mesh = MeshBuilder::new();
        mesh.draw_polygon(PolygonDraw {
            uvs: Some(&uvs),
            texture: Some("ground"),
            ..flat(&vertices)
        });
        assert_eq!(&*mesh.draw_calls()[0].texture_key, "ground");
        assert_eq!(mesh.vertices()[1].tex_coords, [0.0, 0.0]);
        assert_eq!(mesh.vertices()[3].tex_coords, [1.0, 1.0]);
    }

    #[test]
    fn same_texture_runs_merge() {
        let vertices = square();
        let mut mesh = MeshBuilder::new();
        mesh.draw_polygon(flat(&vertices));
        mesh.draw_polygon(flat(&vertices));
        mesh.draw_polygon(PolygonDraw {
            transparent: true,
            ..flat(&vertices)
        });
        mesh.draw_polygon(flat(&vertices));

        let calls = mesh.draw_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].index_count, 12);
        assert_eq!(calls[1].index_start, 12);
        assert!(calls[1].transparent);
        assert_eq!(count_texture_binds(calls), 1);
    }

    #[test]
    fn texture_switches_are_counted() {
        let calls = [
            DrawCall {
                texture_key: Arc::from("a"),
                transparent: false,
                index_start: 0,
                index_count: 6,
            },
            DrawCall {
                texture_key: Arc::from("b"),
                transparent: false,
                index_start: 6,
                index_count: 6,
            },
            DrawCall {
                texture_key: Arc::from("a"),
                transparent: true,
                index_start: 12,
                index_count: 6,
            },
        ];
        assert_eq!(count_texture_binds(&calls), 3);
    }

    #[test]
    fn clear_resets_mesh() {
        let vertices = square();
        let mut mesh = MeshBuilder::new();
        mesh.draw_polygon(flat(&vertices));
        assert_eq!(mesh.vertex_bytes().len(), 4 * PolygonVertex::STRIDE);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
        mesh.clear();
        assert!(mesh.vertices().is_empty());
        assert!(mesh.indices().is_empty());
        assert!(mesh.draw_calls().is_empty());
    }

    #[test]
    fn mismatched_uvs_fall_back_to_flat_colour() {
        let vertices = square();
        let uvs = vec![Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.0)];
        let mut mesh = MeshBuilder::new();
        mesh.draw_polygon(PolygonDraw {
            uvs: Some(&uvs),
            texture: Some("ground"),
            ..flat(&vertices)
        });
        assert_eq!(mesh.vertices().len(), 4);
        assert!(mesh.vertices().iter().all(|v| v.tex_coords == [0.0, 0.0]));
        assert_eq!(&*mesh.draw_calls()[0].texture_key, WHITE_TEXTURE_KEY);
    }

    #[test]
    fn degenerate_polygon_is_skipped() {
        let line = vec![Vec2::ZERO, Vec2::X];
        let mut mesh = MeshBuilder::new();
        mesh.draw_polygon(flat(&line));
        assert!(mesh.vertices().is_empty());
    }
}
