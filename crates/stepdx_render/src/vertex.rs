#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PolygonVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

impl PolygonVertex {
    /// Byte offsets of (position, tex_coords, color), for whoever builds the
    /// vertex buffer layout.
    pub const ATTRIBUTE_OFFSETS: [usize; 3] = [
        std::mem::offset_of!(PolygonVertex, position),
        std::mem::offset_of!(PolygonVertex, tex_coords),
        std::mem::offset_of!(PolygonVertex, color),
    ];

    pub const STRIDE: usize = std::mem::size_of::<PolygonVertex>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(PolygonVertex::STRIDE, 32);
        assert_eq!(PolygonVertex::ATTRIBUTE_OFFSETS, [0, 8, 16]);
    }

    #[test]
    fn casts_to_bytes() {
        let vertices = [PolygonVertex {
            position: [1.0, 2.0],
            tex_coords: [0.0, 0.0],
            color: [1.0; 4],
        }; 3];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 3 * PolygonVertex::STRIDE);
    }
}
