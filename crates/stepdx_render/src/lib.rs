//! CPU-side render preparation: turns the polygons a world hands out into
//! indexed vertex data and texture-batched draw calls, and builds the camera
//! uniform. No GPU objects are created here.

pub mod camera;
pub mod mesh;
pub mod vertex;

pub use camera::{Camera2D, CameraUniform};
pub use mesh::{count_texture_binds, DrawCall, MeshBuilder, WHITE_TEXTURE_KEY};
pub use vertex::PolygonVertex;
