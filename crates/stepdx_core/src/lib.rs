//! Simulation core for the StepDX platformer.
//!
//! Everything in here is a pure function of (current state, dt): shapes carry
//! their own time-dependent geometry, the collision test is stateless, and the
//! step driver advances an actor through a world with adaptive substeps.
//! Rendering, windowing and file loading live in the other crates and only
//! see this crate through [`draw::PolygonSink`] and validated vertex lists.

pub mod actor;
pub mod collision;
pub mod draw;
pub mod input;
pub mod shape;
pub mod sprite;
pub mod step;
pub mod time;
pub mod world;

pub use actor::{ActorConfig, Kinematics};
pub use collision::{Contact, VertexOwner};
pub use draw::{PolygonDraw, PolygonSink};
pub use shape::{Motion, PlatformMotion, Shape, ShapeState, TextureBinding};
pub use sprite::SpriteSheet;
pub use step::{StepConfig, StepStats};
pub use world::{Snapshot, World, WorldBounds};
