//! One running level: world, input mapping, mesh and camera, advanced one
//! frame at a time by the host loop.

use glam::Vec2;

use stepdx_core::input::{self, InputState};
use stepdx_core::{PolygonDraw, PolygonSink, StepStats, World};
use stepdx_render::{Camera2D, MeshBuilder};

use crate::level::{Level, PlayingArea};
use crate::replay::FrameInput;

const BACKGROUND_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    pub frames: u64,
    pub substeps: u64,
    pub contacts: u64,
    pub simulated: f64,
}

pub struct Session {
    level_id: String,
    world: World,
    input: InputState,
    mesh: MeshBuilder,
    camera: Camera2D,
    playing_area: PlayingArea,
    background: Option<String>,
    stats: RunStats,
}

impl Session {
    pub fn new(level: Level, viewport: (u32, u32)) -> Self {
        let camera = Camera2D::new(
            viewport.0,
            viewport.1,
            level.playing_area.width,
            level.playing_area.height,
        );
        let mut session = Self {
            level_id: level.level_id,
            world: level.world,
            input: InputState::new(),
            mesh: MeshBuilder::new(),
            camera,
            playing_area: level.playing_area,
            background: level.background,
            stats: RunStats::default(),
        };
        session.rebuild_view();
        session
    }

    pub fn level_id(&self) -> &str {
        &self.level_id
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn mesh(&self) -> &MeshBuilder {
        &self.mesh
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Feed one frame's key transitions to the actor. Returns `false` when
    /// the player asked to quit.
    pub fn handle_input(&mut self, frame: &FrameInput) -> bool {
        let mut events = Vec::new();
        for key in &frame.release {
            events.extend(self.input.key_up(*key));
        }
        for key in &frame.press {
            events.extend(self.input.key_down(*key));
        }

        for event in events {
            log::debug!("input event {event:?}");
            if !input::apply_event(self.world.actor_mut(), event) {
                return false;
            }
        }
        true
    }

    /// Simulate `dt` seconds and refresh the mesh and camera.
    pub fn step(&mut self, dt: f32) -> StepStats {
        let step = self.world.frame(dt);
        self.stats.frames += 1;
        self.stats.substeps += u64::from(step.substeps);
        self.stats.contacts += u64::from(step.contacts);
        self.stats.simulated += f64::from(step.simulated);
        self.rebuild_view();
        step
    }

    fn rebuild_view(&mut self) {
        self.mesh.clear();
        if let Some(key) = &self.background {
            let (w, h) = (self.playing_area.width, self.playing_area.height);
            let vertices = [
                Vec2::new(0.0, 0.0),
                Vec2::new(0.0, h),
                Vec2::new(w, h),
                Vec2::new(w, 0.0),
            ];
            let uvs = [
                Vec2::new(0.0, 1.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
            ];
            self.mesh.draw_polygon(PolygonDraw {
                vertices: &vertices,
                uvs: Some(&uvs),
                color: BACKGROUND_COLOR,
                texture: Some(key.as_str()),
                transparent: false,
            });
        }
        self.world.draw(&mut self.mesh);

        if let Some(body) = self.world.actor().kinematics() {
            self.camera.follow(body.pos.x);
        }
    }
}
