use serde::Deserialize;

use crate::draw::PolygonSink;
use crate::shape::{Shape, ShapeState};
use crate::step::{self, StepConfig, StepStats};

/// Horizontal limits on the actor's position.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min_x: 0.4,
            max_x: 31.6,
        }
    }
}

/// Saved time-dependent state of every shape in a [`World`].
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    actor: ShapeState,
    shapes: Vec<ShapeState>,
}

/// The actor plus the world geometry it moves through.
#[derive(Debug, Clone)]
pub struct World {
    actor: Shape,
    shapes: Vec<Shape>,
    bounds: Option<WorldBounds>,
    step_config: StepConfig,
}

impl World {
    pub fn new(actor: Shape, shapes: Vec<Shape>) -> Result<Self, String> {
        if !actor.is_actor() {
            return Err("World validation failed: actor shape has no kinematics".to_string());
        }
        if let Some(index) = shapes.iter().position(Shape::is_actor) {
            return Err(format!(
                "World validation failed: world shape {index} is a second actor"
            ));
        }
        Ok(Self {
            actor,
            shapes,
            bounds: Some(WorldBounds::default()),
            step_config: StepConfig::default(),
        })
    }

    pub fn with_bounds(mut self, bounds: Option<WorldBounds>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_step_config(mut self, step_config: StepConfig) -> Self {
        self.step_config = step_config;
        self
    }

    pub fn actor(&self) -> &Shape {
        &self.actor
    }

    /// Mutable access for input handling between frames.
    pub fn actor_mut(&mut self) -> &mut Shape {
        &mut self.actor
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn bounds(&self) -> Option<WorldBounds> {
        self.bounds
    }

    /// Simulate one frame of `real_dt` seconds, then keep the actor inside
    /// the horizontal bounds.
    pub fn frame(&mut self, real_dt: f32) -> StepStats {
        let stats = step::advance(
            &mut self.actor,
            &mut self.shapes,
            real_dt,
            &self.step_config,
        );

        if let Some(bounds) = self.bounds {
            let mut clamped = false;
            if let Some(body) = self.actor.kinematics_mut() {
                let x = body.pos.x.max(bounds.min_x).min(bounds.max_x);
                clamped = x != body.pos.x;
                body.pos.x = x;
            }
            if clamped {
                self.actor.advance(0.0);
            }
        }

        log::trace!(
            "frame dt {:.4}: {} substeps, {} contacts",
            real_dt,
            stats.substeps,
            stats.contacts
        );
        stats
    }

    pub fn save_state(&self) -> Snapshot {
        Snapshot {
            actor: self.actor.save_state(),
            shapes: self.shapes.iter().map(Shape::save_state).collect(),
        }
    }

    pub fn restore_state(&mut self, snapshot: &Snapshot) -> Result<(), String> {
        if snapshot.shapes.len() != self.shapes.len() {
            return Err(format!(
                "Restore failed: snapshot has {} shapes, world has {}",
                snapshot.shapes.len(),
                self.shapes.len()
            ));
        }
        self.actor.restore_state(&snapshot.actor)?;
        for (shape, state) in self.shapes.iter_mut().zip(&snapshot.shapes) {
            shape.restore_state(state)?;
        }
        Ok(())
    }

    /// Hand world shapes, then the actor on top, to `sink`.
    pub fn draw(&self, sink: &mut impl PolygonSink) {
        for shape in &self.shapes {
            sink.draw_polygon(shape.draw_view());
        }
        sink.draw_polygon(self.actor.draw_view());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorConfig, Kinematics};
    use crate::draw::PolygonDraw;
    use crate::shape::PlatformMotion;
    use glam::Vec2;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(x0, y0),
            Vec2::new(x0, y1),
            Vec2::new(x1, y1),
            Vec2::new(x1, y0),
        ]
    }

    fn sample_world() -> World {
        let actor = Shape::actor(
            rect(-0.2, 0.0, 0.2, 1.0),
            Kinematics::new(ActorConfig::default()),
        )
        .expect("valid actor");
        let floor = Shape::fixed(rect(0.0, 0.0, 32.0, 1.0)).expect("valid floor");
        let lift = Shape::platform(rect(5.0, 1.5, 6.0, 1.7), PlatformMotion::default())
            .expect("valid platform");
        World::new(actor, vec![floor, lift]).expect("valid world")
    }

    #[derive(Default)]
    struct Recorder {
        counts: Vec<usize>,
        textured: usize,
    }

    impl PolygonSink for Recorder {
        fn draw_polygon(&mut self, polygon: PolygonDraw<'_>) {
            self.counts.push(polygon.vertices.len());
            if polygon.uvs.is_some() {
                self.textured += 1;
            }
        }
    }

    #[test]
    fn rejects_world_without_actor() {
        let floor = Shape::fixed(rect(0.0, 0.0, 1.0, 1.0)).expect("valid floor");
        let err = World::new(floor, Vec::new()).expect_err("needs an actor");
        assert!(err.contains("no kinematics"));
    }

    #[test]
    fn rejects_second_actor() {
        let make_actor = || {
            Shape::actor(
                rect(-0.2, 0.0, 0.2, 1.0),
                Kinematics::new(ActorConfig::default()),
            )
            .expect("valid actor")
        };
        let err = World::new(make_actor(), vec![make_actor()]).expect_err("one actor only");
        assert!(err.contains("second actor"));
    }

    #[test]
    fn bounds_keep_actor_in_play_area() {
        let mut world = sample_world();
        world.actor_mut().kinematics_mut().unwrap().walk(-1.0);
        for _ in 0..30 {
            world.frame(1.0 / 60.0);
        }
        let body = world.actor().kinematics().unwrap();
        assert_eq!(body.pos.x, 0.4);
        // Velocity is left alone, only position is limited.
        assert_eq!(body.vel.x, -5.0);
        assert!((world.actor().vertices()[0].x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn unbounded_world_lets_actor_leave() {
        let mut world = sample_world().with_bounds(None);
        world.actor_mut().kinematics_mut().unwrap().walk(-1.0);
        for _ in 0..30 {
            world.frame(1.0 / 60.0);
        }
        assert!(world.actor().kinematics().unwrap().pos.x < 0.0);
    }

    #[test]
    fn restore_rewinds_actor_and_platforms() {
        let mut world = sample_world();
        world.frame(0.2);
        let snapshot = world.save_state();
        let actor_vertices = world.actor().vertices().to_vec();
        let lift_vertices = world.shapes()[1].vertices().to_vec();

        world.actor_mut().kinematics_mut().unwrap().walk(1.0);
        for _ in 0..10 {
            world.frame(1.0 / 60.0);
        }
        assert_ne!(lift_vertices, world.shapes()[1].vertices());

        world.restore_state(&snapshot).expect("same world layout");
        assert_eq!(actor_vertices, world.actor().vertices());
        assert_eq!(lift_vertices, world.shapes()[1].vertices());
    }

    #[test]
    fn restore_rejects_foreign_snapshot() {
        let mut world = sample_world();
        let other = World::new(world.actor().clone(), Vec::new()).expect("valid world");
        let err = world
            .restore_state(&other.save_state())
            .expect_err("shape count differs");
        assert!(err.contains("snapshot has 0 shapes"));
    }

    #[test]
    fn draw_visits_world_then_actor() {
        let world = sample_world();
        let mut recorder = Recorder::default();
        world.draw(&mut recorder);
        assert_eq!(recorder.counts, vec![4, 4, 4]);
        assert_eq!(recorder.textured, 0);
    }

    #[test]
    fn frames_are_deterministic() {
        let mut run_a = sample_world();
        let mut run_b = sample_world();
        for i in 0..240 {
            for world in [&mut run_a, &mut run_b] {
                if i == 30 {
                    world.actor_mut().kinematics_mut().unwrap().walk(1.0);
                }
                if i == 60 {
                    world.actor_mut().kinematics_mut().unwrap().jump();
                }
                world.frame(1.0 / 60.0);
            }
        }
        assert_eq!(run_a.save_state(), run_b.save_state());
        assert_eq!(run_a.actor().vertices(), run_b.actor().vertices());
    }
}
