//! Adaptive-substep driver: advances the actor and the world through one
//! frame's worth of wall-clock time and resolves interpenetration.
//!
//! Substeps are capped both in duration and in how far the actor may travel,
//! so a fast actor cannot jump over a thin platform between two tests. Each
//! substep advances the actor, then every world shape, then tests the actor
//! against each shape in order and pushes it out of anything it sank into.

use glam::Vec2;
use serde::Deserialize;

use crate::collision::{self, Contact};
use crate::shape::Shape;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Longest substep in seconds.
    pub max_substep: f32,
    /// Furthest the actor may move along either axis in one substep.
    pub max_displacement: f32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            max_substep: 0.05,
            max_displacement: 0.05,
        }
    }
}

/// Per-call bookkeeping, mostly for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepStats {
    pub substeps: u32,
    pub contacts: u32,
    pub simulated: f32,
}

/// Length of the next substep given the time still to simulate and the
/// actor's current velocity.
pub fn substep_len(remaining: f32, velocity: Vec2, config: &StepConfig) -> f32 {
    let mut step = remaining.min(config.max_substep);
    let max_speed = velocity.x.abs().max(velocity.y.abs());
    if max_speed > 0.0 {
        step = step.min(config.max_displacement / max_speed);
    }
    step
}

/// Advance `actor` and `world` by `real_dt` seconds of wall-clock time.
///
/// Negative or non-finite deltas are treated as zero. If the actor moves so
/// fast that a substep no longer makes progress, the rest of the frame is
/// skipped.
pub fn advance(
    actor: &mut Shape,
    world: &mut [Shape],
    real_dt: f32,
    config: &StepConfig,
) -> StepStats {
    let mut stats = StepStats::default();
    let mut remaining = if real_dt.is_finite() { real_dt.max(0.0) } else { 0.0 };

    while remaining > 0.0 {
        let step = substep_len(remaining, actor.velocity(), config);
        if step.is_nan() || step <= 0.0 || remaining - step == remaining {
            log::warn!(
                "Actor velocity {} is too large to substep; dropping {:.4}s of this frame",
                actor.velocity(),
                remaining
            );
            break;
        }

        actor.advance(step);
        for shape in world.iter_mut() {
            shape.advance(step);
        }

        for shape in world.iter() {
            if let Some(contact) = collision::test_shapes(actor, shape) {
                log::trace!(
                    "contact: normal ({:.3}, {:.3}) depth {:.4} owner {:?}",
                    contact.normal.x,
                    contact.normal.y,
                    contact.depth,
                    contact.owner
                );
                resolve_contact(actor, &contact);
                stats.contacts += 1;
            }
        }

        remaining -= step;
        stats.substeps += 1;
        stats.simulated += step;
    }

    stats
}

/// Push the actor out along the contact normal and stop it on every axis the
/// normal touches, then refresh its geometry without advancing time.
///
/// Velocity is zeroed per axis rather than projected onto the normal, so a
/// sloped contact stops both components.
pub fn resolve_contact(actor: &mut Shape, contact: &Contact) {
    if let Some(body) = actor.kinematics_mut() {
        body.pos += contact.push_out_first();
        if contact.normal.x != 0.0 {
            body.vel.x = 0.0;
        }
        if contact.normal.y != 0.0 {
            body.vel.y = 0.0;
        }
    }
    actor.advance(0.0);
}
