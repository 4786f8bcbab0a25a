//! Key tracking and the mapping from key transitions to actor commands.
//!
//! The host feeds raw `key_down` / `key_up` transitions in; each one yields at
//! most one [`InputEvent`], which [`apply_event`] turns into a velocity change
//! or a jump. Nothing here runs inside the step driver.

use std::collections::HashSet;

use serde::Deserialize;

use crate::shape::Shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Space,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    StopHorizontal,
    Jump,
    Quit,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press. Auto-repeat of an already held key produces nothing.
    pub fn key_down(&mut self, key: Key) -> Option<InputEvent> {
        if !self.held.insert(key) {
            return None;
        }
        Some(match key {
            Key::Left => InputEvent::MoveLeft,
            Key::Right => InputEvent::MoveRight,
            Key::Space => InputEvent::Jump,
            Key::Escape => InputEvent::Quit,
        })
    }

    /// Record a release. Letting go of one direction while the other is
    /// still down turns the actor that way instead of stopping it.
    pub fn key_up(&mut self, key: Key) -> Option<InputEvent> {
        if !self.held.remove(&key) {
            return None;
        }
        match key {
            Key::Left if self.is_held(Key::Right) => Some(InputEvent::MoveRight),
            Key::Right if self.is_held(Key::Left) => Some(InputEvent::MoveLeft),
            Key::Left | Key::Right => Some(InputEvent::StopHorizontal),
            Key::Space | Key::Escape => None,
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

/// Apply `event` to the actor. Returns `false` once the host should stop.
pub fn apply_event(actor: &mut Shape, event: InputEvent) -> bool {
    if event == InputEvent::Quit {
        return false;
    }
    let Some(body) = actor.kinematics_mut() else {
        log::warn!("Ignoring {event:?}: shape has no kinematics");
        return true;
    };
    match event {
        InputEvent::MoveLeft => body.walk(-1.0),
        InputEvent::MoveRight => body.walk(1.0),
        InputEvent::StopHorizontal => body.walk(0.0),
        InputEvent::Jump => {
            if !body.jump() {
                log::debug!("Jump ignored while airborne");
            }
        }
        InputEvent::Quit => {}
    }
    true
}
