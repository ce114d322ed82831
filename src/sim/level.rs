//! Level construction and spatial queries
//!
//! Entities are split into the environment (everything the cube can stand on
//! or trigger) and hazards. Query results list environment contacts before
//! hazard contacts, each in construction order; the cube's resolution passes
//! rely on that order being stable.

use super::collision::{Contact, Rect};
use super::entity::{Entity, EntityId, EntityKind};
use super::spec::{LevelSpec, Span};
use crate::consts::GROUND_ROW;
use crate::error::LevelError;
use crate::renderer::Surface;
use crate::tuning::Tuning;

/// A built, scrolling level
#[derive(Debug, Clone)]
pub struct Level {
    pub id: u32,
    environment: Vec<Entity>,
    hazards: Vec<Entity>,
}

impl Level {
    /// Instantiate one entity per tile of the specification, then shift the
    /// whole level left by `start_offset` pixels.
    pub fn build(spec: &LevelSpec, start_offset: f32, tuning: &Tuning) -> Result<Self, LevelError> {
        spec.validate()?;

        let mut environment = Vec::new();
        let mut hazards = Vec::new();

        for x in spec.ground.0..spec.ground.1 {
            environment.push(Entity::new(EntityKind::Ground, x, GROUND_ROW, tuning));
        }
        push_spans(&mut environment, &spec.platforms, EntityKind::Platform, tuning);
        for &(x, y) in &spec.checkpoints {
            environment.push(Entity::new(EntityKind::Checkpoint, x, y, tuning));
        }
        push_spans(&mut hazards, &spec.spikes, EntityKind::Spikes, tuning);
        push_spans(
            &mut environment,
            &spec.inverters,
            EntityKind::GravityInverter { triggered: false },
            tuning,
        );
        push_spans(&mut environment, &spec.boosts, EntityKind::SpeedBoost, tuning);
        environment.push(Entity::new(EntityKind::End, spec.end.0, spec.end.1, tuning));

        for entity in environment.iter_mut().chain(hazards.iter_mut()) {
            entity.offset_horizontal(-start_offset);
        }

        log::info!(
            "Built level {}: {} environment tiles, {} hazards, start offset {}",
            spec.id,
            environment.len(),
            hazards.len(),
            start_offset
        );

        Ok(Self {
            id: spec.id,
            environment,
            hazards,
        })
    }

    pub fn environment(&self) -> &[Entity] {
        &self.environment
    }

    pub fn hazards(&self) -> &[Entity] {
        &self.hazards
    }

    /// Every entity with its id, environment first
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        let env = self
            .environment
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId::Environment(i), e));
        let haz = self
            .hazards
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId::Hazard(i), e));
        env.chain(haz)
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.environment.iter_mut().chain(self.hazards.iter_mut())
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        match id {
            EntityId::Environment(i) => self.environment.get(i),
            EntityId::Hazard(i) => self.hazards.get(i),
        }
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match id {
            EntityId::Environment(i) => self.environment.get_mut(i),
            EntityId::Hazard(i) => self.hazards.get_mut(i),
        }
    }

    /// The level's end marker (always the last environment entity)
    pub fn end_marker(&self) -> Option<&Entity> {
        self.environment
            .last()
            .filter(|e| e.kind == EntityKind::End)
    }

    /// Give every entity an inherited world speed
    pub fn set_acceleration(&mut self, acceleration: f32) {
        for entity in self.entities_mut() {
            entity.set_acceleration(acceleration);
        }
    }

    /// Entities whose margin-expanded hitbox meets the margin-expanded cube box
    pub fn get_collisions(&self, cube: &Rect, margin: f32) -> Vec<Contact> {
        let probe = cube.expand(margin);
        self.iter()
            .filter_map(|(id, entity)| {
                let hitbox = entity.hitbox();
                probe.intersects(&hitbox.expand(margin)).then_some(Contact {
                    id,
                    kind: entity.kind,
                    hitbox,
                })
            })
            .collect()
    }

    /// Hand every entity to the surface; off-screen culling is the surface's job
    pub fn draw(&self, surface: &mut dyn Surface) {
        for (_, entity) in self.iter() {
            surface.draw_entity(entity.visual, entity.hitbox().min);
        }
    }
}

fn push_spans(out: &mut Vec<Entity>, spans: &[Span], kind: EntityKind, tuning: &Tuning) {
    for span in spans {
        for x in span.columns() {
            out.push(Entity::new(kind, x, span.row(), tuning));
        }
    }
}
