//! Live entity collections
//!
//! Enemies, projectiles and floating effects are kept in insertion order.
//! Collision resolution relies on that order as its tie-break, so nothing
//! here ever reorders entries.

use serde::{Deserialize, Serialize};

use super::state::{Enemy, EntityId, FloatingEffect, Projectile};

/// Owner of every transient entity on the playfield
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRegistry {
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    effects: Vec<FloatingEffect>,
}

impl EntityRegistry {
    pub fn spawn_enemy(&mut self, enemy: Enemy) -> EntityId {
        let id = enemy.id;
        self.enemies.push(enemy);
        id
    }

    pub fn spawn_projectile(&mut self, projectile: Projectile) -> EntityId {
        let id = projectile.id;
        self.projectiles.push(projectile);
        id
    }

    pub fn spawn_effect(&mut self, effect: FloatingEffect) -> EntityId {
        let id = effect.id;
        self.effects.push(effect);
        id
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn effects(&self) -> &[FloatingEffect] {
        &self.effects
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Remove a single enemy by id
    pub fn take_enemy(&mut self, id: EntityId) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(index))
    }

    /// Remove every enemy matching `predicate` (which may also mutate the
    /// enemies it keeps), returning the removed ones in registry order
    pub fn remove_enemies_where(&mut self, mut predicate: impl FnMut(&mut Enemy) -> bool) -> Vec<Enemy> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.enemies.len());
        for mut enemy in self.enemies.drain(..) {
            if predicate(&mut enemy) {
                removed.push(enemy);
            } else {
                kept.push(enemy);
            }
        }
        self.enemies = kept;
        removed
    }

    /// Keep only projectiles for which `keep` returns true
    pub fn retain_projectiles_where(&mut self, keep: impl FnMut(&mut Projectile) -> bool) {
        self.projectiles.retain_mut(keep);
    }

    /// Age every effect by one tick, drift it upward and drop expired ones
    pub fn age_and_prune_effects(&mut self, drift: f32) {
        self.effects.retain_mut(|effect| {
            effect.life = effect.life.saturating_sub(1);
            effect.pos.y -= drift;
            effect.life > 0
        });
    }

    /// Split borrow used by collision resolution
    pub(crate) fn projectiles_and_enemies_mut(&mut self) -> (&mut Vec<Projectile>, &mut [Enemy]) {
        (&mut self.projectiles, &mut self.enemies)
    }

    /// True if a shootable enemy in `lane` is still above `max_y`
    pub fn has_target_in_lane(&self, lane: usize, max_y: f32) -> bool {
        self.enemies
            .iter()
            .any(|e| !e.kind.is_bonus() && e.lane == lane && e.y < max_y)
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
        self.effects.clear();
    }
}
