//! Game session state
//!
//! The session exclusively owns the live collections. Restarting builds a
//! fresh session with [`GameState::reset`] which the caller swaps in.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind};
use super::movement::Grid;
use super::shape::{CellBounds, Shape};
use super::spawn::{self, IntervalTimer};
use super::weapon::Sword;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Player health reached zero; waiting for restart
    GameOver,
}

/// Things that happened during the last tick, for presentation and audio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: EntityId },
    PotionSpawned { id: EntityId },
    SwordSwing { hits: Vec<EntityId> },
    EnemySlain { id: EntityId },
    PlayerHit { damage: u32, remaining: u32 },
    PotionCollected { id: EntityId, heal: u32 },
    GameOver,
    Restarted,
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub grid: Grid,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,
    pub kills: u32,
    pub player: Entity,
    /// Live collections, insertion ordered
    pub enemies: Vec<Entity>,
    pub obstacles: Vec<Entity>,
    pub pickups: Vec<Entity>,
    pub sword: Sword,
    /// Ticks until the player may step again
    pub player_move_cooldown: u32,
    /// Seconds until contact damage applies again
    pub contact_cooldown: f32,
    pub enemy_spawn: IntervalTimer,
    pub potion_spawn: IntervalTimer,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new session from settings and a seed
    pub fn new(settings: Settings, seed: u64) -> Self {
        let grid = settings.grid();
        let player_start = settings.player_start();
        let mut state = Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            grid,
            phase: GamePhase::Playing,
            time_ticks: 0,
            elapsed: 0.0,
            kills: 0,
            player: Entity::player(EntityId(0), player_start, settings.player_max_hp),
            enemies: Vec::new(),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            sword: settings.sword(),
            player_move_cooldown: 0,
            contact_cooldown: 0.0,
            enemy_spawn: IntervalTimer::new(settings.enemy_spawn_interval),
            potion_spawn: IntervalTimer::new(settings.potion_spawn_interval),
            events: Vec::new(),
            next_id: 1,
            settings,
        };

        let rects = state.settings.obstacles.clone();
        for rect in rects {
            let id = state.next_entity_id();
            match Entity::obstacle(id, rect.origin(), rect.width, rect.height) {
                Ok(obstacle) => state.obstacles.push(obstacle),
                Err(err) => log::warn!("Skipping obstacle {rect:?}: {err}"),
            }
        }

        log::info!(
            "Session started: seed={}, grid={}x{}, obstacles={}",
            seed,
            state.grid.cols,
            state.grid.rows,
            state.obstacles.len()
        );
        state
    }

    /// New session with default settings
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Settings::default(), seed)
    }

    /// A fresh session with the same settings and the next seed
    pub fn reset(&self) -> Self {
        log::info!("Restarting session (kills={}, ticks={})", self.kills, self.time_ticks);
        Self::new(self.settings.clone(), self.seed.wrapping_add(1))
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn player_hp(&self) -> u32 {
        self.player.health.map_or(0, |h| h.current())
    }

    /// Spawn an enemy on a random edge. Returns `None` when capped or no free spot was found.
    pub fn spawn_enemy(&mut self) -> Option<EntityId> {
        if self.enemies.len() >= self.settings.max_enemies {
            return None;
        }
        let shape = spawn::pick_shape(&mut self.rng, &self.settings.enemy_shapes)?.clone();
        let blocked = [
            self.obstacles.as_slice(),
            self.enemies.as_slice(),
            std::slice::from_ref(&self.player),
        ];
        let anchor = spawn::enemy_anchor(&mut self.rng, &shape, &self.grid, &blocked)?;

        let id = self.next_entity_id();
        self.enemies.push(Entity::enemy(
            id,
            anchor,
            shape,
            self.settings.enemy_speed,
            self.settings.enemy_max_hp,
        ));
        self.events.push(GameEvent::EnemySpawned { id });
        log::debug!("Enemy {} spawned at ({}, {})", id.0, anchor.x, anchor.y);
        Some(id)
    }

    /// Spawn a health potion at a random free spot
    pub fn spawn_potion(&mut self) -> Option<EntityId> {
        if self.pickups.len() >= self.settings.max_potions {
            return None;
        }
        let shape = Shape::health_glyph();
        let blocked = [
            self.obstacles.as_slice(),
            self.pickups.as_slice(),
            self.enemies.as_slice(),
            std::slice::from_ref(&self.player),
        ];
        let anchor = spawn::open_anchor(&mut self.rng, &shape, &self.grid, &blocked)?;

        let id = self.next_entity_id();
        self.pickups
            .push(Entity::health_potion(id, anchor, self.settings.potion_heal));
        self.events.push(GameEvent::PotionSpawned { id });
        log::debug!("Potion {} spawned at ({}, {})", id.0, anchor.x, anchor.y);
        Some(id)
    }

    /// Remove dead enemies, keeping the order of the survivors
    pub fn reap_dead(&mut self) -> Vec<EntityId> {
        let mut slain = Vec::new();
        self.enemies.retain(|enemy| {
            if enemy.is_dead() {
                slain.push(enemy.id);
                false
            } else {
                true
            }
        });
        for &id in &slain {
            self.events.push(GameEvent::EnemySlain { id });
            log::debug!("Enemy {} slain", id.0);
        }
        self.kills += slain.len() as u32;
        slain
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot {
        let entities = std::iter::once(&self.player)
            .chain(&self.obstacles)
            .chain(&self.pickups)
            .chain(&self.enemies)
            .map(EntityView::from)
            .collect();
        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            player_hp: self.player_hp(),
            player_max_hp: self.player.health.map_or(0, |h| h.max()),
            kills: self.kills,
            sword_effect: self.sword.effect_strength(),
            sword_range: self.sword.range,
            entities,
        }
    }
}

/// One entity as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub cells: Vec<IVec2>,
    pub bounds: CellBounds,
    pub centroid: Vec2,
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind,
            cells: entity.occupied_cells().collect(),
            bounds: entity.bounding_box(),
            centroid: entity.centroid(),
        }
    }
}

/// Post-tick state handed to presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub kills: u32,
    /// 1.0 right after a swing, fading to 0.0
    pub sword_effect: f32,
    pub sword_range: f32,
    pub entities: Vec<EntityView>,
}
