//! Fixed timestep simulation tick
//!
//! Advances the session deterministically: restart handling, player
//! movement, spawning, enemy pursuit, the sword, contact damage, pickups.

use glam::Vec2;

use super::collision::collides;
use super::entity::EntityKind;
use super::movement::{check_terrain, try_move};
use super::state::{GameEvent, GamePhase, GameState};
use super::steering::steer_pack;

/// Cardinal step direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit step in grid space (y grows downward)
    pub fn delta(self) -> Vec2 {
        match self {
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Start a new session once the game is over
    pub restart: bool,
}

impl TickInput {
    /// Held direction; left beats right beats up beats down
    pub fn direction(&self) -> Option<Direction> {
        if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else if self.up {
            Some(Direction::Up)
        } else if self.down {
            Some(Direction::Down)
        } else {
            None
        }
    }

    pub fn toward(direction: Direction) -> Self {
        let mut input = Self::default();
        match direction {
            Direction::Left => input.left = true,
            Direction::Right => input.right = true,
            Direction::Up => input.up = true,
            Direction::Down => input.down = true,
        }
        input
    }
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if state.phase == GamePhase::GameOver {
        if input.restart {
            *state = state.reset();
            state.events.push(GameEvent::Restarted);
        }
        return;
    }

    state.time_ticks += 1;
    state.elapsed += dt;

    move_player(state, input);
    run_spawners(state, dt);

    let target = state.player.centroid();
    steer_pack(
        &mut state.enemies,
        target,
        &state.grid,
        &state.obstacles,
        state.settings.collision_check_distance,
    );

    swing_sword(state, dt);
    apply_contact_damage(state, dt);
    if state.phase == GamePhase::GameOver {
        return;
    }
    collect_potions(state);
}

fn move_player(state: &mut GameState, input: &TickInput) {
    if state.player_move_cooldown > 0 {
        state.player_move_cooldown -= 1;
        return;
    }
    let Some(direction) = input.direction() else {
        return;
    };

    let proposed = state.player.anchor + direction.delta() * state.settings.player_step;
    // Enemies never block the player; contact is resolved as damage instead
    if try_move(&mut state.player, proposed, &state.grid, &state.obstacles, &[]) {
        state.player_move_cooldown = state.settings.player_move_delay;
    }
}

fn run_spawners(state: &mut GameState, dt: f32) {
    if state.enemy_spawn.advance(dt) && state.spawn_enemy().is_none() {
        log::debug!("Enemy spawn skipped at tick {}", state.time_ticks);
    }
    if state.potion_spawn.advance(dt) && state.spawn_potion().is_none() {
        log::debug!("Potion spawn skipped at tick {}", state.time_ticks);
    }
}

fn swing_sword(state: &mut GameState, dt: f32) {
    state.sword.update(dt);
    let origin = state.player.centroid();
    if let Some(hits) = state.sword.try_fire(origin, &mut state.enemies) {
        log::debug!("Sword swing at tick {} hit {} enemies", state.time_ticks, hits.len());
        state.events.push(GameEvent::SwordSwing { hits });
        state.reap_dead();
    }
}

fn apply_contact_damage(state: &mut GameState, dt: f32) {
    state.contact_cooldown = (state.contact_cooldown - dt).max(0.0);
    if state.contact_cooldown > 0.0 {
        return;
    }
    if !state.enemies.iter().any(|e| collides(&state.player, e)) {
        return;
    }

    let damage = state.settings.enemy_contact_damage;
    state.player.take_damage(damage);
    state.contact_cooldown = state.settings.enemy_contact_cooldown;
    let remaining = state.player_hp();
    state.events.push(GameEvent::PlayerHit { damage, remaining });
    log::debug!("Player hit for {damage}, {remaining} HP left");

    if state.player.is_dead() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!(
            "Game over at tick {}: {} kills in {:.1}s",
            state.time_ticks,
            state.kills,
            state.elapsed
        );
    }
}

fn collect_potions(state: &mut GameState) {
    let player = &mut state.player;
    let events = &mut state.events;
    state.pickups.retain(|potion| {
        if !collides(player, potion) {
            return true;
        }
        let heal = match potion.kind {
            EntityKind::Pickup { heal_amount } => heal_amount,
            _ => 0,
        };
        player.heal(heal);
        events.push(GameEvent::PotionCollected { id: potion.id, heal });
        log::debug!("Potion {} collected (+{heal} HP)", potion.id.0);
        false
    });
}

/// Distance from the player under which the autopilot stops chasing potions
const AUTOPILOT_DANGER: f32 = 12.0;

/// Simple input source for headless runs: restart when over, otherwise flee
/// the nearest enemy, detouring for potions when hurt and nothing is close.
pub fn autopilot(state: &GameState) -> TickInput {
    if state.is_over() {
        return TickInput {
            restart: true,
            ..Default::default()
        };
    }

    let here = state.player.centroid();
    let nearest_enemy = state
        .enemies
        .iter()
        .map(|e| e.centroid())
        .min_by(|a, b| a.distance_squared(here).total_cmp(&b.distance_squared(here)));
    let nearest_potion = state
        .pickups
        .iter()
        .map(|p| p.centroid())
        .min_by(|a, b| a.distance_squared(here).total_cmp(&b.distance_squared(here)));
    let hurt = state.player.health.is_some_and(|h| h.current() < h.max());

    let safe = nearest_enemy.is_none_or(|enemy| enemy.distance(here) > AUTOPILOT_DANGER);
    let seek_potion = match (nearest_potion, nearest_enemy) {
        (Some(potion), _) if hurt && safe => Some(potion),
        (_, Some(_)) => None,
        _ => return TickInput::default(),
    };

    let step = state.settings.player_step;
    let mut best: Option<(Direction, f32)> = None;
    for direction in Direction::ALL {
        let proposed = state.player.anchor + direction.delta() * step;
        if !check_terrain(&state.player, proposed, &state.grid, &state.obstacles).is_moved() {
            continue;
        }
        let centroid = state.player.shape.centroid_at(proposed);
        let value = match (seek_potion, nearest_enemy) {
            (Some(potion), _) => -centroid.distance_squared(potion),
            (None, Some(enemy)) => centroid.distance_squared(enemy),
            (None, None) => 0.0,
        };
        if best.is_none_or(|(_, b)| value > b) {
            best = Some((direction, value));
        }
    }

    best.map_or_else(TickInput::default, |(direction, _)| TickInput::toward(direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::settings::Settings;
    use crate::sim::entity::Entity;
    use crate::sim::shape::Shape;

    fn quiet_settings() -> Settings {
        Settings {
            enemy_spawn_interval: 1000.0,
            potion_spawn_interval: 1000.0,
            ..Settings::default()
        }
    }

    #[test]
    fn test_direction_priority() {
        let input = TickInput {
            left: true,
            right: true,
            up: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Some(Direction::Left));
        let input = TickInput {
            right: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Some(Direction::Right));
        assert_eq!(TickInput::default().direction(), None);
    }

    #[test]
    fn test_player_step_and_delay() {
        let mut state = GameState::new(quiet_settings(), 1);
        let input = TickInput::toward(Direction::Right);

        tick(&mut state, &input, FRAME_DT);
        assert_eq!(state.player.anchor, Vec2::new(35.0, 34.0));

        for _ in 0..3 {
            tick(&mut state, &input, FRAME_DT);
        }
        assert_eq!(state.player.anchor, Vec2::new(35.0, 34.0));

        tick(&mut state, &input, FRAME_DT);
        assert_eq!(state.player.anchor, Vec2::new(36.0, 34.0));
    }

    #[test]
    fn test_player_blocked_by_obstacle() {
        let mut state = GameState::new(quiet_settings(), 1);
        // Just below the 4x2 wall at (33, 10)
        state.player.anchor = Vec2::new(34.0, 12.0);
        tick(&mut state, &TickInput::toward(Direction::Up), FRAME_DT);
        assert_eq!(state.player.anchor, Vec2::new(34.0, 12.0));
        assert_eq!(state.player_move_cooldown, 0);
    }

    #[test]
    fn test_player_stays_on_grid() {
        let mut state = GameState::new(quiet_settings(), 1);
        state.player.anchor = Vec2::new(0.0, 30.0);
        tick(&mut state, &TickInput::toward(Direction::Left), FRAME_DT);
        assert_eq!(state.player.anchor, Vec2::new(0.0, 30.0));
    }

    #[test]
    fn test_enemies_close_in() {
        let mut state = GameState::new(quiet_settings(), 1);
        let id = state.next_entity_id();
        state
            .enemies
            .push(Entity::enemy(id, Vec2::new(5.0, 35.0), Shape::single(), 0.15, 50));
        let before = state.enemies[0].centroid().distance(state.player.centroid());
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), FRAME_DT);
        }
        let after = state.enemies[0].centroid().distance(state.player.centroid());
        assert!(after < before);
    }

    #[test]
    fn test_contact_damage_until_game_over() {
        let settings = Settings {
            player_max_hp: 20,
            enemy_max_hp: 1000,
            ..quiet_settings()
        };
        let mut state = GameState::new(settings, 1);
        let id = state.next_entity_id();
        // Sits on the player's centre cell with zero steering distance
        state
            .enemies
            .push(Entity::enemy(id, Vec2::new(35.0, 35.0), Shape::single(), 0.15, 1000));

        tick(&mut state, &TickInput::default(), 0.5);
        assert_eq!(state.player_hp(), 10);
        assert!(state.events.contains(&GameEvent::PlayerHit {
            damage: 10,
            remaining: 10
        }));

        tick(&mut state, &TickInput::default(), 0.5);
        assert_eq!(state.player_hp(), 10);

        tick(&mut state, &TickInput::default(), 0.5);
        assert_eq!(state.player_hp(), 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));

        // Frozen until restart
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), 0.5);
        assert_eq!(state.time_ticks, ticks);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = GameState::with_seed(7);
        state.phase = GamePhase::GameOver;
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, FRAME_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.seed, 8);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.events, vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_potion_heals_once() {
        let mut state = GameState::new(quiet_settings(), 1);
        state.player.take_damage(50);
        let id = state.next_entity_id();
        state
            .pickups
            .push(Entity::health_potion(id, Vec2::new(34.0, 34.0), 20));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.player_hp(), 70);
        assert!(state.pickups.is_empty());
        assert!(state.events.contains(&GameEvent::PotionCollected { id, heal: 20 }));

        tick(&mut state, &TickInput::default(), FRAME_DT);
        assert_eq!(state.player_hp(), 70);
    }

    #[test]
    fn test_sword_kills_and_counts() {
        let mut state = GameState::new(quiet_settings(), 1);
        let id = state.next_entity_id();
        state
            .enemies
            .push(Entity::enemy(id, Vec2::new(38.0, 35.0), Shape::single(), 0.0, 50));

        // Sword becomes ready after one second of ticks
        tick(&mut state, &TickInput::default(), 1.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.kills, 1);
        assert!(state.events.contains(&GameEvent::SwordSwing {
            hits: vec![id]
        }));
        assert!(state.events.contains(&GameEvent::EnemySlain { id }));
    }

    #[test]
    fn test_spawns_over_time() {
        let mut state = GameState::with_seed(3);
        // 2.5 seconds: one enemy at 2.0 s, no potion yet
        for _ in 0..150 {
            tick(&mut state, &TickInput::default(), FRAME_DT);
        }
        assert_eq!(state.enemies.len(), 1);
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = GameState::with_seed(99);
        let mut b = GameState::with_seed(99);
        for _ in 0..1200 {
            let input_a = autopilot(&a);
            let input_b = autopilot(&b);
            assert_eq!(input_a, input_b);
            tick(&mut a, &input_a, FRAME_DT);
            tick(&mut b, &input_b, FRAME_DT);
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_autopilot_flees() {
        let mut state = GameState::new(quiet_settings(), 1);
        let id = state.next_entity_id();
        state
            .enemies
            .push(Entity::enemy(id, Vec2::new(40.0, 35.0), Shape::single(), 0.15, 50));
        assert_eq!(autopilot(&state).direction(), Some(Direction::Left));

        state.phase = GamePhase::GameOver;
        assert!(autopilot(&state).restart);
    }
}
