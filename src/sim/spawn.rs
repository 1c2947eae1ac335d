//! Frame-driven spawn schedule and player shots
//!
//! Everything that enters the field does so from here, drawing randomness
//! from the state's seeded RNG so runs replay exactly.

use glam::Vec2;
use log::{debug, trace};
use rand::Rng;

use super::body::{Group, Projectile, colors};
use super::gameplay;
use super::pool::Handle;
use super::state::GameState;
use crate::audio::SoundEffect;
use crate::consts::*;

/// Size range of freshly spawned asteroids
const ASTEROID_SIZE: std::ops::Range<f32> = 10.0..50.0;
/// Speed multiplier range applied to ENEMY_MOVEMENT_SPEED
const ASTEROID_SPEED: std::ops::Range<f32> = 1.0..2.0;
const ROCKET_SIZE: Vec2 = Vec2::new(8.0, 16.0);
const NEBULA_START_SIZE: f32 = 20.0;
const NEBULA_MAX_SIZE: std::ops::Range<f32> = 60.0..100.0;
const NEBULA_GROWTH: f32 = 0.2;
const PICKUP_SIZE: Vec2 = Vec2::splat(10.0);
const BULLET_SIZE: Vec2 = Vec2::splat(10.0);
/// Sideways speed of the outer bullets in a split shot
const SPLIT_SPREAD: f32 = 1.5;

/// `every == 0` disables a spawner
fn due(frame: u64, every: u64) -> bool {
    every > 0 && frame % every == 0
}

/// Run every spawner due on the current frame, then fire if requested
pub fn run_schedule(state: &mut GameState, shooting: bool) {
    let frame = state.ctx.frame;
    let schedule = state.settings.spawn.clone();

    if due(frame, schedule.asteroid_every) {
        spawn_asteroid(state);
    }
    if frame > 0 && due(frame, schedule.rocket_every) {
        spawn_rocket(state);
    }
    if frame > 0 && due(frame, schedule.nebula_every) {
        spawn_nebula(state);
    }
    if frame > 0 && due(frame, schedule.health_every) {
        spawn_health_pickup(state);
    }

    if frame > 0 && due(frame, state.settings.ammo_regen_every) && state.ammo < state.settings.player_max_ammo {
        state.ammo += 1;
    }

    if shooting {
        shoot(state);
    }
}

/// Random x such that an object of `width` starts fully inside the playfield
fn random_x(state: &mut GameState, width: f32) -> f32 {
    let field = state.ctx.playfield;
    let max = (field.right() - width).max(field.left() + 1.0);
    state.rng.random_range(field.left()..max)
}

pub fn spawn_asteroid(state: &mut GameState) -> Handle {
    let side = state.rng.random_range(ASTEROID_SIZE);
    let speed = state.rng.random_range(ASTEROID_SPEED) * ENEMY_MOVEMENT_SPEED;
    let x = random_x(state, side);
    let size = Vec2::splat(side);

    let mut rock = Projectile::new(
        Vec2::new(x, state.ctx.playfield.top() - PROJECTILE_MARGIN + 1.0),
        size,
        colors::CYAN,
        Group::Asteroid,
    )
    .with_layers(LAYER_HOSTILE, LAYER_PLAYER)
    .with_velocity(Vec2::new(0.0, speed))
    .with_hp(state.settings.asteroid_hp);
    rock.reactions.set_on_tick(gameplay::asteroid_shrink(size));

    trace!("asteroid {side:.1} at x={x:.1}");
    state.projectiles.insert(rock)
}

pub fn spawn_rocket(state: &mut GameState) -> Handle {
    let x = random_x(state, ROCKET_SIZE.x);
    let mut rocket = Projectile::new(
        Vec2::new(x, state.ctx.playfield.top() - 40.0),
        ROCKET_SIZE,
        colors::ORANGE,
        Group::EnemyRocket,
    )
    .with_layers(LAYER_HOSTILE, LAYER_PLAYER)
    .with_velocity(Vec2::new(0.0, ENEMY_ROCKET_SHIP_SPEED))
    .with_hp(state.settings.rocket_hp);
    rocket.reactions.set_on_tick(gameplay::rocket_homing());

    debug!("enemy rocket launched at x={x:.1}");
    state.projectiles.insert(rocket)
}

/// Harmless cloud that slows the player down while they are inside it
pub fn spawn_nebula(state: &mut GameState) -> Handle {
    let max_size = state.rng.random_range(NEBULA_MAX_SIZE);
    let x = random_x(state, NEBULA_START_SIZE);
    let mut nebula = Projectile::new(
        Vec2::new(x, state.ctx.playfield.top() - 45.0),
        Vec2::splat(NEBULA_START_SIZE),
        colors::PURPLE,
        Group::Nebula,
    )
    .with_layers(LAYER_HOSTILE, LAYER_PLAYER)
    .with_velocity(Vec2::new(0.0, NEBULA_MOVEMENT_SPEED));
    nebula.enable_damage = false;
    nebula.take_damage = false;
    nebula.disappear_on_hit = false;
    nebula.reactions.set_on_tick(gameplay::nebula_growth(max_size, NEBULA_GROWTH));

    debug!("nebula drifting in at x={x:.1}");
    state.projectiles.insert(nebula)
}

/// Pickup that restores one point of health; bullets pass through it
pub fn spawn_health_pickup(state: &mut GameState) -> Handle {
    let x = random_x(state, PICKUP_SIZE.x);
    let mut pickup = Projectile::new(
        Vec2::new(x, state.ctx.playfield.top() - 20.0),
        PICKUP_SIZE,
        colors::PINK,
        Group::HealthPickup,
    )
    .with_layers(LAYER_PICKUP, LAYER_PLAYER)
    .with_velocity(Vec2::new(0.0, ENEMY_MOVEMENT_SPEED));
    pickup.enable_damage = false;
    pickup.take_damage = false;
    pickup.scans_projectiles = false;

    debug!("health pickup at x={x:.1}");
    state.projectiles.insert(pickup)
}

/// Fire from the player's nose if the cooldown has elapsed and ammo remains.
///
/// Returns the number of bullets spawned.
pub fn shoot(state: &mut GameState) -> usize {
    if state.ctx.frame < state.next_shooting_frame || state.ammo == 0 {
        return 0;
    }
    let Some(player) = state.player() else {
        return 0;
    };
    if player.hp <= 0 {
        return 0;
    }

    let muzzle = Vec2::new(
        player.body.center().x - BULLET_SIZE.x * 0.5,
        player.body.top() - BULLET_SIZE.y,
    );
    let mut spreads = vec![0.0];
    if state.split_shot {
        spreads.extend([-SPLIT_SPREAD, SPLIT_SPREAD]);
    }

    for dx in &spreads {
        let bullet = Projectile::new(muzzle, BULLET_SIZE, colors::MAGENTA, Group::PlayerBullet)
            .with_layers(LAYER_FRIENDLY, LAYER_HOSTILE)
            .with_velocity(Vec2::new(*dx, -PLAYER_BULLET_SPEED));
        state.projectiles.insert(bullet);
    }

    state.ammo -= 1;
    state.next_shooting_frame = state.ctx.frame + state.settings.spawn.shot_every;
    state.ctx.sounds.play(SoundEffect::Shoot);
    trace!("fired {} bullet(s), {} ammo left", spreads.len(), state.ammo);
    spreads.len()
}
