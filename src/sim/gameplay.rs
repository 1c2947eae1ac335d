//! Game rules layered on top of the collision engine
//!
//! Reaction callbacks attached at spawn time, plus the consumer that turns
//! the engine's [`GameEvent`]s into sounds and score.

use glam::Vec2;
use log::{debug, info};
use rand::Rng;

use super::body::{Group, Movable, Projectile};
use super::state::{GameEvent, WorldContext};
use crate::audio::{SoundEffect, SoundQueue};
use crate::consts::ENEMY_ROCKET_SHIP_SPEED;

/// Score awarded for each hostile shot down
pub const HOSTILE_KILL_BONUS: u64 = 10;

/// Horizontal speed change per tick while a rocket steers toward the player
const ROCKET_TURN_RATE: f32 = 0.05;

/// Collision reaction for the player ship.
///
/// Damage itself is applied by the projectile pass after this runs.
pub fn player_reaction(sounds: SoundQueue, max_hp: i32) -> impl FnMut(Group, &mut Movable) + 'static {
    move |other, player| match other {
        Group::Nebula => player.in_nebula = true,
        Group::HealthPickup => {
            if player.hp < max_hp {
                player.hp += 1;
            }
            sounds.play(SoundEffect::Pickup);
        }
        g if g.is_hostile() => sounds.play(SoundEffect::Hurt),
        _ => {}
    }
}

/// Shrink an asteroid as it loses health, down to half its spawn size
pub fn asteroid_shrink(base: Vec2) -> impl FnMut(&mut WorldContext, &mut Projectile) + 'static {
    move |_, rock| {
        let scale = 0.5 + 0.5 * rock.health_ratio();
        rock.set_size_centered(base * scale);
    }
}

/// Grow a nebula by `rate` per tick until it reaches `max_size`
pub fn nebula_growth(max_size: f32, rate: f32) -> impl FnMut(&mut WorldContext, &mut Projectile) + 'static {
    move |_, nebula| {
        let grown = (nebula.body.size + Vec2::splat(rate)).min(Vec2::splat(max_size));
        nebula.set_size_centered(grown);
    }
}

/// Steer a rocket horizontally toward the player's last known position
pub fn rocket_homing() -> impl FnMut(&mut WorldContext, &mut Projectile) + 'static {
    move |ctx, rocket| {
        let Some(target) = ctx.player_center else {
            return;
        };
        let dx = target.x - rocket.body.center().x;
        if dx.abs() < 1.0 {
            return;
        }
        rocket.vel.x = (rocket.vel.x + dx.signum() * ROCKET_TURN_RATE)
            .clamp(-ENEMY_ROCKET_SHIP_SPEED, ENEMY_ROCKET_SHIP_SPEED);
    }
}

/// Does a projectile-vs-projectile contact deserve the hit sound?
fn audible_hit(group: Group, other: Group) -> bool {
    let involves_bullet = group == Group::PlayerBullet || other == Group::PlayerBullet;
    let involves_nebula = group == Group::Nebula || other == Group::Nebula;
    involves_bullet && !involves_nebula
}

/// Drain this tick's events: hit sounds with a random pitch and kill bonuses
pub fn handle_events(ctx: &mut WorldContext, rng: &mut impl Rng) {
    let events = std::mem::take(&mut ctx.events);

    for event in events {
        match event {
            GameEvent::ProjectileHit { group, other } => {
                if audible_hit(group, other) {
                    let pitch = rng.random_range(0.8..1.2);
                    ctx.sounds.play_pitched(SoundEffect::Hit, pitch);
                }
            }
            GameEvent::ProjectileDestroyed { group, by } => {
                if group.is_hostile() && by == Group::PlayerBullet {
                    ctx.score += HOSTILE_KILL_BONUS;
                    debug!("{} shot down, score {}", group.as_str(), ctx.score);
                }
            }
            GameEvent::MovableHit { group, by } => {
                debug!("{} hit by {}", group.as_str(), by.as_str());
            }
            GameEvent::MovableDestroyed { group, by } => {
                info!("{} destroyed by {}", group.as_str(), by.as_str());
            }
        }
    }
}
