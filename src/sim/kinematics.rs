//! Velocity/position integration
//!
//! Velocity integrates acceleration scaled by `dt`, but position advances by
//! the raw velocity once per tick. Speeds throughout the game are therefore
//! expressed in units per tick at the fixed 60 Hz rate.

use glam::Vec2;

use super::body::{Group, Movable, Projectile};
use super::pool::Pool;
use super::rect::Rect;
use crate::consts::{GRAVITY, NEBULA_DRAG};

/// Advance every live movable, then every live projectile
pub fn advance_kinematics(
    dt: f32,
    playfield: Rect,
    movables: &mut Pool<Movable>,
    projectiles: &mut Pool<Projectile>,
) {
    integrate_movables(dt, playfield, movables);
    integrate_projectiles(dt, projectiles);
}

pub fn integrate_movables(dt: f32, playfield: Rect, movables: &mut Pool<Movable>) {
    for (_, m) in movables.iter_mut() {
        if m.gravity_enabled {
            m.accel.y += GRAVITY;
        }

        if m.in_nebula {
            m.accel *= NEBULA_DRAG;
            m.in_nebula = false;
        }

        m.vel += m.accel * dt;

        if m.body.group == Group::Player {
            clamp_to_playfield(m, playfield);
        }

        m.body.pos += m.vel;
        m.accel = Vec2::ZERO;
        m.vel *= m.friction;
    }
}

pub fn integrate_projectiles(dt: f32, projectiles: &mut Pool<Projectile>) {
    for (_, p) in projectiles.iter_mut() {
        if p.gravity_enabled {
            p.accel.y += GRAVITY;
        }

        p.vel += p.accel * dt;
        p.body.pos += p.vel;
        p.accel = Vec2::ZERO;
        p.vel *= p.friction;
    }
}

/// Stop the player at the playfield edge its next step would cross
fn clamp_to_playfield(m: &mut Movable, playfield: Rect) {
    let future = m.body.pos + m.vel;
    let max = Vec2::new(
        playfield.right() - m.body.size.x,
        playfield.bottom() - m.body.size.y,
    );

    if future.x < playfield.left() {
        m.vel.x = 0.0;
        m.body.pos.x = playfield.left();
    }
    if future.y < playfield.top() {
        m.vel.y = 0.0;
        m.body.pos.y = playfield.top();
    }
    if future.x > max.x {
        m.vel.x = 0.0;
        m.body.pos.x = max.x;
    }
    if future.y > max.y {
        m.vel.y = 0.0;
        m.body.pos.y = max.y;
    }
}
