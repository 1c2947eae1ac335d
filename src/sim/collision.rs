//! AABB collision detection and response
//!
//! Three passes run once per tick after integration, in this order:
//! static-vs-movable, movable-vs-movable, then projectiles against everything.
//! All tests use swept rectangles, so objects are separated before the next
//! tick commits them to an overlapping position.

use log::trace;

use super::body::{Movable, Projectile, StaticBody};
use super::pool::Pool;
use super::reaction::fire_collision;
use super::rect::overlap;
use super::state::{GameEvent, WorldContext};
use crate::consts::PROJECTILE_MARGIN;

/// Direction of motion along one axis: -1, 0 or 1
#[inline]
fn direction(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Push movables out of static bodies along the shallower axis.
///
/// The full overlap goes to the movable. Static geometry is never written;
/// the pool is only borrowed mutably so static reactions can run.
pub fn resolve_static_collisions(statics: &mut Pool<StaticBody>, movables: &mut Pool<Movable>) {
    for (_, m) in movables.iter_mut() {
        let rect_a = m.swept_rect();

        for (_, s) in statics.iter_mut() {
            if !m.body.scans(&s.body) {
                continue;
            }

            let rect_b = s.body.rect();
            if !rect_a.intersects(&rect_b) {
                continue;
            }

            let o = overlap(&rect_a, &rect_b);
            if o.x < o.y {
                m.body.pos.x -= o.x * direction(m.vel.x);
            } else {
                m.body.pos.y -= o.y * direction(m.vel.y);
            }
            trace!("{} pushed out of {} by {:?}", m.body.group.as_str(), s.body.group.as_str(), o);

            let (m_group, s_group) = (m.body.group, s.body.group);
            fire_collision(m, s_group);
            fire_collision(s, m_group);
        }
    }
}

/// Separate overlapping movables, splitting the correction evenly.
///
/// Every ordered pair is visited, so layer filtering applies from both sides.
/// The resolution axis is x only when its overlap is smaller *and* A's bottom
/// minus the y overlap is still below B's top; otherwise y. Both objects move
/// by half the overlap, opposite to A's motion on that axis.
pub fn resolve_movable_collisions(movables: &mut Pool<Movable>) {
    let len = movables.len();

    for i in 0..len {
        let rect_a = match movables.slot(i) {
            Some(a) if a.collision_enabled => a.swept_rect(),
            _ => continue,
        };

        for j in 0..len {
            if i == j {
                continue;
            }
            let Some((a, b)) = movables.pair_mut(i, j) else {
                continue;
            };
            if a.id == b.id || !a.body.scans(&b.body) {
                continue;
            }

            let rect_b = b.swept_rect();
            if !rect_a.intersects(&rect_b) {
                continue;
            }

            let o = overlap(&rect_a, &rect_b);
            if o.x < o.y && rect_a.bottom() - o.y > rect_b.top() {
                let push = o.x * direction(a.vel.x) * 0.5;
                a.body.pos.x -= push;
                b.body.pos.x += push;
            } else {
                let push = o.y * direction(a.vel.y) * 0.5;
                a.body.pos.y -= push;
                b.body.pos.y += push;
            }
            trace!("{} / {} separated by {:?}", a.body.group.as_str(), b.body.group.as_str(), o);

            let (a_group, b_group) = (a.body.group, b.body.group);
            fire_collision(a, b_group);
            fire_collision(b, a_group);
        }
    }
}

/// Exchange damage between projectiles and movables; no repositioning.
///
/// Projectiles outside the playfield (grown by [`PROJECTILE_MARGIN`]) are
/// tombstoned first. Each surviving projectile then interacts with at most
/// one other projectile and at most one movable per tick: the first match in
/// pool order wins.
pub fn resolve_projectile_collisions(
    ctx: &mut WorldContext,
    projectiles: &mut Pool<Projectile>,
    movables: &mut Pool<Movable>,
) {
    let bounds = ctx.playfield.expanded(PROJECTILE_MARGIN);

    for i in 0..projectiles.len() {
        let Some(p) = projectiles.slot(i) else {
            continue;
        };
        let rect_p = p.swept_rect();

        if !bounds.intersects(&rect_p) {
            trace!("{} left the playfield", p.body.group.as_str());
            projectiles.remove(i);
            continue;
        }

        if p.scans_projectiles {
            projectile_vs_projectiles(ctx, projectiles, i);
        }

        // May have been destroyed above
        let Some(p) = projectiles.slot_mut(i) else {
            continue;
        };
        if projectile_vs_movables(ctx, p, movables) {
            projectiles.remove(i);
        }
    }
}

/// First-hit scan of projectile `i` against every other projectile
fn projectile_vs_projectiles(ctx: &mut WorldContext, projectiles: &mut Pool<Projectile>, i: usize) {
    let Some(rect_p) = projectiles.slot(i).map(Projectile::swept_rect) else {
        return;
    };

    for j in 0..projectiles.len() {
        if i == j {
            continue;
        }
        if projectiles.slot(i).is_none() {
            return;
        }
        let Some((p, q)) = projectiles.pair_mut(i, j) else {
            continue;
        };
        if p.id == q.id || !p.body.scans(&q.body) {
            continue;
        }
        if !rect_p.intersects(&q.swept_rect()) {
            continue;
        }

        let p_damaged = p.take_damage && q.enable_damage;
        let q_damaged = q.take_damage && p.enable_damage;
        if p_damaged {
            p.hp -= 1;
        }
        if q_damaged {
            q.hp -= 1;
        }

        let (p_group, q_group) = (p.body.group, q.body.group);
        fire_collision(p, q_group);
        ctx.events.push(GameEvent::ProjectileHit {
            group: p_group,
            other: q_group,
        });
        fire_collision(q, p_group);

        let (p_dead, q_dead) = (p.hp <= 0, q.hp <= 0);
        if p_dead {
            projectiles.remove(i);
            ctx.events.push(GameEvent::ProjectileDestroyed {
                group: p_group,
                by: q_group,
            });
        }
        if q_dead {
            projectiles.remove(j);
            ctx.events.push(GameEvent::ProjectileDestroyed {
                group: q_group,
                by: p_group,
            });
        }
        trace!("{} hit {}", p_group.as_str(), q_group.as_str());
        return;
    }
}

/// First-hit scan of a projectile against the movables.
///
/// Returns true when the projectile was consumed.
fn projectile_vs_movables(ctx: &mut WorldContext, p: &mut Projectile, movables: &mut Pool<Movable>) -> bool {
    let rect_p = p.swept_rect();

    for k in 0..movables.len() {
        let Some(m) = movables.slot_mut(k) else {
            continue;
        };
        if !p.body.scans(&m.body) {
            continue;
        }
        if !rect_p.intersects(&m.swept_rect()) {
            continue;
        }

        let (p_group, m_group) = (p.body.group, m.body.group);
        fire_collision(p, m_group);
        fire_collision(m, p_group);

        if p.enable_damage {
            m.hp -= 1;
            ctx.events.push(GameEvent::MovableHit {
                group: m_group,
                by: p_group,
            });
        }
        if m.hp <= 0 {
            movables.remove(k);
            ctx.events.push(GameEvent::MovableDestroyed {
                group: m_group,
                by: p_group,
            });
        }
        trace!("{} struck {}", p_group.as_str(), m_group.as_str());
        return p.disappear_on_hit;
    }

    false
}
