//! Per-object gameplay hooks
//!
//! Each object may carry a collision reaction, fired by the collision passes
//! with the other side's [`Group`], and a per-tick callback, fired once per
//! frame before integration with the shared [`WorldContext`].

use std::fmt;

use super::body::{Body, Group};
use super::pool::Pool;
use super::state::WorldContext;

pub type CollisionFn<T> = dyn FnMut(Group, &mut T);
pub type TickFn<T> = dyn FnMut(&mut WorldContext, &mut T);

/// Callback slots for an object of type `T`
pub struct Reactions<T> {
    on_collision: Option<Box<CollisionFn<T>>>,
    on_tick: Option<Box<TickFn<T>>>,
}

impl<T> Default for Reactions<T> {
    fn default() -> Self {
        Self {
            on_collision: None,
            on_tick: None,
        }
    }
}

impl<T> fmt::Debug for Reactions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactions")
            .field("on_collision", &self.on_collision.is_some())
            .field("on_tick", &self.on_tick.is_some())
            .finish()
    }
}

impl<T> Reactions<T> {
    pub fn set_on_collision(&mut self, f: impl FnMut(Group, &mut T) + 'static) {
        self.on_collision = Some(Box::new(f));
    }

    pub fn set_on_tick(&mut self, f: impl FnMut(&mut WorldContext, &mut T) + 'static) {
        self.on_tick = Some(Box::new(f));
    }

    pub fn has_on_collision(&self) -> bool {
        self.on_collision.is_some()
    }

    pub fn has_on_tick(&self) -> bool {
        self.on_tick.is_some()
    }
}

/// Uniform access to the parts of an object the engine dispatches on
pub trait Reactive: Sized {
    fn body(&self) -> &Body;
    fn reactions(&mut self) -> &mut Reactions<Self>;
}

/// Run `obj`'s collision reaction (if any) against `other`.
///
/// The callback is taken out for the duration of the call so it can borrow
/// `obj` mutably; a replacement installed by the callback wins.
pub fn fire_collision<T: Reactive>(obj: &mut T, other: Group) {
    let Some(mut callback) = obj.reactions().on_collision.take() else {
        return;
    };
    callback(other, obj);
    let slot = &mut obj.reactions().on_collision;
    if slot.is_none() {
        *slot = Some(callback);
    }
}

/// Run `obj`'s per-tick callback (if any)
pub fn fire_tick<T: Reactive>(ctx: &mut WorldContext, obj: &mut T) {
    let Some(mut callback) = obj.reactions().on_tick.take() else {
        return;
    };
    callback(ctx, obj);
    let slot = &mut obj.reactions().on_tick;
    if slot.is_none() {
        *slot = Some(callback);
    }
}

/// Fire the per-tick callback of every live object, in pool order
pub fn run_per_tick_callbacks<T: Reactive>(ctx: &mut WorldContext, pool: &mut Pool<T>) {
    for (_, obj) in pool.iter_mut() {
        fire_tick(ctx, obj);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{Movable, Projectile, colors};
    use glam::Vec2;

    fn ship() -> Movable {
        Movable::new(Vec2::ZERO, Vec2::splat(10.0), colors::GREEN, Group::Player)
    }

    #[test]
    fn test_fire_collision_passes_other_group() {
        let mut m = ship();
        m.reactions.set_on_collision(|other, me: &mut Movable| {
            if other == Group::HealthPickup {
                me.hp += 1;
            }
        });

        fire_collision(&mut m, Group::HealthPickup);
        fire_collision(&mut m, Group::Asteroid);
        assert_eq!(m.hp, 4);
        assert!(m.reactions.has_on_collision());
    }

    #[test]
    fn test_fire_without_callback_is_noop() {
        let mut m = ship();
        fire_collision(&mut m, Group::Asteroid);
        assert_eq!(m.hp, 3);
    }

    #[test]
    fn test_callback_may_replace_itself() {
        let mut m = ship();
        m.reactions.set_on_collision(|_, me: &mut Movable| {
            me.hp -= 1;
            me.reactions.set_on_collision(|_, me: &mut Movable| me.hp += 10);
        });

        fire_collision(&mut m, Group::Asteroid);
        fire_collision(&mut m, Group::Asteroid);
        assert_eq!(m.hp, 12);
    }

    #[test]
    fn test_per_tick_runs_in_pool_order_and_skips_tombstones() {
        let mut ctx = WorldContext::default();
        let mut pool = Pool::new();
        for i in 0..3 {
            let mut p = Projectile::new(Vec2::ZERO, Vec2::ONE, colors::CYAN, Group::Asteroid);
            p.reactions.set_on_tick(move |ctx: &mut WorldContext, _p: &mut Projectile| {
                ctx.score = ctx.score * 10 + i + 1;
            });
            pool.insert(p);
        }
        pool.remove(1);

        run_per_tick_callbacks(&mut ctx, &mut pool);
        assert_eq!(ctx.score, 13);
    }
}
