//! Simulation object types
//!
//! Every object embeds a [`Body`] (geometry, visual group and collision
//! layers). The three kinds only add what they need: movables integrate and
//! take damage, static bodies just sit there, projectiles integrate and trade
//! damage with each other.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::reaction::{Reactions, Reactive};
use super::rect::Rect;

/// Smallest extent an object may have on either axis
pub const MIN_SIZE: f32 = 0.01;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity token used to exclude self-pairs in collision scans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id(u64);

impl Id {
    /// Allocate a process-unique id
    pub fn next() -> Self {
        Id(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Visual group tag, passed to reaction callbacks to identify the other side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Player,
    PlayerBullet,
    Asteroid,
    EnemyRocket,
    Nebula,
    HealthPickup,
    Wall,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Player => "player",
            Group::PlayerBullet => "projectile",
            Group::Asteroid => "asteroid",
            Group::EnemyRocket => "enemyRocket",
            Group::Nebula => "nebula",
            Group::HealthPickup => "healthPickUp",
            Group::Wall => "wall",
        }
    }

    /// Things that hurt the player on contact
    pub fn is_hostile(&self) -> bool {
        matches!(self, Group::Asteroid | Group::EnemyRocket)
    }
}

/// Packed RGBA colors used as debug-draw fills
pub mod colors {
    pub const RED: u32 = 0xFF0000FF;
    pub const GREEN: u32 = 0x00FF00FF;
    pub const CYAN: u32 = 0x00FFFFFF;
    pub const MAGENTA: u32 = 0xFF00FFFF;
    pub const PURPLE: u32 = 0x8040C0A0;
    pub const ORANGE: u32 = 0xFF8000FF;
    pub const PINK: u32 = 0xFF6080FF;
    pub const GREY: u32 = 0x808080FF;
}

/// Geometry and collision filtering shared by every object kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub color: u32,
    pub group: Group,
    /// Layer this object lives on
    pub layer: u32,
    /// Layer this object scans for collisions
    pub check_layer: u32,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, color: u32, group: Group) -> Self {
        Self {
            pos,
            size: size.max(Vec2::splat(MIN_SIZE)),
            color,
            group,
            layer: 0,
            check_layer: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Rectangle after moving by `vel`
    pub fn swept(&self, vel: Vec2) -> Rect {
        Rect::swept(self.pos, vel, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.rect().left()
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.rect().right()
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.rect().top()
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.rect().bottom()
    }

    /// One-directional layer filter: does `self` scan the layer `other` lives on?
    #[inline]
    pub fn scans(&self, other: &Body) -> bool {
        self.check_layer == other.layer
    }

    /// Resize around the current center, keeping the size positive
    pub fn resize_centered(&mut self, new_size: Vec2) {
        let new_size = new_size.max(Vec2::splat(MIN_SIZE));
        self.pos += (self.size - new_size) * 0.5;
        self.size = new_size;
    }
}

/// A player- or AI-driven body that integrates and can be pushed around
#[derive(Debug)]
pub struct Movable {
    pub body: Body,
    pub vel: Vec2,
    pub accel: Vec2,
    /// Per-axis multiplicative damping applied after integration
    pub friction: Vec2,
    pub id: Id,
    pub collision_enabled: bool,
    pub gravity_enabled: bool,
    pub hp: i32,
    /// Set by contact with a nebula; consumed by the next integration
    pub in_nebula: bool,
    pub reactions: Reactions<Movable>,
}

impl Movable {
    pub fn new(pos: Vec2, size: Vec2, color: u32, group: Group) -> Self {
        Self {
            body: Body::new(pos, size, color, group),
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            friction: Vec2::splat(0.5),
            id: Id::next(),
            collision_enabled: true,
            gravity_enabled: false,
            hp: 3,
            in_nebula: false,
            reactions: Reactions::default(),
        }
    }

    pub fn with_layers(mut self, layer: u32, check_layer: u32) -> Self {
        self.body.layer = layer;
        self.body.check_layer = check_layer;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn swept_rect(&self) -> Rect {
        self.body.swept(self.vel)
    }
}

impl Reactive for Movable {
    fn body(&self) -> &Body {
        &self.body
    }

    fn reactions(&mut self) -> &mut Reactions<Self> {
        &mut self.reactions
    }
}

/// Immovable scenery; only ever the passive side of a collision
#[derive(Debug)]
pub struct StaticBody {
    pub body: Body,
    pub reactions: Reactions<StaticBody>,
}

impl StaticBody {
    pub fn new(pos: Vec2, size: Vec2, color: u32, group: Group) -> Self {
        Self {
            body: Body::new(pos, size, color, group),
            reactions: Reactions::default(),
        }
    }

    pub fn with_layer(mut self, layer: u32) -> Self {
        self.body.layer = layer;
        self
    }
}

impl Reactive for StaticBody {
    fn body(&self) -> &Body {
        &self.body
    }

    fn reactions(&mut self) -> &mut Reactions<Self> {
        &mut self.reactions
    }
}

/// Bullets, asteroids, rockets, nebulas and pickups
#[derive(Debug)]
pub struct Projectile {
    pub body: Body,
    pub vel: Vec2,
    pub accel: Vec2,
    pub friction: Vec2,
    pub id: Id,
    pub gravity_enabled: bool,
    /// Inflicts damage on contact
    pub enable_damage: bool,
    /// Loses health on contact with a damaging projectile
    pub take_damage: bool,
    /// Consumed after hitting a movable
    pub disappear_on_hit: bool,
    /// Takes part in projectile-vs-projectile scans
    pub scans_projectiles: bool,
    pub hp: i32,
    pub max_hp: i32,
    /// Size as of the last resize, for callbacks that grow or shrink the hitbox
    pub prev_size: Vec2,
    pub reactions: Reactions<Projectile>,
}

impl Projectile {
    pub fn new(pos: Vec2, size: Vec2, color: u32, group: Group) -> Self {
        let body = Body::new(pos, size, color, group);
        let prev_size = body.size;
        Self {
            body,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            friction: Vec2::ONE,
            id: Id::next(),
            gravity_enabled: false,
            enable_damage: true,
            take_damage: true,
            disappear_on_hit: true,
            scans_projectiles: true,
            hp: 1,
            max_hp: 1,
            prev_size,
            reactions: Reactions::default(),
        }
    }

    pub fn with_layers(mut self, layer: u32, check_layer: u32) -> Self {
        self.body.layer = layer;
        self.body.check_layer = check_layer;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self.max_hp = hp;
        self
    }

    pub fn swept_rect(&self) -> Rect {
        self.body.swept(self.vel)
    }

    /// Fraction of health remaining (0.0 - 1.0)
    pub fn health_ratio(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    /// Resize the hitbox around its center and remember the new size
    pub fn set_size_centered(&mut self, size: Vec2) {
        if size == self.prev_size {
            return;
        }
        self.body.resize_centered(size);
        self.prev_size = self.body.size;
    }
}

impl Reactive for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn reactions(&mut self) -> &mut Reactions<Self> {
        &mut self.reactions
    }
}
