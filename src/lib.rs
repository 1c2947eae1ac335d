//! Space Dodge - A small 2D arcade shooter
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (kinematics, AABB collisions, object pools)
//! - `settings`: Data-driven game tuning
//! - `highscores`: In-memory leaderboard
//! - `audio`: Sound request bus between the simulation and the host

pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use audio::{Mixer, SoundEffect, SoundQueue};
pub use highscores::HighScores;
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, positions advance by raw velocity per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 200.0;

    /// Extra room around the playfield where projectiles may live off-screen
    pub const PROJECTILE_MARGIN: f32 = 50.0;

    /// Downward acceleration for gravity-enabled objects
    pub const GRAVITY: f32 = 10.0;

    /// Acceleration multiplier while inside a nebula
    pub const NEBULA_DRAG: f32 = 0.2;

    /// Player defaults
    pub const PLAYER_SIZE: (f32, f32) = (20.0, 14.0);
    pub const PLAYER_MAX_HP: i32 = 3;
    pub const PLAYER_MOVEMENT_SPEED: f32 = 100.0;
    pub const PLAYER_DASH_SPEED: f32 = 500.0;
    pub const PLAYER_BULLET_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_AMMO: u32 = 20;

    /// Hostile speeds (units per tick)
    pub const ENEMY_ROCKET_SHIP_SPEED: f32 = 2.0;
    pub const ENEMY_MOVEMENT_SPEED: f32 = 0.5;
    pub const NEBULA_MOVEMENT_SPEED: f32 = 0.1;

    /// Collision layers
    pub const LAYER_PLAYER: u32 = 1;
    pub const LAYER_HOSTILE: u32 = 2;
    pub const LAYER_FRIENDLY: u32 = 3;
    pub const LAYER_PICKUP: u32 = 4;
}
