//! Game state and the shared world context
//!
//! `GameState` owns the three object pools plus everything the gameplay layer
//! tracks between ticks. `WorldContext` is the part handed to callbacks and
//! to the projectile pass: frame counter, score, flags and the event/sound
//! outlets.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::{Group, Movable, Projectile, StaticBody, colors};
use super::gameplay;
use super::pool::{Handle, Pool};
use super::rect::Rect;
use crate::audio::SoundQueue;
use crate::consts::*;
use crate::highscores::HighScores;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the start input
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Player destroyed; start input begins a new run
    GameOver,
}

/// Something the collision engine observed, for the gameplay layer to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Two projectiles touched (recorded from the scanning side)
    ProjectileHit { group: Group, other: Group },
    /// A projectile ran out of health in a projectile-vs-projectile hit
    ProjectileDestroyed { group: Group, by: Group },
    /// A damaging projectile struck a movable
    MovableHit { group: Group, by: Group },
    /// A movable ran out of health from a projectile hit
    MovableDestroyed { group: Group, by: Group },
}

/// State callbacks and the projectile pass may read or mutate
#[derive(Debug)]
pub struct WorldContext {
    pub playfield: Rect,
    /// Simulation frame counter
    pub frame: u64,
    pub score: u64,
    pub debug_mode: bool,
    /// Player center as of the start of this tick (None once destroyed)
    pub player_center: Option<Vec2>,
    /// Events raised during this tick, drained by the gameplay layer
    pub events: Vec<GameEvent>,
    pub sounds: SoundQueue,
}

impl Default for WorldContext {
    fn default() -> Self {
        Self::new(
            Rect::new(Vec2::ZERO, Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT)),
            SoundQueue::disconnected(),
        )
    }
}

impl WorldContext {
    pub fn new(playfield: Rect, sounds: SoundQueue) -> Self {
        Self {
            playfield,
            frame: 0,
            score: 0,
            debug_mode: false,
            player_center: None,
            events: Vec::new(),
            sounds,
        }
    }
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    pub settings: Settings,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub ctx: WorldContext,
    pub movables: Pool<Movable>,
    pub statics: Pool<StaticBody>,
    pub projectiles: Pool<Projectile>,
    /// Player slot (stale once the player is destroyed)
    pub player: Handle,
    pub ammo: u32,
    pub split_shot: bool,
    pub next_shooting_frame: u64,
    /// Leaderboard for this session
    pub high_scores: HighScores,
}

impl GameState {
    /// Create a new game state; the run starts in the menu
    pub fn new(settings: Settings, sounds: SoundQueue) -> Self {
        let ctx = WorldContext::new(settings.playfield(), sounds);
        let mut movables = Pool::new();
        let player = movables.insert(make_player(&settings, &ctx));

        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            phase: GamePhase::Menu,
            ctx,
            movables,
            statics: Pool::new(),
            projectiles: Pool::with_capacity(256),
            player,
            ammo: settings.player_max_ammo,
            split_shot: false,
            next_shooting_frame: 0,
            high_scores: HighScores::new(),
            settings,
        }
    }

    /// Clear the field for a fresh run, keeping the leaderboard and RNG stream
    pub fn reset(&mut self) {
        self.movables.clear();
        self.statics.clear();
        self.projectiles.clear();
        self.ctx.frame = 0;
        self.ctx.score = 0;
        self.ctx.events.clear();
        self.ctx.player_center = None;
        self.ammo = self.settings.player_max_ammo;
        self.split_shot = false;
        self.next_shooting_frame = 0;
        self.player = self.movables.insert(make_player(&self.settings, &self.ctx));
    }

    pub fn player(&self) -> Option<&Movable> {
        self.movables.get(self.player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Movable> {
        self.movables.get_mut(self.player)
    }

    /// Player destroyed or out of health
    pub fn player_dead(&self) -> bool {
        self.player().is_none_or(|p| p.hp <= 0)
    }

    /// Tombstone everything at zero health, the player included.
    ///
    /// Runs between the phases of a tick so no collision pass sees a dead
    /// object. A reaped player shows up as [`GameState::player_dead`].
    pub fn reap(&mut self) -> usize {
        self.movables.tombstone_where(|m| m.hp <= 0) + self.projectiles.tombstone_where(|p| p.hp <= 0)
    }
}

/// Player ship near the bottom center of the playfield
fn make_player(settings: &Settings, ctx: &WorldContext) -> Movable {
    let (w, h) = PLAYER_SIZE;
    let field = ctx.playfield;
    let pos = Vec2::new(field.center().x - w * 0.5, field.bottom() - h - 16.0);

    let mut player = Movable::new(pos, Vec2::new(w, h), colors::GREEN, Group::Player)
        .with_layers(LAYER_PLAYER, LAYER_HOSTILE);
    player.hp = settings.player_max_hp;
    player
        .reactions
        .set_on_collision(gameplay::player_reaction(ctx.sounds.clone(), settings.player_max_hp));
    player
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_has_player() {
        let state = GameState::new(Settings::default(), SoundQueue::disconnected());
        assert_eq!(state.phase, GamePhase::Menu);
        let player = state.player().unwrap();
        assert_eq!(player.body.group, Group::Player);
        assert_eq!(player.hp, PLAYER_MAX_HP);
        assert!(state.ctx.playfield.intersects(&player.body.rect()));
        assert!(player.reactions.has_on_collision());
    }

    #[test]
    fn test_reap_removes_dead_including_player() {
        let mut state = GameState::new(Settings::default(), SoundQueue::disconnected());
        let mut rock = Projectile::new(Vec2::new(10.0, 10.0), Vec2::splat(10.0), colors::CYAN, Group::Asteroid);
        rock.hp = 0;
        state.projectiles.insert(rock);
        let mut drone = Movable::new(Vec2::ZERO, Vec2::ONE, colors::RED, Group::Wall);
        drone.hp = -1;
        state.movables.insert(drone);
        state.player_mut().unwrap().hp = 0;

        assert_eq!(state.reap(), 3);
        assert!(state.player().is_none());
        assert!(state.player_dead());
        assert_eq!(state.movables.live(), 0);
        assert_eq!(state.projectiles.live(), 0);
    }

    #[test]
    fn test_reset_restores_run() {
        let mut state = GameState::new(Settings::default(), SoundQueue::disconnected());
        let old = state.player;
        state.movables.remove(old.index());
        state.ctx.frame = 500;
        state.ctx.score = 25;
        state.ammo = 0;

        state.reset();

        assert!(!state.player_dead());
        assert_eq!(state.ctx.frame, 0);
        assert_eq!(state.ctx.score, 0);
        assert_eq!(state.ammo, state.settings.player_max_ammo);
        assert_eq!(state.movables.live(), 1);
    }
}
