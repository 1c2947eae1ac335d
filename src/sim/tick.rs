//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation deterministically. One call
//! runs, in order: player input, per-tick callbacks, integration, the three
//! collision passes, event handling and the spawn schedule. Objects at zero
//! health are reaped after the callbacks and after every pass.

use glam::Vec2;
use log::info;

use super::body::Group;
use super::collision::{resolve_movable_collisions, resolve_projectile_collisions, resolve_static_collisions};
use super::gameplay;
use super::kinematics::advance_kinematics;
use super::reaction::run_per_tick_callbacks;
use super::spawn;
use super::state::{GamePhase, GameState};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Frames per point of survival score
pub const SCORE_INTERVAL: u64 = 20;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction; each axis in -1.0..=1.0
    pub movement: Vec2,
    /// Move at dash speed while held
    pub dash: bool,
    /// Fire while held (subject to cooldown and ammo)
    pub shoot: bool,
    pub toggle_split_shot: bool,
    pub toggle_debug: bool,
    /// Leave the menu or start a new run after game over
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.toggle_debug {
        state.ctx.debug_mode = !state.ctx.debug_mode;
        info!("debug mode {}", if state.ctx.debug_mode { "on" } else { "off" });
    }

    let start = input.start || input.idle_mode;
    match state.phase {
        GamePhase::Menu => {
            if start {
                info!("run started (seed {})", state.settings.seed);
                state.phase = GamePhase::Playing;
            }
            return;
        }
        GamePhase::GameOver => {
            if start {
                state.reset();
                info!("new run started");
                state.phase = GamePhase::Playing;
            }
            return;
        }
        GamePhase::Paused => {
            if !input.pause {
                return;
            }
            state.phase = GamePhase::Playing;
        }
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                return;
            }
        }
    }

    let input = if input.idle_mode { autopilot(state) } else { input.clone() };

    if input.toggle_split_shot {
        state.split_shot = !state.split_shot;
    }
    apply_player_input(state, &input);
    state.ctx.player_center = state.player().map(|p| p.body.center());

    run_per_tick_callbacks(&mut state.ctx, &mut state.movables);
    run_per_tick_callbacks(&mut state.ctx, &mut state.statics);
    run_per_tick_callbacks(&mut state.ctx, &mut state.projectiles);
    state.reap();

    advance_kinematics(dt, state.ctx.playfield, &mut state.movables, &mut state.projectiles);

    // Reactions may kill; each pass only ever sees live objects
    resolve_static_collisions(&mut state.statics, &mut state.movables);
    state.reap();
    resolve_movable_collisions(&mut state.movables);
    state.reap();
    resolve_projectile_collisions(&mut state.ctx, &mut state.projectiles, &mut state.movables);
    state.reap();
    gameplay::handle_events(&mut state.ctx, &mut state.rng);
    spawn::run_schedule(state, input.shoot);

    state.ctx.frame += 1;
    if state.ctx.frame % SCORE_INTERVAL == 0 {
        state.ctx.score += 1;
    }

    if state.player_dead() {
        game_over(state);
    }
}

/// Turn the movement request into player acceleration
fn apply_player_input(state: &mut GameState, input: &TickInput) {
    let Some(player) = state.player_mut() else {
        return;
    };
    let speed = if input.dash {
        PLAYER_DASH_SPEED
    } else {
        PLAYER_MOVEMENT_SPEED
    };
    player.accel += input.movement.clamp(Vec2::NEG_ONE, Vec2::ONE) * speed;
}

fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.movables.remove_handle(state.player);
    state.ctx.sounds.play(SoundEffect::GameOver);

    let score = state.ctx.score;
    let frames = state.ctx.frame;
    match state.high_scores.add_score(score, frames) {
        Some(rank) => {
            state.ctx.sounds.play(SoundEffect::HighScore);
            info!("game over: score {score} after {frames} frames, rank #{rank}");
        }
        None => info!("game over: score {score} after {frames} frames"),
    }
}

/// Demo-mode pilot: keep shooting, sidestep the nearest hostile overhead and
/// otherwise drift toward a pickup or back to the middle.
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput {
        shoot: true,
        idle_mode: true,
        ..Default::default()
    };
    let Some(player) = state.player() else {
        return input;
    };
    let center = player.body.center();
    let field = state.ctx.playfield;

    let threat = state
        .projectiles
        .iter()
        .map(|(_, p)| p)
        .filter(|p| p.body.group.is_hostile())
        .filter(|p| {
            let c = p.body.center();
            c.y < center.y + player.body.size.y
                && (c.x - center.x).abs() < (p.body.size.x + player.body.size.x) * 0.5 + 4.0
        })
        .min_by(|a, b| {
            let da = (a.body.center() - center).length_squared();
            let db = (b.body.center() - center).length_squared();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });

    input.movement.x = match threat {
        Some(t) => {
            let away = if t.body.center().x > center.x { -1.0 } else { 1.0 };
            // Pinned against a wall: go the other way around
            if (away < 0.0 && player.body.left() <= field.left() + 1.0)
                || (away > 0.0 && player.body.right() >= field.right() - 1.0)
            {
                -away
            } else {
                away
            }
        }
        None => {
            let target = state
                .projectiles
                .iter()
                .map(|(_, p)| p)
                .find(|p| p.body.group == Group::HealthPickup)
                .map_or(field.center().x, |p| p.body.center().x);
            let dx = target - center.x;
            if dx.abs() > 4.0 { dx.signum() } else { 0.0 }
        }
    };

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{Mixer, SoundQueue};
    use crate::settings::Settings;
    use crate::sim::body::{Movable, Projectile, StaticBody, colors};

    fn playing() -> GameState {
        let mut state = GameState::new(Settings::default(), SoundQueue::disconnected());
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_tick_menu_to_playing() {
        let mut state = GameState::new(Settings::default(), SoundQueue::disconnected());
        assert_eq!(state.phase, GamePhase::Menu);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.ctx.frame, 0);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing();
        tick(&mut state, &TickInput::default(), SIM_DT);
        let frame = state.ctx.frame;

        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.ctx.frame, frame);

        // Unpause resumes on the same tick
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.ctx.frame, frame + 1);
    }

    #[test]
    fn test_survival_score() {
        let mut state = playing();
        state.settings.spawn.asteroid_every = 0;
        state.settings.spawn.rocket_every = 0;
        for _ in 0..SCORE_INTERVAL * 3 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.ctx.score, 3);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_player_moves_with_input() {
        let mut state = playing();
        let x0 = state.player().unwrap().body.pos.x;
        let input = TickInput {
            movement: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.player().unwrap().body.pos.x > x0);
    }

    #[test]
    fn test_game_over_records_high_score() {
        let mixer = Mixer::new();
        let mut state = GameState::new(Settings::default(), mixer.queue());
        state.phase = GamePhase::Playing;
        state.ctx.score = 42;

        // Rock about to land on the player with one hp left
        let target = state.player().unwrap().body.rect();
        state.player_mut().unwrap().hp = 1;
        state.projectiles.insert(
            Projectile::new(target.pos, Vec2::splat(10.0), colors::CYAN, Group::Asteroid)
                .with_layers(LAYER_HOSTILE, LAYER_PLAYER),
        );

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.player().is_none());
        assert_eq!(state.high_scores.top_score(), Some(42));
        let effects: Vec<_> = mixer.drain().iter().map(|p| p.request.effect).collect();
        assert!(effects.contains(&SoundEffect::Hurt));
        assert!(effects.contains(&SoundEffect::GameOver));
        assert!(effects.contains(&SoundEffect::HighScore));

        // Start begins a fresh run
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.ctx.score, 0);
        assert!(!state.player_dead());
    }

    #[test]
    fn test_shot_down_asteroid_scores_bonus() {
        let mut state = playing();
        state.settings.spawn.asteroid_every = 0;
        state.projectiles.insert(
            Projectile::new(Vec2::new(50.0, 50.0), Vec2::splat(10.0), colors::CYAN, Group::Asteroid)
                .with_layers(LAYER_HOSTILE, LAYER_PLAYER),
        );
        state.projectiles.insert(
            Projectile::new(Vec2::new(50.0, 55.0), Vec2::splat(10.0), colors::MAGENTA, Group::PlayerBullet)
                .with_layers(LAYER_FRIENDLY, LAYER_HOSTILE),
        );

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.ctx.score, gameplay::HOSTILE_KILL_BONUS);
        assert_eq!(state.projectiles.live(), 0);
    }

    #[test]
    fn test_idle_mode_survives_and_shoots() {
        let mut state = GameState::new(Settings::default(), SoundQueue::disconnected());
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state, &input, SIM_DT);
        }
        assert!(state.ctx.frame > 0);
        assert!(state.ammo < state.settings.player_max_ammo);
    }

    #[test]
    fn test_tick_callback_kill_skips_collision_passes() {
        let mut state = playing();
        state.settings.spawn.asteroid_every = 0;

        let drone = state.movables.insert(
            Movable::new(Vec2::new(50.0, 50.0), Vec2::splat(10.0), colors::RED, Group::Wall).with_layers(7, 0),
        );
        let mut mine = Projectile::new(Vec2::new(50.0, 50.0), Vec2::splat(10.0), colors::ORANGE, Group::EnemyRocket)
            .with_layers(9, 7);
        mine.reactions.set_on_tick(|_, p: &mut Projectile| p.hp = 0);
        let mine = state.projectiles.insert(mine);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.projectiles.get(mine).is_none());
        assert_eq!(state.movables.get(drone).map(|m| m.hp), Some(3));
    }

    #[test]
    fn test_tick_reaction_kill_skips_later_passes() {
        let mut state = playing();
        state.settings.spawn.asteroid_every = 0;

        // Dies in the static pass, then must not absorb the bullet in the projectile pass
        let mut drone = Movable::new(Vec2::new(50.0, 50.0), Vec2::splat(10.0), colors::RED, Group::Wall)
            .with_layers(7, 8)
            .with_velocity(Vec2::new(0.0, 1.0));
        drone.reactions.set_on_collision(|_, m: &mut Movable| m.hp = 0);
        let drone = state.movables.insert(drone);
        state
            .statics
            .insert(StaticBody::new(Vec2::new(40.0, 58.0), Vec2::new(30.0, 10.0), colors::GREY, Group::Wall).with_layer(8));
        let bullet = state.projectiles.insert(
            Projectile::new(Vec2::new(50.0, 48.0), Vec2::splat(10.0), colors::MAGENTA, Group::PlayerBullet)
                .with_layers(LAYER_FRIENDLY, 7),
        );

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.movables.get(drone).is_none());
        assert!(state.projectiles.get(bullet).is_some());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = playing();
        let mut state2 = playing();

        let inputs = [
            TickInput {
                movement: Vec2::new(-1.0, 0.0),
                shoot: true,
                ..Default::default()
            },
            TickInput {
                dash: true,
                movement: Vec2::new(1.0, -1.0),
                ..Default::default()
            },
            TickInput {
                toggle_split_shot: true,
                shoot: true,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..100 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.ctx.frame, state2.ctx.frame);
        assert_eq!(state1.ctx.score, state2.ctx.score);
        assert_eq!(state1.projectiles.live(), state2.projectiles.live());
        let positions = |s: &GameState| -> Vec<Vec2> { s.projectiles.iter().map(|(_, p)| p.body.pos).collect() };
        assert_eq!(positions(&state1), positions(&state2));
    }
}
