//! Sound request bus
//!
//! The simulation never plays audio itself. Reaction callbacks and the tick
//! push [`SoundRequest`]s through a cloneable [`SoundQueue`]; the host drains
//! them from the [`Mixer`] once per frame and hands them to whatever backend
//! it has.

use std::sync::mpsc::{self, Receiver, Sender};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fires a bullet
    Shoot,
    /// Player bullet strikes something
    Hit,
    /// Player takes damage
    Hurt,
    /// Health pickup collected
    Pickup,
    /// Player destroyed
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Asset the host is expected to map this effect to
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "Laser_Shoot.wav",
            SoundEffect::Hit => "Hit_Hurt2.wav",
            SoundEffect::Hurt => "Hit_Hurt.wav",
            SoundEffect::Pickup => "Pickup_Coin.wav",
            SoundEffect::GameOver => "Game_Over.wav",
            SoundEffect::HighScore => "High_Score.wav",
        }
    }
}

/// A single playback request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundRequest {
    pub effect: SoundEffect,
    /// Playback rate multiplier (1.0 = unchanged)
    pub pitch: f32,
}

/// Sending side of the bus, cheap to clone into callbacks
#[derive(Debug, Clone)]
pub struct SoundQueue {
    tx: Sender<SoundRequest>,
}

impl SoundQueue {
    pub fn play(&self, effect: SoundEffect) {
        self.play_pitched(effect, 1.0);
    }

    pub fn play_pitched(&self, effect: SoundEffect, pitch: f32) {
        // Mixer dropped means the host shut audio down; requests are discarded
        let _ = self.tx.send(SoundRequest { effect, pitch });
    }

    /// A queue whose requests go nowhere (tests, headless tools)
    pub fn disconnected() -> Self {
        let (tx, _) = mpsc::channel();
        Self { tx }
    }
}

/// A request resolved against the current volume settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    pub request: SoundRequest,
    pub volume: f32,
}

/// Receiving side of the bus
pub struct Mixer {
    tx: Sender<SoundRequest>,
    rx: Receiver<SoundRequest>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl Mixer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// New sender for this mixer
    pub fn queue(&self) -> SoundQueue {
        SoundQueue {
            tx: self.tx.clone(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set sound effects volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Take every pending request. Requests are consumed even while muted.
    pub fn drain(&self) -> Vec<Playback> {
        let volume = self.effective_volume();
        let pending: Vec<_> = self.rx.try_iter().collect();
        if volume <= 0.0 {
            return Vec::new();
        }

        pending
            .into_iter()
            .map(|request| {
                log::trace!(
                    "play {} (pitch {:.2}, volume {:.2})",
                    request.effect.asset_name(),
                    request.pitch,
                    volume
                );
                Playback { request, volume }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_to_mixer() {
        let mixer = Mixer::new();
        let queue = mixer.queue();
        queue.play(SoundEffect::Shoot);
        queue.clone().play_pitched(SoundEffect::Hit, 1.1);

        let played = mixer.drain();
        assert_eq!(played.len(), 2);
        assert_eq!(played[0].request.effect, SoundEffect::Shoot);
        assert!((played[0].volume - 0.8).abs() < 1e-6);
        assert!((played[1].request.pitch - 1.1).abs() < 1e-6);
        assert!(mixer.drain().is_empty());
    }

    #[test]
    fn test_muted_mixer_discards() {
        let mut mixer = Mixer::new();
        mixer.set_muted(true);
        mixer.queue().play(SoundEffect::Pickup);
        assert!(mixer.drain().is_empty());

        mixer.set_muted(false);
        assert!(mixer.drain().is_empty());
    }

    #[test]
    fn test_disconnected_queue_does_not_panic() {
        SoundQueue::disconnected().play(SoundEffect::Hurt);
    }
}
