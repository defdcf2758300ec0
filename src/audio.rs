//! Sound effects
//!
//! The simulation never plays sounds itself. The session maps drained
//! `GameEvent`s onto `SoundEffect`s and hands them to an `AudioSink`. On the
//! web the sink is `WebAudio`, procedurally generated through the Web Audio
//! API; elsewhere it is `NullAudio`.

use crate::notes::NOTES;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundEffect {
    /// Correct answer, played at the note's pitch
    Piano(f32),
    /// Wrong answer or timeout
    Error,
    /// Combo level reached (1-based)
    Combo(u32),
    EnemyShoot,
    /// Player shot landed on the enemy
    Hit,
    /// Enemy shot neutralized
    Whoosh,
    LifeLost,
    LevelUp,
    Champion,
    GameOver,
}

/// Sound for a simulation event, if it has one
pub fn effect_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::CorrectAnswer { note, .. } => {
            NOTES.get(*note).map(|n| SoundEffect::Piano(n.frequency))
        }
        GameEvent::WrongAnswer { .. } | GameEvent::AnswerTimeout { .. } => Some(SoundEffect::Error),
        GameEvent::ComboUp { combo } => Some(SoundEffect::Combo(*combo)),
        GameEvent::EnemyShoot => Some(SoundEffect::EnemyShoot),
        GameEvent::EnemyHit { .. } => Some(SoundEffect::Hit),
        GameEvent::Interception { .. } => Some(SoundEffect::Whoosh),
        GameEvent::LifeLost { remaining } if *remaining > 0 => Some(SoundEffect::LifeLost),
        GameEvent::LevelUp { .. } => Some(SoundEffect::LevelUp),
        GameEvent::ChampionReached => Some(SoundEffect::Champion),
        GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        _ => None,
    }
}

/// Anything that can play a sound effect
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Resume after a user gesture (browsers start audio suspended)
    fn resume(&mut self) {}

    fn set_volume(&mut self, _volume: f32) {}
}

/// Silent sink for headless runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Combo chime pitch for a combo level (1-based, saturates at level 5)
pub fn combo_frequency(combo: u32) -> f32 {
    const FREQS: [f32; 5] = [659.0, 784.0, 880.0, 1047.0, 1319.0];
    FREQS[(combo.max(1) as usize - 1).min(FREQS.len() - 1)]
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect, combo_frequency};

    /// One oscillator voice: frequency sweep plus exponential decay
    struct Tone {
        freq: f32,
        end_freq: Option<f32>,
        kind: OscillatorType,
        gain: f32,
        delay: f64,
        dur: f64,
    }

    impl Tone {
        fn new(freq: f32, kind: OscillatorType, gain: f32, dur: f64) -> Self {
            Self {
                freq,
                end_freq: None,
                kind,
                gain,
                delay: 0.0,
                dur,
            }
        }

        fn sweep(mut self, end_freq: f32) -> Self {
            self.end_freq = Some(end_freq);
            self
        }

        fn after(mut self, delay: f64) -> Self {
            self.delay = delay;
            self
        }
    }

    /// Web Audio output
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl WebAudio {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
            }
        }

        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            kind: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(kind);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some((osc, gain))
        }

        fn voice(&self, ctx: &AudioContext, tone: &Tone) {
            let Some((osc, gain)) = Self::create_osc(ctx, tone.freq, tone.kind) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;
            gain.gain().set_value_at_time(tone.gain * self.volume, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + tone.dur)
                .ok();
            if let Some(end) = tone.end_freq {
                osc.frequency().set_value_at_time(tone.freq, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(end, t + tone.dur)
                    .ok();
            }
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.dur + 0.05).ok();
        }

        /// Piano-like note from a few decaying harmonics
        fn piano(&self, ctx: &AudioContext, freq: f32, gain: f32, dur: f64, delay: f64) {
            const HARMONICS: [(f32, f32); 5] =
                [(1.0, 0.55), (2.0, 0.22), (3.0, 0.09), (4.0, 0.04), (6.0, 0.012)];
            for (i, (mult, amp)) in HARMONICS.iter().enumerate() {
                let kind = if i == 0 { OscillatorType::Triangle } else { OscillatorType::Sine };
                let decay = dur * (0.8 / *mult as f64 + 0.2);
                self.voice(ctx, &Tone::new(freq * mult, kind, gain * amp, decay).after(delay));
            }
        }

        fn tones(effect: SoundEffect) -> Vec<Tone> {
            use OscillatorType::{Sawtooth, Square};
            match effect {
                SoundEffect::Error => [(185.0, 0.22, 0.2), (262.0, 0.15, 0.25), (348.0, 0.1, 0.3)]
                    .iter()
                    .map(|&(f, g, d)| Tone::new(f, Sawtooth, g, d).sweep(f * 0.65))
                    .collect(),
                SoundEffect::Hit | SoundEffect::LifeLost => {
                    vec![Tone::new(120.0, Sawtooth, 0.35, 0.18).sweep(60.0)]
                }
                SoundEffect::Whoosh => vec![Tone::new(900.0, Sawtooth, 0.14, 0.32).sweep(220.0)],
                SoundEffect::EnemyShoot => vec![Tone::new(200.0, Square, 0.18, 0.2).sweep(80.0)],
                _ => Vec::new(),
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Piano(freq) => self.piano(ctx, freq, 0.42, 1.1, 0.0),
                SoundEffect::Combo(level) => {
                    self.piano(ctx, combo_frequency(level), 0.22, 0.3, 0.0)
                }
                SoundEffect::LevelUp | SoundEffect::Champion => {
                    for (i, f) in [523.0, 659.0, 784.0, 1047.0, 1319.0].iter().enumerate() {
                        self.piano(ctx, *f, 0.32, 0.4, i as f64 * 0.075);
                    }
                }
                SoundEffect::GameOver => {
                    for (i, f) in [440.0, 415.0, 392.0, 370.0, 330.0, 294.0].iter().enumerate() {
                        self.piano(ctx, *f, 0.32, 0.6, i as f64 * 0.21);
                    }
                }
                other => {
                    for tone in Self::tones(other) {
                        self.voice(ctx, &tone);
                    }
                }
            }
        }

        fn resume(&mut self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_correct_answer_plays_note_pitch() {
        let e = GameEvent::CorrectAnswer { note: 0, points: 10 };
        assert_eq!(effect_for(&e), Some(SoundEffect::Piano(NOTES[0].frequency)));
    }

    #[test]
    fn test_silent_events() {
        assert_eq!(effect_for(&GameEvent::EnemyRemoved), None);
        assert_eq!(effect_for(&GameEvent::LifeLost { remaining: 0 }), None);
        assert_eq!(
            effect_for(&GameEvent::Interception { pos: Vec2::ZERO, bonus: 5 }),
            Some(SoundEffect::Whoosh)
        );
    }

    #[test]
    fn test_combo_frequency_saturates() {
        assert_eq!(combo_frequency(1), 659.0);
        assert_eq!(combo_frequency(5), 1319.0);
        assert_eq!(combo_frequency(40), 1319.0);
        assert_eq!(combo_frequency(0), 659.0);
    }
}
