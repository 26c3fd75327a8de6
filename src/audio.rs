//! Audio system for background music and sound effects
//!
//! Everything is synthesized into sample buffers up front; there are no
//! asset files. Playback goes through rodio sinks.

use crate::cue::{Cue, CueSink};
use crate::rng::{RandomSource, SeededRng};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::f32::consts::TAU;
use tracing::{debug, warn};

const SAMPLE_RATE: u32 = 22_050;
const BPM: f32 = 128.0;
/// One music step is a sixteenth note
const STEPS: usize = 32;
/// C major pentatonic, C4 to C5
const SCALE: [f32; 6] = [261.63, 293.66, 329.63, 392.00, 440.00, 523.25];
/// Steps (mod 16) that carry a marimba note
const MELODY_STEPS: [usize; 6] = [0, 3, 6, 9, 12, 15];
const MUSIC_SEED: u64 = 0x6d61_7269;

/// Render `seconds` of mono audio from a per-sample voice
fn synth(seconds: f32, mut voice: impl FnMut(f32) -> f32) -> Vec<f32> {
    let len = (seconds * SAMPLE_RATE as f32) as usize;
    (0..len)
        .map(|i| voice(i as f32 / SAMPLE_RATE as f32))
        .collect()
}

/// Exponential ramp from `from` to `to` over `len` seconds
fn exp_ramp(from: f32, to: f32, t: f32, len: f32) -> f32 {
    from * (to / from).powf((t / len).min(1.0))
}

fn triangle(phase: f32) -> f32 {
    4.0 * (phase.fract() - 0.5).abs() - 1.0
}

fn saw(phase: f32) -> f32 {
    2.0 * phase.fract() - 1.0
}

/// Rising chirp for a placed block
fn place_chirp() -> Vec<f32> {
    let mut phase = 0.0f32;
    synth(0.1, |t| {
        phase += exp_ramp(300.0, 900.0, t, 0.1) / SAMPLE_RATE as f32;
        0.2 * (1.0 - t / 0.1) * (TAU * phase).sin()
    })
}

/// Decaying triangle note
fn marimba(freq: f32) -> Vec<f32> {
    synth(0.4, |t| exp_ramp(0.4, 0.001, t, 0.4) * triangle(freq * t))
}

/// Falling sawtooth groan
fn game_over_groan() -> Vec<f32> {
    let mut phase = 0.0f32;
    synth(1.2, |t| {
        phase += exp_ramp(120.0, 10.0, t, 1.2) / SAMPLE_RATE as f32;
        exp_ramp(0.8, 0.01, t, 2.0) * saw(phase)
    })
}

fn kick() -> Vec<f32> {
    let mut phase = 0.0f32;
    synth(0.15, |t| {
        phase += exp_ramp(120.0, 0.01, t, 0.15) / SAMPLE_RATE as f32;
        0.5 * (1.0 - t / 0.15) * (TAU * phase).sin()
    })
}

fn noise_hit(seconds: f32, gain: f32, floor: f32, rng: &mut dyn RandomSource) -> Vec<f32> {
    synth(seconds, |t| {
        exp_ramp(gain, floor, t, seconds) * (rng.next_f64() as f32 * 2.0 - 1.0)
    })
}

/// Sum `voice` into `buf` starting at `offset`, clipping at the end
fn mix_into(buf: &mut [f32], offset: usize, voice: &[f32]) {
    for (out, sample) in buf.iter_mut().skip(offset).zip(voice) {
        *out += sample;
    }
}

/// Two bars of kick, snare, hi-hat and marimba
fn music_loop() -> Vec<f32> {
    let step_len = (60.0 / BPM / 4.0 * SAMPLE_RATE as f32) as usize;
    let mut buf = vec![0.0; step_len * STEPS];
    let mut rng = SeededRng::new(MUSIC_SEED);
    let kick = kick();

    for beat in 0..STEPS {
        let offset = beat * step_len;
        if beat % 8 == 0 {
            mix_into(&mut buf, offset, &kick);
        }
        if beat % 8 == 4 {
            mix_into(&mut buf, offset, &noise_hit(0.12, 0.15, 0.01, &mut rng));
        }
        if beat % 2 == 0 {
            mix_into(&mut buf, offset, &noise_hit(0.03, 0.04, 0.001, &mut rng));
        }
        if MELODY_STEPS.contains(&(beat % 16)) {
            let note = SCALE[rng.pick(SCALE.len())];
            mix_into(&mut buf, offset, &marimba(note));
        }
    }
    for sample in &mut buf {
        *sample = sample.clamp(-1.0, 1.0);
    }
    buf
}

/// Samples to play for a cue
fn cue_samples(cue: Cue) -> Vec<f32> {
    match cue {
        Cue::Place => place_chirp(),
        Cue::LineClear => {
            let mut chord = marimba(1046.50);
            mix_into(&mut chord, 0, &marimba(1567.98));
            chord
        }
        Cue::GameOver => game_over_groan(),
    }
}

/// Audio manager handles all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    music_sink: Option<Sink>,
    music_volume: f32,
    sfx_volume: f32,
}

impl AudioManager {
    /// Create a new audio manager, None when no output device is available
    pub fn new() -> Option<Self> {
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                warn!("No audio output: {}", e);
                return None;
            }
        };

        Some(Self {
            _stream: stream,
            stream_handle,
            music_sink: None,
            music_volume: 0.15,
            sfx_volume: 0.5,
        })
    }

    /// Set music volume (0.0 to 1.0)
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.music_sink {
            sink.set_volume(self.music_volume);
        }
    }

    /// Set SFX volume (0.0 to 1.0)
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }

    /// Turn the background loop on or off
    pub fn set_music(&mut self, enabled: bool) {
        if enabled {
            self.start_music();
        } else {
            self.stop_music();
        }
    }

    fn start_music(&mut self) {
        // Don't restart if already playing
        if self.music_sink.is_some() {
            return;
        }
        let Ok(sink) = Sink::try_new(&self.stream_handle) else {
            return;
        };
        sink.set_volume(self.music_volume);
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, music_loop()).repeat_infinite());
        self.music_sink = Some(sink);
        debug!("Music started");
    }

    /// Stop background music
    pub fn stop_music(&mut self) {
        if let Some(sink) = self.music_sink.take() {
            sink.stop();
        }
    }

    /// Play the sound for a cue
    pub fn play_cue(&mut self, cue: Cue) {
        debug!("Cue {}", cue.name());
        if self.sfx_volume <= 0.0 {
            return;
        }
        if let Ok(sink) = Sink::try_new(&self.stream_handle) {
            sink.set_volume(self.sfx_volume);
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, cue_samples(cue)));
            sink.detach(); // Let it play and clean up automatically
        }
    }
}

impl CueSink for AudioManager {
    fn cue(&mut self, cue: Cue) {
        if cue == Cue::GameOver {
            self.stop_music();
        }
        self.play_cue(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_cue_lengths() {
        let rate = SAMPLE_RATE as usize;
        assert_eq!(cue_samples(Cue::Place).len(), rate / 10);
        assert_eq!(cue_samples(Cue::LineClear).len(), rate * 4 / 10);
        assert_eq!(cue_samples(Cue::GameOver).len(), rate * 12 / 10);
    }

    #[test]
    fn test_cues_stay_in_range() {
        for cue in [Cue::Place, Cue::LineClear, Cue::GameOver] {
            let samples = cue_samples(cue);
            assert!(peak(&samples) <= 1.0, "{} clips", cue.name());
            assert!(peak(&samples) > 0.01, "{} is silent", cue.name());
        }
    }

    #[test]
    fn test_marimba_decays() {
        let note = marimba(440.0);
        let head = peak(&note[..note.len() / 4]);
        let tail = peak(&note[note.len() * 3 / 4..]);
        assert!(tail < head / 10.0);
    }

    #[test]
    fn test_music_loop_is_two_bars() {
        let music = music_loop();
        let step_len = (60.0 / BPM / 4.0 * SAMPLE_RATE as f32) as usize;
        assert_eq!(music.len(), step_len * STEPS);
        assert!(peak(&music) <= 1.0);
        assert_eq!(music, music_loop());
    }

    #[test]
    fn test_mix_clips_at_end() {
        let mut buf = vec![0.0; 4];
        mix_into(&mut buf, 2, &[1.0, 1.0, 1.0]);
        assert_eq!(buf, vec![0.0, 0.0, 1.0, 1.0]);
    }
}
