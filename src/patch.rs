// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Declarative descriptions of the synthesizer voices that patterns are played on.
//!
//! Every patch is a chain of source -> envelope -> (filter) -> pan -> output.
//! Turning these into sound is the job of the playback engine.

use std::fmt;

use log::debug;
use snafu::Snafu;

use crate::polyrhythm::VoicePattern;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaveShape {
    Sine,
    Saw,
    Square,
    Triangle,
}

/// Where the sound of a patch comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Oscillator at the note frequency.
    Oscillator(WaveShape),
    /// Oscillator starting at `start_ratio` times the note frequency and falling
    /// to the note frequency over `sweep` seconds.
    Sweep {
        shape: WaveShape,
        start_ratio: f64,
        sweep: f64,
    },
    /// White noise, ignores the note frequency.
    Noise,
    /// White noise mixed with an oscillator at the note frequency.
    /// `tone` is the share of the oscillator, between 0.0 and 1.0.
    NoisyTone { shape: WaveShape, tone: f64 },
}

/// Volume shape of a single triggered note.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Rise over `attack` seconds, then fall over `release` seconds, regardless of sustain.
    Percussive { attack: f64, release: f64 },
    /// Rise over `attack` seconds, hold for the sustain of the note, then fall over
    /// `release` seconds.
    Sustained { attack: f64, release: f64 },
}

impl Envelope {
    /// Total length in seconds of a note held for `sustain` seconds.
    ///
    /// ```
    /// # use syn_poly::patch::*;
    /// let perc = Envelope::Percussive { attack: 0.25, release: 0.5 };
    /// assert_eq!(perc.length(2.0), 0.75);
    /// let linen = Envelope::Sustained { attack: 0.25, release: 0.5 };
    /// assert_eq!(linen.length(2.0), 2.75);
    /// ```
    pub fn length(&self, sustain: f64) -> f64 {
        match self {
            Envelope::Percussive { attack, release } => attack + release,
            Envelope::Sustained { attack, release } => attack + sustain.max(0.0) + release,
        }
    }
}

/// Biquadratic filters applied after the envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Lowpass { cutoff: f64, q: f64 },
    Highpass { cutoff: f64, q: f64 },
    Bandpass { center: f64, q: f64 },
}

/// A named synthesizer voice.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub name: String,
    pub source: Source,
    pub envelope: Envelope,
    pub filter: Option<Filter>,
    /// Output gain, multiplied with the amplitude of each note.
    pub gain: f64,
}

impl Patch {
    pub fn new(name: &str, source: Source, envelope: Envelope) -> Self {
        Self {
            name: name.to_string(),
            source,
            envelope,
            filter: None,
            gain: 1.0,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    /// A filtered saw with a short fade in and out.
    pub fn default_voice() -> Self {
        Patch::new(
            "default",
            Source::Oscillator(WaveShape::Saw),
            Envelope::Sustained {
                attack: 0.01,
                release: 0.3,
            },
        )
        .with_filter(Filter::Lowpass {
            cutoff: 2000.0,
            q: 0.7,
        })
        .with_gain(0.5)
    }

    pub fn sine() -> Self {
        Patch::new(
            "sine",
            Source::Oscillator(WaveShape::Sine),
            Envelope::Sustained {
                attack: 0.005,
                release: 0.3,
            },
        )
    }

    pub fn saw() -> Self {
        Patch::new(
            "saw",
            Source::Oscillator(WaveShape::Saw),
            Envelope::Sustained {
                attack: 0.01,
                release: 0.2,
            },
        )
        .with_filter(Filter::Lowpass {
            cutoff: 3000.0,
            q: 0.7,
        })
        .with_gain(0.6)
    }

    /// A sine dropping two octaves into the note frequency.
    pub fn kick() -> Self {
        Patch::new(
            "kick",
            Source::Sweep {
                shape: WaveShape::Sine,
                start_ratio: 4.0,
                sweep: 0.05,
            },
            Envelope::Percussive {
                attack: 0.001,
                release: 0.4,
            },
        )
    }

    pub fn snare() -> Self {
        Patch::new(
            "snare",
            Source::NoisyTone {
                shape: WaveShape::Triangle,
                tone: 0.3,
            },
            Envelope::Percussive {
                attack: 0.001,
                release: 0.2,
            },
        )
        .with_filter(Filter::Bandpass {
            center: 1800.0,
            q: 1.0,
        })
    }

    pub fn hihat() -> Self {
        Patch::new(
            "hihat",
            Source::Noise,
            Envelope::Percussive {
                attack: 0.001,
                release: 0.05,
            },
        )
        .with_filter(Filter::Highpass {
            cutoff: 8000.0,
            q: 0.7,
        })
        .with_gain(0.7)
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WaveShape::Sine => "sine",
            WaveShape::Saw => "saw",
            WaveShape::Square => "square",
            WaveShape::Triangle => "triangle",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Oscillator(shape) => write!(f, "{} oscillator", shape),
            Source::Sweep {
                shape,
                start_ratio,
                sweep,
            } => write!(f, "{} sweep(x{}, {})", shape, start_ratio, sweep),
            Source::Noise => write!(f, "noise"),
            Source::NoisyTone { shape, tone } => write!(f, "noise + {} {}", shape, tone),
        }
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Envelope::Percussive { attack, release } => write!(f, "perc({}, {})", attack, release),
            Envelope::Sustained { attack, release } => {
                write!(f, "linen({}, sustain, {})", attack, release)
            }
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Lowpass { cutoff, q } => write!(f, "lowpass({}, {})", cutoff, q),
            Filter::Highpass { cutoff, q } => write!(f, "highpass({}, {})", cutoff, q),
            Filter::Bandpass { center, q } => write!(f, "bandpass({}, {})", center, q),
        }
    }
}

/// The signal chain of the patch.
///
/// ```
/// # use syn_poly::patch::*;
/// assert_eq!(
///     Patch::sine().to_string(),
///     "sine: sine oscillator -> linen(0.005, sustain, 0.3) -> pan -> out"
/// );
/// assert_eq!(
///     Patch::hihat().to_string(),
///     "hihat: noise -> perc(0.001, 0.05) -> highpass(8000, 0.7) -> pan -> out * 0.7"
/// );
/// ```
impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.name, self.source, self.envelope)?;
        if let Some(filter) = &self.filter {
            write!(f, " -> {}", filter)?;
        }
        write!(f, " -> pan -> out")?;
        if self.gain != 1.0 {
            write!(f, " * {}", self.gain)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum PatchError {
    #[snafu(display("Instrument {:?} does not exist", name))]
    UnknownInstrument { name: String },
}

/// Patches by name, in the order they were registered.
#[derive(Debug, Clone, Default)]
pub struct Patches {
    patches: Vec<Patch>,
}

impl Patches {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in voices: default, sine, saw, kick, snare and hihat.
    pub fn builtin() -> Self {
        let mut patches = Patches::new();
        for patch in vec![
            Patch::default_voice(),
            Patch::sine(),
            Patch::saw(),
            Patch::kick(),
            Patch::snare(),
            Patch::hihat(),
        ] {
            patches.register(patch);
        }
        patches
    }

    /// Add a patch, replacing any previous patch of the same name.
    pub fn register(&mut self, patch: Patch) {
        if let Some(existing) = self.patches.iter_mut().find(|p| p.name == patch.name) {
            debug!("replacing patch {:?}", patch.name);
            *existing = patch;
        } else {
            self.patches.push(patch);
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&Patch, PatchError> {
        self.patches
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| PatchError::UnknownInstrument {
                name: name.to_string(),
            })
    }

    /// Make sure that every voice refers to a known patch.
    pub fn check(&self, voices: &[VoicePattern]) -> Result<(), PatchError> {
        for voice in voices {
            self.lookup(voice.instrument())?;
        }
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patches.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Patch> {
        self.patches.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::polyrhythm::{build_polyrhythms, PolyrhythmSpec};

    #[test]
    fn builtin_names() {
        let patches = Patches::builtin();
        let names: Vec<&str> = patches.names().collect();
        assert_eq!(
            names,
            vec!["default", "sine", "saw", "kick", "snare", "hihat"]
        );
    }

    #[test]
    fn lookup() {
        let patches = Patches::builtin();
        assert_eq!(patches.lookup("kick").map(|p| p.gain), Ok(1.0));
        assert_eq!(
            patches.lookup("cowbell"),
            Err(PatchError::UnknownInstrument {
                name: "cowbell".to_string()
            })
        );
    }

    #[test]
    fn register_replaces() {
        let mut patches = Patches::builtin();
        patches.register(Patch::sine().with_gain(0.25));
        assert_eq!(patches.names().count(), 6);
        assert_eq!(patches.lookup("sine").map(|p| p.gain), Ok(0.25));

        patches.register(Patch::new(
            "blip",
            Source::Oscillator(WaveShape::Square),
            Envelope::Percussive {
                attack: 0.0,
                release: 0.01,
            },
        ));
        assert_eq!(patches.names().last(), Some("blip"));
    }

    #[test]
    fn check_voices() {
        let patches = Patches::builtin();
        let spec = PolyrhythmSpec {
            instrument: "snare".to_string(),
            ..Default::default()
        };
        assert_eq!(patches.check(&build_polyrhythms(&spec).unwrap()), Ok(()));

        let spec = PolyrhythmSpec {
            instrument: "gong".to_string(),
            ..Default::default()
        };
        assert!(patches.check(&build_polyrhythms(&spec).unwrap()).is_err());
    }

    #[test]
    fn note_lengths() {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-12;
        assert!(close(Patch::kick().envelope.length(0.02), 0.401));
        assert!(close(Patch::sine().envelope.length(0.02), 0.325));
        // negative sustain does not shorten the note
        assert!(close(Patch::sine().envelope.length(-1.0), 0.305));
    }

    #[test]
    fn display_chain() {
        assert_eq!(
            Patch::kick().to_string(),
            "kick: sine sweep(x4, 0.05) -> perc(0.001, 0.4) -> pan -> out"
        );
        assert_eq!(
            Patch::snare().to_string(),
            "snare: noise + triangle 0.3 -> perc(0.001, 0.2) -> bandpass(1800, 1) -> pan -> out"
        );
    }
}
