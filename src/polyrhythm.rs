// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Polyrhythms: several voices subdividing the same bar into different numbers of notes,
//! spread across the stereo field.
//!
//! The voices built here are inert descriptions. Playing them is up to whatever engine
//! they are handed to.

use std::fmt;
use std::iter;
use std::sync::Arc;

use log::{debug, trace};
use snafu::Snafu;

use crate::interval;

/// The frequency all voices are derived from.
pub const ROOT_FREQUENCY: f64 = 220.0;

/// Most notes per bar a single voice may play.
pub const MAX_SUBDIVISION: f64 = 1_048_576.0;

/// Number of notes per bar for each voice, one voice per entry.
///
/// A single number is a single voice:
///
/// ```
/// # use syn_poly::polyrhythm::*;
/// assert_eq!(Subdivisions::from(9.0).as_slice(), &[9.0]);
/// assert_eq!(Subdivisions::from([3.0, 4.0]).len(), 2);
/// assert_eq!(Subdivisions::default().as_slice(), &[5.0, 9.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Subdivisions(Vec<f64>);

impl Subdivisions {
    pub fn new(counts: Vec<f64>) -> Self {
        Subdivisions(counts)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Five against nine.
impl Default for Subdivisions {
    fn default() -> Self {
        Subdivisions(vec![5.0, 9.0])
    }
}

impl From<f64> for Subdivisions {
    fn from(count: f64) -> Self {
        Subdivisions(vec![count])
    }
}

impl From<Vec<f64>> for Subdivisions {
    fn from(counts: Vec<f64>) -> Self {
        Subdivisions(counts)
    }
}

impl From<&[f64]> for Subdivisions {
    fn from(counts: &[f64]) -> Self {
        Subdivisions(counts.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Subdivisions {
    fn from(counts: [f64; N]) -> Self {
        Subdivisions(counts.to_vec())
    }
}

/// Stereo placement of the voices, -1.0 being full left and 1.0 full right.
#[derive(Debug, Clone, PartialEq)]
pub enum Pan {
    /// Centered for a single voice, otherwise evenly spread from left to right.
    Auto,
    /// All voices at the same position.
    Fixed(f64),
    /// One position per voice, wrapping around if there are more voices than positions.
    PerVoice(Vec<f64>),
}

impl Pan {
    /// Position of voice `index` out of `voices`.
    /// The caller has to make sure that a `PerVoice` pan is not empty.
    fn position(&self, index: usize, voices: usize) -> f64 {
        match self {
            Pan::Auto if voices <= 1 => 0.0,
            // Dividing last keeps the outermost voices exactly at -1 and 1.
            Pan::Auto => -1.0 + 2.0 * index as f64 / (voices - 1) as f64,
            Pan::Fixed(pan) => *pan,
            Pan::PerVoice(pans) => pans[index % pans.len()],
        }
    }
}

impl Default for Pan {
    fn default() -> Self {
        Pan::Auto
    }
}

impl From<f64> for Pan {
    fn from(pan: f64) -> Self {
        Pan::Fixed(pan)
    }
}

impl From<Vec<f64>> for Pan {
    fn from(pans: Vec<f64>) -> Self {
        Pan::PerVoice(pans)
    }
}

/// Computes the base frequency of a voice from the root frequency and the index of the voice.
#[derive(Clone)]
pub struct FrequencyFn(Arc<dyn Fn(f64, usize) -> f64 + Send + Sync>);

impl FrequencyFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f64, usize) -> f64 + Send + Sync + 'static,
    {
        FrequencyFn(Arc::new(f))
    }

    /// Each voice half the root higher than the previous one: 220, 330, 440, ...
    ///
    /// ```
    /// # use syn_poly::polyrhythm::*;
    /// let f = FrequencyFn::harmonic_steps();
    /// assert_eq!(f.eval(220.0, 0), 220.0);
    /// assert_eq!(f.eval(220.0, 1), 330.0);
    /// assert_eq!(f.eval(220.0, 4), 660.0);
    /// ```
    pub fn harmonic_steps() -> Self {
        FrequencyFn::new(|root, index| root + (root / 2.0 * index as f64))
    }

    /// Each voice `step` just intonation semitones above the previous one.
    ///
    /// ```
    /// # use syn_poly::polyrhythm::*;
    /// let fifths = FrequencyFn::interval_steps(7);
    /// assert_eq!(fifths.eval(220.0, 0), 220.0);
    /// assert_eq!(fifths.eval(220.0, 1), 330.0);
    /// assert_eq!(fifths.eval(220.0, 2), 495.0);
    /// ```
    pub fn interval_steps(step: i64) -> Self {
        FrequencyFn::new(move |root, index| root * interval::ratio_f64(index as i64 * step))
    }

    pub fn eval(&self, root: f64, index: usize) -> f64 {
        (self.0)(root, index)
    }
}

impl Default for FrequencyFn {
    fn default() -> Self {
        FrequencyFn::harmonic_steps()
    }
}

impl fmt::Debug for FrequencyFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrequencyFn(..)")
    }
}

/// Parameters of a set of polyrhythmic voices.
///
/// ```
/// # use syn_poly::polyrhythm::*;
/// let spec = PolyrhythmSpec {
///     subdivisions: [3.0, 4.0].into(),
///     instrument: "kick".into(),
///     ..Default::default()
/// };
/// let voices = build_polyrhythms(&spec).unwrap();
/// assert_eq!(voices.len(), 2);
/// assert_eq!(voices[1].duration(), 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct PolyrhythmSpec {
    pub subdivisions: Subdivisions,
    /// Name of the patch the voices are played on.
    pub instrument: String,
    pub amplitude: f64,
    /// How long each note is held, in seconds.
    pub sustain: f64,
    pub pan: Pan,
    /// Applied to the first note of every cycle only, accenting the downbeat.
    pub first_note_multiplier: f64,
    /// Passed to `frequency` as the root frequency.
    pub root: f64,
    pub frequency: FrequencyFn,
}

impl Default for PolyrhythmSpec {
    fn default() -> Self {
        Self {
            subdivisions: Subdivisions::default(),
            instrument: "default".to_string(),
            amplitude: 0.1,
            sustain: 0.02,
            pan: Pan::Auto,
            first_note_multiplier: 1.0,
            root: ROOT_FREQUENCY,
            frequency: FrequencyFn::default(),
        }
    }
}

/// The frequencies of a voice: the first note, then `repeats` notes at the base frequency,
/// all over again.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrequencyCycle {
    pub first: f64,
    pub base: f64,
    pub repeats: usize,
}

impl FrequencyCycle {
    /// Number of notes per cycle.
    pub fn len(&self) -> usize {
        self.repeats.saturating_add(1)
    }

    /// One cycle of frequencies.
    pub fn cycle(&self) -> Vec<f64> {
        self.iter().take(self.len()).collect()
    }

    /// The endless frequency sequence.
    pub fn iter(&self) -> impl Iterator<Item = f64> + Clone {
        iter::once(self.first)
            .chain(iter::repeat(self.base).take(self.repeats))
            .cycle()
    }
}

/// Compact form of one cycle, e.g. `[440, 220 x 4]`.
///
/// ```
/// # use syn_poly::polyrhythm::*;
/// let cycle = FrequencyCycle { first: 440.0, base: 220.0, repeats: 4 };
/// assert_eq!(cycle.to_string(), "[440, 220 x 4]");
/// let single = FrequencyCycle { first: 330.0, base: 330.0, repeats: 0 };
/// assert_eq!(single.to_string(), "[330]");
/// ```
impl fmt::Display for FrequencyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeats == 0 {
            write!(f, "[{}]", self.first)
        } else {
            write!(f, "[{}, {} x {}]", self.first, self.base, self.repeats)
        }
    }
}

/// A single voice of a polyrhythm, ready to be played repeatedly.
#[derive(Debug, Clone, PartialEq)]
pub struct VoicePattern {
    instrument: String,
    frequencies: FrequencyCycle,
    subdivision: f64,
    duration: f64,
    amplitude: f64,
    sustain: f64,
    pan: f64,
}

/// A single note of a voice pattern.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Trigger {
    /// Start of the note, in bars since the pattern started.
    pub onset: f64,
    pub frequency: f64,
    /// Time until the next note, in bars.
    pub duration: f64,
    pub amplitude: f64,
    pub sustain: f64,
    pub pan: f64,
}

impl VoicePattern {
    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn frequencies(&self) -> &FrequencyCycle {
        &self.frequencies
    }

    /// Number of notes per bar this voice was built for.
    pub fn subdivision(&self) -> f64 {
        self.subdivision
    }

    /// Length of a note in bars.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn sustain(&self) -> f64 {
        self.sustain
    }

    pub fn pan(&self) -> f64 {
        self.pan
    }

    /// All notes of the pattern, without end.
    pub fn triggers(&self) -> impl Iterator<Item = Trigger> + '_ {
        self.frequencies
            .iter()
            .enumerate()
            .map(move |(k, frequency)| Trigger {
                // Dividing instead of multiplying with the duration keeps bar lines exact.
                onset: k as f64 / self.subdivision,
                frequency,
                duration: self.duration,
                amplitude: self.amplitude,
                sustain: self.sustain,
                pan: self.pan,
            })
    }

    /// The notes starting within the first `bars` bars.
    pub fn triggers_within(&self, bars: f64) -> impl Iterator<Item = Trigger> + '_ {
        self.triggers().take_while(move |trigger| trigger.onset < bars)
    }
}

/// Possible errors when building polyrhythms.
#[derive(Debug, PartialEq, Snafu)]
pub enum PatternError {
    #[snafu(display("No subdivisions given"))]
    EmptySubdivisions,
    #[snafu(display("Subdivision {} of voice {} is not a positive number", value, index))]
    InvalidSubdivision { index: usize, value: f64 },
    #[snafu(display(
        "Subdivision {} of voice {} exceeds {} notes per bar",
        value,
        index,
        MAX_SUBDIVISION
    ))]
    TooManyNotes { index: usize, value: f64 },
    #[snafu(display("Pan positions must not be empty"))]
    EmptyPan,
    #[snafu(display("Frequency {} of voice {} is not a positive number", value, index))]
    InvalidFrequency { index: usize, value: f64 },
}

/// Build one voice per subdivision.
///
/// Non-integer subdivisions keep their exact note length, the number of notes per cycle
/// is truncated towards zero.
///
/// ```
/// # use syn_poly::polyrhythm::*;
/// let voices = build_polyrhythms(&PolyrhythmSpec::default()).unwrap();
/// assert_eq!(voices[0].duration(), 1.0 / 5.0);
/// assert_eq!(voices[1].duration(), 1.0 / 9.0);
/// assert_eq!(voices[0].pan(), -1.0);
/// assert_eq!(voices[1].pan(), 1.0);
/// ```
pub fn build_polyrhythms(spec: &PolyrhythmSpec) -> Result<Vec<VoicePattern>, PatternError> {
    let counts = spec.subdivisions.as_slice();
    if counts.is_empty() {
        return Err(PatternError::EmptySubdivisions);
    }
    if let Pan::PerVoice(pans) = &spec.pan {
        if pans.is_empty() {
            return Err(PatternError::EmptyPan);
        }
    }

    debug!(
        "building {} voices on {:?} from {:?}",
        counts.len(),
        spec.instrument,
        counts
    );

    counts
        .iter()
        .enumerate()
        .map(|(index, &count)| build_voice(spec, index, count))
        .collect()
}

fn build_voice(
    spec: &PolyrhythmSpec,
    index: usize,
    count: f64,
) -> Result<VoicePattern, PatternError> {
    if !(count.is_finite() && count > 0.0) {
        return Err(PatternError::InvalidSubdivision { index, value: count });
    }
    if count > MAX_SUBDIVISION {
        return Err(PatternError::TooManyNotes { index, value: count });
    }

    let base = spec.frequency.eval(spec.root, index);
    if !(base.is_finite() && base > 0.0) {
        return Err(PatternError::InvalidFrequency { index, value: base });
    }

    let first = base * spec.first_note_multiplier;
    if !(first.is_finite() && first > 0.0) {
        return Err(PatternError::InvalidFrequency {
            index,
            value: first,
        });
    }

    let frequencies = FrequencyCycle {
        first,
        base,
        // Bounded by MAX_SUBDIVISION, subdivisions below one get no repetitions.
        repeats: (count - 1.0).trunc().max(0.0) as usize,
    };
    let pan = spec.pan.position(index, spec.subdivisions.len());

    trace!("voice {}: {} per bar at {} Hz, pan {}", index, count, base, pan);

    Ok(VoicePattern {
        instrument: spec.instrument.clone(),
        frequencies,
        subdivision: count,
        duration: 1.0 / count,
        amplitude: spec.amplitude,
        sustain: spec.sustain,
        pan,
    })
}
