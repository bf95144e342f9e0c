// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Just intonation intervals.

use crate::rational::Rational;

pub const SEMITONES_PER_OCTAVE: i64 = 12;

/// Frequency ratios of the twelve semitones of one octave, from unison to the major seventh.
pub const RATIO_TABLE: [Rational; 12] = [
    Rational::new(1, 1),   // unison
    Rational::new(16, 15), // minor second
    Rational::new(9, 8),   // major second
    Rational::new(6, 5),   // minor third
    Rational::new(5, 4),   // major third
    Rational::new(4, 3),   // perfect fourth
    Rational::new(7, 5),   // septimal tritone
    Rational::new(3, 2),   // perfect fifth
    Rational::new(8, 5),   // minor sixth
    Rational::new(5, 3),   // major sixth
    Rational::new(7, 4),   // harmonic seventh
    Rational::new(15, 8),  // major seventh
];

/// Frequency multiplier of an interval spanning `semitones` above (or below, if negative) unison.
///
/// # Panics
///
/// Overflows the underlying fraction for offsets of more than about 60 octaves.
///
/// # Examples
///
/// ```
/// use syn_poly::interval::*;
/// use syn_poly::rational::Rational;
///
/// assert_eq!(ratio(0), Rational::ONE);
/// assert_eq!(ratio(7), Rational::new(3, 2));
/// assert_eq!(ratio(19), Rational::int(3));
/// assert_eq!(ratio(-5), Rational::new(3, 4));
/// assert_eq!(ratio(-12), Rational::new(1, 2));
/// ```
pub fn ratio(semitones: i64) -> Rational {
    let index = semitones.rem_euclid(SEMITONES_PER_OCTAVE) as usize;
    let octaves = semitones.div_euclid(SEMITONES_PER_OCTAVE);
    RATIO_TABLE[index] * Rational::int(2).powi(octaves)
}

/// Like [`ratio`], as a float.
pub fn ratio_f64(semitones: i64) -> f64 {
    ratio(semitones).to_f64()
}
