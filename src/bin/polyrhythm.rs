// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `polyrhythm` - builds polyrhythmic voice patterns and lists the notes they play.

use std::io;

use log::info;
use structopt::StructOpt;

use syn_poly::dump;
use syn_poly::patch::Patches;
use syn_poly::polyrhythm::{self, FrequencyFn, Pan, PolyrhythmSpec, Subdivisions};
use syn_poly::rational::Rational;

#[derive(Debug, StructOpt)]
#[structopt(name = "polyrhythm", about = "Playing several subdivisions of a bar at once")]
struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: usize,

    /// Notes per bar, one voice each. Five against nine if not given.
    subdivisions: Vec<f64>,

    /// The patch all voices are played on.
    #[structopt(short, long, default_value = "default")]
    instrument: String,

    #[structopt(long, default_value = "0.1")]
    amp: f64,

    /// How long each note is held, in seconds.
    #[structopt(long, default_value = "0.02")]
    sustain: f64,

    /// Pan position per voice, repeated for more voices than positions. Spread evenly if not given.
    #[structopt(long, number_of_values = 1, allow_hyphen_values = true)]
    pan: Vec<f64>,

    /// Frequency multiplier of the first note of every cycle, e.g. `2` or `3/2`.
    #[structopt(long, default_value = "1")]
    first_note_mul: Rational,

    /// Root frequency in Hz.
    #[structopt(long, default_value = "220")]
    root: f64,

    /// Derive voice frequencies from just intervals this many semitones apart,
    /// instead of half-root steps.
    #[structopt(long, allow_hyphen_values = true)]
    interval_step: Option<i64>,

    /// Number of bars of notes to list.
    #[structopt(short, long, default_value = "1")]
    bars: f64,

    /// List the available patches and exit.
    #[structopt(long)]
    list_instruments: bool,
}

impl Opt {
    /// The pattern parameters selected on the command line.
    fn spec(&self) -> PolyrhythmSpec {
        PolyrhythmSpec {
            subdivisions: if self.subdivisions.is_empty() {
                Subdivisions::default()
            } else {
                self.subdivisions.clone().into()
            },
            instrument: self.instrument.clone(),
            amplitude: self.amp,
            sustain: self.sustain,
            pan: if self.pan.is_empty() {
                Pan::Auto
            } else {
                Pan::PerVoice(self.pan.clone())
            },
            first_note_multiplier: self.first_note_mul.to_f64(),
            root: self.root,
            frequency: self
                .interval_step
                .map_or_else(FrequencyFn::default, FrequencyFn::interval_steps),
        }
    }
}

fn main() -> io::Result<()> {
    let opt = Opt::from_args();

    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let patches = Patches::builtin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if opt.list_instruments {
        return dump::write_patches(&mut out, &patches);
    }

    let spec = opt.spec();
    let voices = polyrhythm::build_polyrhythms(&spec)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    patches
        .check(&voices)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    info!(
        "{} voices on {}, listing {} bars",
        voices.len(),
        spec.instrument,
        opt.bars
    );
    dump::write_voices(&mut out, &voices, opt.bars)
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> Opt {
        Opt::from_iter(std::iter::once("polyrhythm").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let spec = parse(&[]).spec();
        assert_eq!(spec.subdivisions, Subdivisions::default());
        assert_eq!(spec.pan, Pan::Auto);
        assert_eq!(spec.instrument, "default");
        assert_eq!(spec.first_note_multiplier, 1.0);

        let voices = polyrhythm::build_polyrhythms(&spec).unwrap();
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[0].subdivision(), 5.0);
        assert_eq!(voices[1].subdivision(), 9.0);
    }

    #[test]
    fn subdivisions_and_pans() {
        let spec = parse(&["3", "4", "7", "--pan", "0.1", "--pan=-0.2"]).spec();
        assert_eq!(spec.subdivisions, Subdivisions::from(vec![3.0, 4.0, 7.0]));
        assert_eq!(spec.pan, Pan::PerVoice(vec![0.1, -0.2]));
    }

    #[test]
    fn rational_first_note() {
        let spec = parse(&["--first-note-mul", "3/2", "-i", "kick"]).spec();
        assert_eq!(spec.first_note_multiplier, 1.5);
        assert_eq!(spec.instrument, "kick");
    }

    #[test]
    fn interval_step_frequencies() {
        let spec = parse(&["--interval-step", "7", "--root", "220"]).spec();
        let voices = polyrhythm::build_polyrhythms(&spec).unwrap();
        assert_eq!(voices[0].frequencies().base, 220.0);
        assert_eq!(voices[1].frequencies().base, 330.0);
    }
}
