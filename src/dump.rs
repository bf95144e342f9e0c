// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Human readable listings of voice patterns.

use std::io;

use crate::patch::Patches;
use crate::polyrhythm::VoicePattern;

/// Write every voice followed by the notes it plays within the first `bars` bars.
pub fn write_voices(
    out: &mut dyn io::Write,
    voices: &[VoicePattern],
    bars: f64,
) -> io::Result<()> {
    for (index, voice) in voices.iter().enumerate() {
        write_voice(out, index, voice)?;
        for trigger in voice.triggers_within(bars) {
            writeln!(out, "  {:>8.4} {:>9.2} Hz", trigger.onset, trigger.frequency)?;
        }
    }
    Ok(())
}

fn write_voice(out: &mut dyn io::Write, index: usize, voice: &VoicePattern) -> io::Result<()> {
    writeln!(
        out,
        "voice {}: {} x {} per bar, pan {}, amp {}, sustain {}",
        index,
        voice.instrument(),
        voice.subdivision(),
        voice.pan(),
        voice.amplitude(),
        voice.sustain()
    )?;
    writeln!(out, "  cycle {}", voice.frequencies())
}

/// Write the signal chain of every known patch, one per line.
pub fn write_patches(out: &mut dyn io::Write, patches: &Patches) -> io::Result<()> {
    for patch in patches.iter() {
        writeln!(out, "{}", patch)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::polyrhythm::{build_polyrhythms, PolyrhythmSpec};

    fn render(voices: &[VoicePattern], bars: f64) -> String {
        let mut buf = Vec::new();
        write_voices(&mut buf, voices, bars).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn listing() {
        let spec = PolyrhythmSpec {
            subdivisions: [2.0, 3.0].into(),
            first_note_multiplier: 2.0,
            ..Default::default()
        };
        let voices = build_polyrhythms(&spec).unwrap();
        let text = render(&voices, 1.0);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "voice 0: default x 2 per bar, pan -1, amp 0.1, sustain 0.02",
                "  cycle [440, 220 x 1]",
                "    0.0000    440.00 Hz",
                "    0.5000    220.00 Hz",
                "voice 1: default x 3 per bar, pan 1, amp 0.1, sustain 0.02",
                "  cycle [660, 330 x 2]",
                "    0.0000    660.00 Hz",
                "    0.3333    330.00 Hz",
                "    0.6667    330.00 Hz",
            ]
        );
    }

    #[test]
    fn zero_bars_lists_voices_only() {
        let voices = build_polyrhythms(&PolyrhythmSpec::default()).unwrap();
        assert_eq!(render(&voices, 0.0).lines().count(), 4);
    }

    #[test]
    fn dense_voice_prints_compact_cycle() {
        let spec = PolyrhythmSpec {
            subdivisions: 100_000f64.into(),
            ..Default::default()
        };
        let voices = build_polyrhythms(&spec).unwrap();
        let text = render(&voices, 0.0);
        assert_eq!(text.lines().nth(1), Some("  cycle [220, 220 x 99999]"));
    }

    #[test]
    fn patch_listing() {
        let mut buf = Vec::new();
        write_patches(&mut buf, &Patches::builtin()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.starts_with("default: saw oscillator"));
    }
}
