// syn.txt -- a text based synthesizer and audio workstation
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

// Composing patterns
pub mod interval;
pub mod polyrhythm;

// Voices to play them on
pub mod patch;

pub mod dump;

// Utility modules
pub mod rational;
