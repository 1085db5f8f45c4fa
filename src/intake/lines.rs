//-
// Copyright (c) 2026, The Mailintake Authors
//
// This file is part of Mailintake.
//
// Mailintake is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Mailintake is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for
// more details.
//
// You should have received a copy of the GNU General Public License along with
// Mailintake. If not, see <http://www.gnu.org/licenses/>.

//! Reconstruction of logical `key: value` lines from normalised text.
//!
//! Human-written requests wrap long values across several physical lines.
//! Each physical line is classified on its own, then a small state machine
//! glues continuations back onto the field they belong to.

use super::model::FieldKey;
use crate::support::intake_config::ParserConfig;

/// How a single physical line was classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line<'a> {
    /// A line introducing a recognised field.
    Field { key: FieldKey, value: &'a str },
    /// Any other non-blank line. Whether it is kept depends on whether a
    /// field has been seen yet.
    Continuation(&'a str),
    /// A closing salutation or signature delimiter. Continuations after it
    /// belong to the signature, not to the last field.
    SignOff,
    /// A blank line.
    Noise,
}

/// A field and its complete value, continuations included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldLine {
    pub key: FieldKey,
    pub value: String,
}

/// Normalises a free-text field key for lookup: lower-cased, with everything
/// that is not a letter removed.
pub fn normalise_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Classifies one physical line.
///
/// A line is only a field if it actually contains a colon and the text before
/// the first colon names a known field. Everything else with content is a
/// continuation, which includes lines such as `https://...` or `Note: ...`
/// whose prefix is not a known key.
pub fn classify<'a>(line: &'a str, config: &ParserConfig) -> Line<'a> {
    let line = line.trim();
    if line.is_empty() {
        return Line::Noise;
    }

    if is_sign_off(line, &config.sign_offs) {
        return Line::SignOff;
    }

    if let Some((raw_key, value)) = line.split_once(':') {
        if let Some(key) = config.field_key(&normalise_key(raw_key)) {
            return Line::Field {
                key,
                value: value.trim(),
            };
        }
    }

    Line::Continuation(line)
}

fn is_sign_off(line: &str, sign_offs: &[String]) -> bool {
    if "--" == line {
        return true;
    }

    let line =
        line.trim_end_matches(|c: char| ',' == c || '.' == c || '!' == c);
    sign_offs.iter().any(|s| s.eq_ignore_ascii_case(line))
}

enum State {
    /// No field seen yet; continuations here are greetings and other noise.
    Preamble,
    InField(FieldLine),
    /// After a sign-off; continuations here are the signature.
    Closed,
}

/// Splits normalised text into logical field lines, in order of appearance.
pub fn reconstruct(text: &str, config: &ParserConfig) -> Vec<FieldLine> {
    let mut fields = Vec::new();
    let mut state = State::Preamble;

    for physical in text.lines() {
        state = match (state, classify(physical, config)) {
            (state, Line::Noise) => state,
            (State::Preamble, Line::Continuation(_)) => State::Preamble,
            (State::Closed, Line::Continuation(_)) => State::Closed,
            (state, Line::SignOff) => {
                if let State::InField(done) = state {
                    fields.push(done);
                }
                State::Closed
            }
            (State::InField(mut current), Line::Continuation(text)) => {
                if !current.value.is_empty() {
                    current.value.push(' ');
                }
                current.value.push_str(text);
                State::InField(current)
            }
            (state, Line::Field { key, value }) => {
                if let State::InField(done) = state {
                    fields.push(done);
                }
                State::InField(FieldLine {
                    key,
                    value: value.to_owned(),
                })
            }
        };
    }

    if let State::InField(done) = state {
        fields.push(done);
    }

    fields
}
