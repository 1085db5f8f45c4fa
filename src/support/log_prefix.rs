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

use std::fmt;

/// Text included at the start of every log statement concerning one inbound
/// message.
///
/// Subjects are attacker-controlled, so they are stripped of control
/// characters and truncated before they reach the log.
#[derive(Clone, Debug, Default)]
pub struct LogPrefix {
    source: Option<String>,
    subject: Option<String>,
}

impl LogPrefix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_subject(subject: &str) -> Self {
        let mut this = Self::new();
        this.set_subject(subject);
        this
    }

    /// Records where the message came from, such as a file name.
    pub fn set_source(&mut self, source: String) {
        self.source = Some(sanitise(source));
    }

    pub fn set_subject(&mut self, subject: &str) {
        let subject = sanitise(subject.to_owned());
        self.subject = if subject.is_empty() {
            None
        } else {
            Some(subject)
        };
    }
}

impl fmt::Display for LogPrefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "intake")?;
        if self.source.is_none() && self.subject.is_none() {
            return Ok(());
        }

        write!(f, "[")?;
        if let Some(ref source) = self.source {
            write!(f, "{}", source)?;
            if self.subject.is_some() {
                write!(f, " ")?;
            }
        }
        if let Some(ref subject) = self.subject {
            write!(f, "subject={:?}", subject)?;
        }
        write!(f, "]")
    }
}

fn sanitise(mut s: String) -> String {
    s.retain(|c| !c.is_control());
    if let Some((truncate_len, _)) = s.char_indices().nth(64) {
        s.truncate(truncate_len);
    }

    s
}
