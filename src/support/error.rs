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
use std::io;

use serde::Serialize;
use thiserror::Error;

/// Failures of the ambient machinery around the intake pipeline: reading
/// inputs, loading configuration, writing output.
///
/// The pipeline itself never produces these; malformed messages are
/// expressed as a `Rejection`.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Bad configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Unable to render configuration: {0}")]
    ConfigRender(#[from] toml::ser::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// The reason a message did not yield an `AccessRequestDraft`.
///
/// This is an ordinary outcome, not an exceptional one. A caller processing a
/// batch logs it and moves on to the next message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Missing required fields: {}", FieldList(.0))]
    MissingRequiredFields(Vec<RequiredField>),
    #[error("Subject does not look like an access request")]
    NotAnAccessRequest,
}

/// The fields whose absence causes a message to be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    Organization,
    Email,
    Purpose,
    ContactPerson,
    DataTypes,
    Justification,
}

impl RequiredField {
    pub fn name(self) -> &'static str {
        match self {
            RequiredField::Organization => "organization",
            RequiredField::Email => "email",
            RequiredField::Purpose => "purpose",
            RequiredField::ContactPerson => "contactPerson",
            RequiredField::DataTypes => "dataTypes",
            RequiredField::Justification => "justification",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct FieldList<'a>(&'a [RequiredField]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (ix, field) in self.0.iter().enumerate() {
            if ix > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejection_lists_every_missing_field() {
        let rejection = Rejection::MissingRequiredFields(vec![
            RequiredField::Organization,
            RequiredField::Purpose,
        ]);
        assert_eq!(
            "Missing required fields: organization, purpose",
            rejection.to_string()
        );
    }
}
