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

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::Error;
use crate::intake::lines::normalise_key;
use crate::intake::model::FieldKey;

/// Configuration for the intake parser.
///
/// This is typically stored in a file named `mailintake.toml`. Every section
/// is optional; an empty file yields the same configuration as
/// `ParserConfig::default()`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
    /// What to do when a field occurs more than once in a message.
    ///
    /// `email` is always taken from its first occurrence regardless of this
    /// setting, since later occurrences are usually addresses of officials
    /// or of people being copied.
    pub overwrite_policy: OverwritePolicy,

    /// If non-empty, only messages whose subject contains at least one of
    /// these (case-insensitively) are parsed. Others are rejected up front.
    pub subject_keywords: Vec<String>,

    /// Closing salutations which end the request proper. Matched
    /// case-insensitively against whole lines, ignoring trailing
    /// punctuation. A line consisting of `--` always counts.
    pub sign_offs: Vec<String>,

    // The TOML serialiser requires tables to follow plain values
    /// Maps normalised field keys to the field they denote.
    ///
    /// A key is normalised by lower-casing it and removing everything that is
    /// not a letter, so "Contact Person" is looked up as `contactperson`.
    /// Lines whose key is not in this table are treated as continuations of
    /// the previous field. Setting this replaces the built-in table entirely.
    pub field_aliases: BTreeMap<String, FieldKey>,

    /// Maps lower-cased data-type tokens to canonical taxonomy tags.
    ///
    /// Tokens not found here are passed through as `<token>_data`.
    pub data_types: BTreeMap<String, String>,

    /// Values used when the message does not state its expected usage.
    pub usage: UsageDefaults,

    /// Values used to synthesise an official when none could be extracted.
    pub fallback_official: FallbackOfficial,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OverwritePolicy {
    /// A field keeps the value of its first non-empty occurrence.
    FirstWins,
    /// Every non-empty occurrence replaces the previous value.
    LastWins,
}

impl Default for OverwritePolicy {
    fn default() -> Self {
        OverwritePolicy::FirstWins
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct UsageDefaults {
    pub requests_per_month: u32,
    pub duration: String,
}

impl Default for UsageDefaults {
    fn default() -> Self {
        UsageDefaults {
            requests_per_month: 1000,
            duration: "1 year".to_owned(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct FallbackOfficial {
    /// Used as the name if the message has no contact person either.
    pub name: String,
    pub title: String,
    /// Used as the email if the message has no email either.
    pub email: String,
}

impl Default for FallbackOfficial {
    fn default() -> Self {
        FallbackOfficial {
            name: "Contact Person".to_owned(),
            title: "Contact".to_owned(),
            email: "contact@unknown.com".to_owned(),
        }
    }
}

// Alternative spellings seen in real requests, on top of the canonical keys.
static EXTRA_ALIASES: &[(&str, FieldKey)] = &[
    ("organisation", FieldKey::Organization),
    ("organizationname", FieldKey::Organization),
    ("organisationname", FieldKey::Organization),
    ("agency", FieldKey::Organization),
    ("contactname", FieldKey::ContactPerson),
    ("emailaddress", FieldKey::Email),
    ("contactemail", FieldKey::Email),
    ("phonenumber", FieldKey::Phone),
    ("contactphone", FieldKey::Phone),
    ("requesteddatatypes", FieldKey::DataTypes),
    ("requestspermonth", FieldKey::EstimatedRequestsPerMonth),
    ("usageduration", FieldKey::Duration),
    ("officials", FieldKey::AuthorizedOfficials),
];

static DEFAULT_SIGN_OFFS: &[&str] = &[
    "regards",
    "best regards",
    "kind regards",
    "warm regards",
    "with regards",
    "thanks and regards",
    "thanks & regards",
    "sincerely",
    "yours sincerely",
    "yours faithfully",
    "yours truly",
    "thanks",
    "thank you",
    "many thanks",
];

static DEFAULT_DATA_TYPES: &[(&str, &str)] = &[
    ("volunteers", "volunteer_data"),
    ("volunteer", "volunteer_data"),
    ("ngos", "ngo_data"),
    ("ngo", "ngo_data"),
    ("campaigns", "campaign_data"),
    ("campaign", "campaign_data"),
    ("events", "event_data"),
    ("event", "event_data"),
    ("stories", "story_data"),
    ("story", "story_data"),
    ("communities", "community_data"),
    ("community", "community_data"),
    ("analytics", "analytics_data"),
];

impl Default for ParserConfig {
    fn default() -> Self {
        let field_aliases = FieldKey::ALL
            .iter()
            .map(|&key| (key.canonical_key().to_owned(), key))
            .chain(
                EXTRA_ALIASES
                    .iter()
                    .map(|&(alias, key)| (alias.to_owned(), key)),
            )
            .collect();

        let data_types = DEFAULT_DATA_TYPES
            .iter()
            .map(|&(token, tag)| (token.to_owned(), tag.to_owned()))
            .collect();

        ParserConfig {
            overwrite_policy: OverwritePolicy::default(),
            subject_keywords: Vec::new(),
            sign_offs: DEFAULT_SIGN_OFFS
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            field_aliases,
            data_types,
            usage: UsageDefaults::default(),
            fallback_official: FallbackOfficial::default(),
        }
    }
}

impl ParserConfig {
    /// Loads the configuration from the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let data = fs::read(path)?;
        Self::from_toml(&data)
    }

    pub fn from_toml(data: &[u8]) -> Result<Self, Error> {
        let mut config: ParserConfig = toml::from_slice(data)?;
        config.normalise_tables();
        Ok(config)
    }

    /// Renders the configuration in the format `load` accepts.
    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml::to_string(self)?)
    }

    /// Brings hand-written table keys into the form the parser looks them up
    /// in.
    pub fn normalise_tables(&mut self) {
        self.field_aliases = std::mem::take(&mut self.field_aliases)
            .into_iter()
            .map(|(alias, key)| (normalise_key(&alias), key))
            .filter(|(alias, _)| !alias.is_empty())
            .collect();
        self.data_types = std::mem::take(&mut self.data_types)
            .into_iter()
            .map(|(token, tag)| (token.trim().to_lowercase(), tag))
            .collect();
        for keyword in &mut self.subject_keywords {
            *keyword = keyword.trim().to_lowercase();
        }
        self.subject_keywords.retain(|k| !k.is_empty());
        for sign_off in &mut self.sign_offs {
            *sign_off = sign_off.trim().to_owned();
        }
        self.sign_offs.retain(|s| !s.is_empty());
    }

    /// Looks up an already-normalised key.
    pub fn field_key(&self, normalised: &str) -> Option<FieldKey> {
        self.field_aliases.get(normalised).copied()
    }
}
