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

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::model::DataTypeTag;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Maps free-text data category names onto the canonical taxonomy.
#[derive(Clone, Copy, Debug)]
pub struct DataTypeMap<'a> {
    table: &'a BTreeMap<String, String>,
}

impl<'a> DataTypeMap<'a> {
    /// `table` maps lower-cased tokens to canonical tags.
    pub fn new(table: &'a BTreeMap<String, String>) -> Self {
        DataTypeMap { table }
    }

    /// Maps a single token, which must already be trimmed and lower-cased.
    ///
    /// Tokens the table does not know become `<token>_data`, with runs of
    /// whitespace replaced by `_`.
    pub fn map(&self, token: &str) -> DataTypeTag {
        match self.table.get(token) {
            Some(tag) => DataTypeTag::Canonical(tag.clone()),
            None => {
                let tag =
                    format!("{}_data", WHITESPACE.replace_all(token, "_"));
                debug!("Unknown data type {:?}, using {:?}", token, tag);
                DataTypeTag::Fallback(tag)
            }
        }
    }

    /// Maps the value of a `Data Types` field.
    ///
    /// The value is split on commas and empty items are dropped. Every other
    /// item yields a tag in order, repeats included. Trailing sentence
    /// punctuation on an item is ignored.
    pub fn map_list(&self, value: &str) -> Vec<DataTypeTag> {
        let mut tags: Vec<DataTypeTag> = Vec::new();
        for token in value.split(',') {
            let token = token
                .trim()
                .trim_end_matches(|c: char| c == '.' || c == ';')
                .trim()
                .to_lowercase();
            if token.is_empty() {
                continue;
            }

            tags.push(self.map(&token));
        }
        tags
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::support::intake_config::ParserConfig;

    fn tags(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|&t| t.to_owned()).collect()
    }

    fn strs(tags: Vec<DataTypeTag>) -> Vec<String> {
        tags.into_iter().map(|t| t.as_str().to_owned()).collect()
    }

    #[test]
    fn known_and_unknown_tokens() {
        let config = ParserConfig::default();
        let map = DataTypeMap::new(&config.data_types);

        assert_eq!(
            DataTypeTag::Canonical("ngo_data".to_owned()),
            map.map("ngos")
        );
        assert_eq!(
            DataTypeTag::Canonical("volunteer_data".to_owned()),
            map.map("volunteers")
        );
        assert_eq!(
            DataTypeTag::Fallback("foo_bar_data".to_owned()),
            map.map("foo bar")
        );
    }

    #[test]
    fn lists() {
        let config = ParserConfig::default();
        let map = DataTypeMap::new(&config.data_types);

        assert_eq!(
            tags(&["ngo_data", "community_data", "analytics_data"]),
            strs(map.map_list("NGOs, Communities, Analytics"))
        );
        assert_eq!(
            tags(&[
                "event_data",
                "campaign_data",
                "event_data",
                "water_quality_data"
            ]),
            strs(map.map_list(" Events,,campaigns , Events, Water  Quality. "))
        );
        assert_eq!(
            tags(&["ngo_data", "ngo_data"]),
            strs(map.map_list("NGOs, ngos"))
        );
        assert!(map.map_list(" , ").is_empty());
    }

    #[test]
    fn table_is_configurable() {
        let mut table = BTreeMap::new();
        table.insert("people".to_owned(), "volunteer_data".to_owned());
        let map = DataTypeMap::new(&table);

        assert!(map.map("people").is_canonical());
        assert!(!map.map("ngos").is_canonical());
    }
}
