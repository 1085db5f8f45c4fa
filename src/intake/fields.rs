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

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::data_types::DataTypeMap;
use super::lines::FieldLine;
use super::model::{FieldKey, PartialDraft};
use super::officials::parse_officials;
use crate::support::intake_config::{OverwritePolicy, ParserConfig};
use crate::support::log_prefix::LogPrefix;

lazy_static! {
    static ref COUNT: Regex = Regex::new("[0-9][0-9,_]*").unwrap();
}

/// Accumulates the values of `lines` into a `PartialDraft`.
///
/// Empty values are skipped entirely, so `Phone:` with nothing after it does
/// not count as an occurrence of the field.
pub fn extract(
    lines: &[FieldLine],
    config: &ParserConfig,
    log_prefix: &LogPrefix,
) -> PartialDraft {
    let mut draft = PartialDraft::default();
    let policy = config.overwrite_policy;
    let data_types = DataTypeMap::new(&config.data_types);

    for line in lines {
        let value = line.value.trim();
        if value.is_empty() {
            continue;
        }

        match line.key {
            FieldKey::Organization => {
                assign(&mut draft.organization, value.to_owned(), policy)
            }
            FieldKey::ContactPerson => {
                assign(&mut draft.contact_person, value.to_owned(), policy)
            }
            FieldKey::Email => assign(
                &mut draft.email,
                value.to_owned(),
                OverwritePolicy::FirstWins,
            ),
            FieldKey::Phone => {
                assign(&mut draft.phone, value.to_owned(), policy)
            }
            FieldKey::Purpose => {
                assign(&mut draft.purpose, value.to_owned(), policy)
            }
            FieldKey::Justification => {
                assign(&mut draft.justification, value.to_owned(), policy)
            }
            FieldKey::DataTypes => {
                let tags = data_types.map_list(value);
                if tags.is_empty() {
                    debug!("{} No data types in {:?}", log_prefix, value);
                } else {
                    assign(&mut draft.data_types, tags, policy);
                }
            }
            FieldKey::EstimatedRequestsPerMonth => match parse_count(value) {
                Some(count) => {
                    assign(&mut draft.requests_per_month, count, policy)
                }
                None => debug!(
                    "{} Ignoring unusable request count {:?}",
                    log_prefix, value
                ),
            },
            FieldKey::Duration => {
                assign(&mut draft.duration, value.to_owned(), policy)
            }
            FieldKey::ApiIntegrationMethod => assign(
                &mut draft.api_integration_method,
                value.to_owned(),
                policy,
            ),
            FieldKey::DataProcessingLocation => assign(
                &mut draft.data_processing_location,
                value.to_owned(),
                policy,
            ),
            FieldKey::SecurityMeasures => {
                assign(&mut draft.security_measures, value.to_owned(), policy)
            }
            FieldKey::GovernmentLevel => {
                assign(&mut draft.government_level, value.to_owned(), policy)
            }
            FieldKey::Department => {
                assign(&mut draft.department, value.to_owned(), policy)
            }
            FieldKey::AuthorizedOfficials => {
                let officials =
                    parse_officials(value, &config.fallback_official.title);
                if officials.is_empty() {
                    debug!(
                        "{} No usable officials in {:?}",
                        log_prefix, value
                    );
                } else {
                    assign(&mut draft.authorized_officials, officials, policy);
                }
            }
        }
    }

    draft
}

fn assign<T>(slot: &mut Option<T>, value: T, policy: OverwritePolicy) {
    if slot.is_none() || OverwritePolicy::LastWins == policy {
        *slot = Some(value);
    }
}

/// Extracts the first number from text like "5,000 requests" or "approx.
/// 1200".
///
/// Returns `None` if there is no number or it does not fit in a `u32`.
pub fn parse_count(value: &str) -> Option<u32> {
    let digits = COUNT
        .find(value)?
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();
    digits.parse().ok()
}
