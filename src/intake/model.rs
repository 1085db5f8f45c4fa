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

use serde::{Deserialize, Serialize};

/// The fields the intake pipeline knows how to extract.
///
/// Free-text keys are normalised (lower-cased, non-letters removed) and then
/// looked up in the configured alias table to find one of these.
#[derive(
    Deserialize,
    Serialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKey {
    Organization,
    ContactPerson,
    Email,
    Phone,
    Purpose,
    DataTypes,
    Justification,
    EstimatedRequestsPerMonth,
    Duration,
    ApiIntegrationMethod,
    DataProcessingLocation,
    SecurityMeasures,
    GovernmentLevel,
    Department,
    AuthorizedOfficials,
}

impl FieldKey {
    pub const ALL: &'static [FieldKey] = &[
        FieldKey::Organization,
        FieldKey::ContactPerson,
        FieldKey::Email,
        FieldKey::Phone,
        FieldKey::Purpose,
        FieldKey::DataTypes,
        FieldKey::Justification,
        FieldKey::EstimatedRequestsPerMonth,
        FieldKey::Duration,
        FieldKey::ApiIntegrationMethod,
        FieldKey::DataProcessingLocation,
        FieldKey::SecurityMeasures,
        FieldKey::GovernmentLevel,
        FieldKey::Department,
        FieldKey::AuthorizedOfficials,
    ];

    /// The normalised spelling of this key as it appears in a request
    /// ("Contact Person:" normalises to `contactperson`).
    pub fn canonical_key(self) -> &'static str {
        match self {
            FieldKey::Organization => "organization",
            FieldKey::ContactPerson => "contactperson",
            FieldKey::Email => "email",
            FieldKey::Phone => "phone",
            FieldKey::Purpose => "purpose",
            FieldKey::DataTypes => "datatypes",
            FieldKey::Justification => "justification",
            FieldKey::EstimatedRequestsPerMonth => "estimatedrequestspermonth",
            FieldKey::Duration => "duration",
            FieldKey::ApiIntegrationMethod => "apiintegrationmethod",
            FieldKey::DataProcessingLocation => "dataprocessinglocation",
            FieldKey::SecurityMeasures => "securitymeasures",
            FieldKey::GovernmentLevel => "governmentlevel",
            FieldKey::Department => "department",
            FieldKey::AuthorizedOfficials => "authorizedofficials",
        }
    }
}

/// A data category requested by the agency.
///
/// Canonical tags come from the configured taxonomy and are what the API-key
/// issuer knows how to turn into permission scopes. Fallback tags are
/// synthesised from tokens the taxonomy does not know; they are kept so a
/// human reviewer can see what was asked for.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum DataTypeTag {
    Canonical(String),
    Fallback(String),
}

impl DataTypeTag {
    pub fn as_str(&self) -> &str {
        match *self {
            DataTypeTag::Canonical(ref s) | DataTypeTag::Fallback(ref s) => s,
        }
    }

    pub fn is_canonical(&self) -> bool {
        matches!(*self, DataTypeTag::Canonical(_))
    }
}

impl fmt::Display for DataTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact the requesting organisation designates as entitled to use the
/// issued API key.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Official {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedUsage {
    pub requests_per_month: u32,
    pub duration: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalDetails {
    pub api_integration_method: String,
    pub data_processing_location: String,
    pub security_measures: String,
}

/// The structured, not-yet-persisted result of parsing one access-request
/// email.
///
/// A value of this type is always complete: every required field is
/// non-empty, `data_types` and `authorized_officials` are non-empty. Messages
/// that cannot be brought into this shape are rejected instead.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequestDraft {
    pub organization: String,
    pub contact_person: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub purpose: String,
    pub justification: String,
    pub data_types: Vec<DataTypeTag>,
    pub estimated_usage: EstimatedUsage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_details: Option<TechnicalDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub government_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub authorized_officials: Vec<Official>,
}

/// Everything extracted from a message before defaults are applied and the
/// result is validated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialDraft {
    pub organization: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub purpose: Option<String>,
    pub justification: Option<String>,
    pub data_types: Option<Vec<DataTypeTag>>,
    pub requests_per_month: Option<u32>,
    pub duration: Option<String>,
    pub api_integration_method: Option<String>,
    pub data_processing_location: Option<String>,
    pub security_measures: Option<String>,
    pub government_level: Option<String>,
    pub department: Option<String>,
    pub authorized_officials: Option<Vec<Official>>,
}

impl PartialDraft {
    pub fn has_technical_details(&self) -> bool {
        self.api_integration_method.is_some()
            || self.data_processing_location.is_some()
            || self.security_measures.is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn data_type_tags_serialise_as_plain_strings() {
        let tags = vec![
            DataTypeTag::Canonical("ngo_data".to_owned()),
            DataTypeTag::Fallback("foo_bar_data".to_owned()),
        ];
        assert_eq!(
            r#"["ngo_data","foo_bar_data"]"#,
            serde_json::to_string(&tags).unwrap()
        );
    }

    #[test]
    fn canonical_keys_are_already_normalised() {
        for &key in FieldKey::ALL {
            assert!(key
                .canonical_key()
                .chars()
                .all(|c| c.is_ascii_lowercase()));
        }
    }
}
