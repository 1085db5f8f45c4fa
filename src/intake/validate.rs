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

use log::debug;

use super::model::*;
use super::officials::default_official;
use crate::support::error::{Rejection, RequiredField};
use crate::support::intake_config::ParserConfig;
use crate::support::log_prefix::LogPrefix;

/// Stand-in for technical details a request mentions only in part.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Applies defaults to `draft` and validates the result.
///
/// The stages run in a fixed order:
///
/// 1. Usage defaults are filled in, individually per sub-field.
/// 2. The request is rejected if `organization`, `email` or `purpose` is
///    missing.
/// 3. If no usable official was extracted, one is synthesised from the
///    contact person, email and phone.
/// 4. The request is rejected if `organization`, `contactPerson`, `purpose`,
///    `dataTypes` or `justification` is missing.
///
/// Every missing field of the failing stage is reported, not just the first.
pub fn finalise(
    draft: PartialDraft,
    config: &ParserConfig,
    log_prefix: &LogPrefix,
) -> Result<AccessRequestDraft, Rejection> {
    let estimated_usage = EstimatedUsage {
        requests_per_month: draft
            .requests_per_month
            .unwrap_or(config.usage.requests_per_month),
        duration: draft
            .duration
            .clone()
            .unwrap_or_else(|| config.usage.duration.clone()),
    };

    let missing = missing_fields(&[
        (RequiredField::Organization, draft.organization.is_some()),
        (RequiredField::Email, draft.email.is_some()),
        (RequiredField::Purpose, draft.purpose.is_some()),
    ]);
    if !missing.is_empty() {
        return Err(Rejection::MissingRequiredFields(missing));
    }

    let technical_details = if draft.has_technical_details() {
        Some(TechnicalDetails {
            api_integration_method: or_not_specified(
                draft.api_integration_method,
            ),
            data_processing_location: or_not_specified(
                draft.data_processing_location,
            ),
            security_measures: or_not_specified(draft.security_measures),
        })
    } else {
        None
    };

    let authorized_officials = match draft.authorized_officials {
        Some(officials) if !officials.is_empty() => officials,
        _ => {
            debug!("{} Using contact person as the official", log_prefix);
            vec![default_official(
                draft.contact_person.as_deref(),
                draft.email.as_deref(),
                draft.phone.as_deref(),
                &config.fallback_official,
            )]
        }
    };

    let data_types = draft.data_types.filter(|tags| !tags.is_empty());
    match (
        draft.organization,
        draft.contact_person,
        draft.email,
        draft.purpose,
        draft.justification,
        data_types,
    ) {
        (
            Some(organization),
            Some(contact_person),
            Some(email),
            Some(purpose),
            Some(justification),
            Some(data_types),
        ) => Ok(AccessRequestDraft {
            organization,
            contact_person,
            email,
            phone: draft.phone,
            purpose,
            justification,
            data_types,
            estimated_usage,
            technical_details,
            government_level: draft.government_level,
            department: draft.department,
            authorized_officials,
        }),

        (
            organization,
            contact_person,
            email,
            purpose,
            justification,
            data_types,
        ) => Err(Rejection::MissingRequiredFields(missing_fields(&[
            (RequiredField::Organization, organization.is_some()),
            (RequiredField::ContactPerson, contact_person.is_some()),
            // Already checked above, but keeps this list complete
            (RequiredField::Email, email.is_some()),
            (RequiredField::Purpose, purpose.is_some()),
            (RequiredField::DataTypes, data_types.is_some()),
            (RequiredField::Justification, justification.is_some()),
        ]))),
    }
}

fn missing_fields(fields: &[(RequiredField, bool)]) -> Vec<RequiredField> {
    fields
        .iter()
        .filter(|&&(_, present)| !present)
        .map(|&(field, _)| field)
        .collect()
}

fn or_not_specified(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_SPECIFIED.to_owned())
}

#[cfg(test)]
mod test {
    use super::*;

    fn complete() -> PartialDraft {
        PartialDraft {
            organization: Some("Ministry".to_owned()),
            contact_person: Some("Asha Rao".to_owned()),
            email: Some("asha@gov.in".to_owned()),
            phone: Some("011-2345".to_owned()),
            purpose: Some("Research".to_owned()),
            justification: Some("Planning".to_owned()),
            data_types: Some(vec![DataTypeTag::Canonical(
                "ngo_data".to_owned(),
            )]),
            ..PartialDraft::default()
        }
    }

    fn run(draft: PartialDraft) -> Result<AccessRequestDraft, Rejection> {
        finalise(draft, &ParserConfig::default(), &LogPrefix::new())
    }

    #[test]
    fn complete_request_is_accepted_with_defaults() {
        let accepted = run(complete()).unwrap();
        assert_eq!(
            EstimatedUsage {
                requests_per_month: 1000,
                duration: "1 year".to_owned(),
            },
            accepted.estimated_usage
        );
        assert_eq!(None, accepted.technical_details);
        assert_eq!(
            vec![Official {
                name: "Asha Rao".to_owned(),
                title: "Contact".to_owned(),
                email: "asha@gov.in".to_owned(),
                phone: "011-2345".to_owned(),
            }],
            accepted.authorized_officials
        );
    }

    #[test]
    fn usage_sub_fields_default_individually() {
        let accepted = run(PartialDraft {
            requests_per_month: Some(40),
            ..complete()
        })
        .unwrap();
        assert_eq!(40, accepted.estimated_usage.requests_per_month);
        assert_eq!("1 year", accepted.estimated_usage.duration);

        let accepted = run(PartialDraft {
            duration: Some("3 months".to_owned()),
            ..complete()
        })
        .unwrap();
        assert_eq!(1000, accepted.estimated_usage.requests_per_month);
        assert_eq!("3 months", accepted.estimated_usage.duration);
    }

    #[test]
    fn partial_technical_details_are_completed() {
        let accepted = run(PartialDraft {
            api_integration_method: Some("REST".to_owned()),
            ..complete()
        })
        .unwrap();
        assert_eq!(
            Some(TechnicalDetails {
                api_integration_method: "REST".to_owned(),
                data_processing_location: NOT_SPECIFIED.to_owned(),
                security_measures: NOT_SPECIFIED.to_owned(),
            }),
            accepted.technical_details
        );
    }

    #[test]
    fn first_gate_reports_all_of_its_fields() {
        assert_eq!(
            Err(Rejection::MissingRequiredFields(vec![
                RequiredField::Email,
                RequiredField::Purpose,
            ])),
            run(PartialDraft {
                email: None,
                purpose: None,
                justification: None,
                ..complete()
            })
        );
    }

    #[test]
    fn second_gate() {
        assert_eq!(
            Err(Rejection::MissingRequiredFields(vec![
                RequiredField::ContactPerson,
                RequiredField::DataTypes,
                RequiredField::Justification,
            ])),
            run(PartialDraft {
                contact_person: None,
                data_types: Some(vec![]),
                justification: None,
                ..complete()
            })
        );
    }

    #[test]
    fn extracted_officials_are_kept() {
        let jane = Official {
            name: "Jane".to_owned(),
            title: "Director".to_owned(),
            email: "jane@gov.in".to_owned(),
            phone: String::new(),
        };
        let accepted = run(PartialDraft {
            authorized_officials: Some(vec![jane.clone()]),
            ..complete()
        })
        .unwrap();
        assert_eq!(vec![jane], accepted.authorized_officials);
    }
}
