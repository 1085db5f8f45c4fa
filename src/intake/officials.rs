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

//! Parsing of the free-text "Authorized Officials" field.
//!
//! Agencies write this however they like. Typical shapes are
//!
//! ```text
//! John Doe, Senior Official, john.doe@govmail.in; Jane Smith, jane@govmail.in
//! Dr. A. Rao (Director) <a.rao@nic.in> +91 11 2345 6789
//! ```
//!
//! Entries are separated by semicolons. Within an entry the email address and
//! phone number are recognised by shape wherever they occur; what is left is
//! read as a comma-separated name and title.

use lazy_static::lazy_static;
use log::debug;
use regex::{Match, Regex};

use super::model::Official;
use crate::support::intake_config::FallbackOfficial;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();
    static ref PHONE: Regex =
        Regex::new(r"\+?\(?[0-9][0-9 ().-]{5,}[0-9]").unwrap();
    static ref YEAR_RANGE: Regex =
        Regex::new(r"^\(?\s*[0-9]{4}\s*[-–]\s*[0-9]{4}\s*\)?$").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"\s*[,;@]+\s*").unwrap();
    static ref EMPTY_BRACKETS: Regex =
        Regex::new(r"\(\s*\)|<\s*>|\[\s*\]").unwrap();
}

/// Phone numbers are only recognised with at least this many digits, so that
/// things like "Grade 2" or "Room 101" in a title survive.
const MIN_PHONE_DIGITS: usize = 7;

/// Parses the value of an "Authorized Officials" field.
///
/// `default_title` is used for entries that name a person without giving a
/// title. Entries without both a name and an email address are dropped, so
/// the result may be empty.
pub fn parse_officials(value: &str, default_title: &str) -> Vec<Official> {
    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| parse_entry(entry, default_title))
        .filter(|official| {
            let usable =
                !official.name.is_empty() && !official.email.is_empty();
            if !usable {
                debug!(
                    "Dropping official without name or email: {:?}",
                    official
                );
            }
            usable
        })
        .collect()
}

fn parse_entry(entry: &str, default_title: &str) -> Option<Official> {
    let (email, rest) = take_first(&EMAIL, entry, |_, _| true);
    let (phone, rest) = take_first(&PHONE, &rest, plausible_phone);

    let rest = EMPTY_BRACKETS.replace_all(&rest, "");
    let rest = SEPARATORS.replace_all(&rest, ",");
    let rest = rest.trim_matches(|c: char| c == ',' || c.is_whitespace());

    let mut parts = rest.split(',').map(str::trim).filter(|p| !p.is_empty());
    let name = match parts.next() {
        Some(name) => name,
        None => {
            debug!("Dropping official entry with no name: {:?}", entry);
            return None;
        }
    };
    let title = parts.next().unwrap_or(default_title);

    Some(Official {
        name: name.to_owned(),
        title: title.to_owned(),
        email: email.unwrap_or_default(),
        phone: phone.unwrap_or_default(),
    })
}

/// Whether `m`, a match of `PHONE` within `s`, should be read as a phone
/// number rather than as part of the name or title.
///
/// The match must stand on its own (not glued to a word or a hyphenated
/// token), keep its brackets balanced, and not be a span of years such as
/// "(2019-2024)".
fn plausible_phone(s: &str, m: Match<'_>) -> bool {
    let phone = m.as_str();
    let detached = |c: Option<char>| {
        c.map_or(true, |c| !c.is_alphanumeric() && '-' != c)
    };

    detached(s[..m.start()].chars().next_back())
        && detached(s[m.end()..].chars().next())
        && phone.matches('(').count() == phone.matches(')').count()
        && !YEAR_RANGE.is_match(phone)
        && phone.chars().filter(char::is_ascii_digit).count()
            >= MIN_PHONE_DIGITS
}

/// Finds the first match of `rx` in `s` accepted by `accept`, returning the
/// match and `s` with the match cut out.
fn take_first(
    rx: &Regex,
    s: &str,
    accept: impl Fn(&str, Match<'_>) -> bool,
) -> (Option<String>, String) {
    match rx.find_iter(s).find(|&m| accept(s, m)) {
        Some(m) => (
            Some(m.as_str().trim().to_owned()),
            format!("{} {}", &s[..m.start()], &s[m.end()..]),
        ),
        None => (None, s.to_owned()),
    }
}

/// Builds the official used when a request names none that are usable.
pub fn default_official(
    contact_person: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
    fallback: &FallbackOfficial,
) -> Official {
    Official {
        name: contact_person.unwrap_or(&fallback.name).to_owned(),
        title: fallback.title.clone(),
        email: email.unwrap_or(&fallback.email).to_owned(),
        phone: phone.unwrap_or_default().to_owned(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn official(name: &str, title: &str, email: &str, phone: &str) -> Official {
        Official {
            name: name.to_owned(),
            title: title.to_owned(),
            email: email.to_owned(),
            phone: phone.to_owned(),
        }
    }

    #[test]
    fn names_titles_and_emails() {
        assert_eq!(
            vec![
                official(
                    "John Doe",
                    "Senior Official",
                    "john.doe@govmail.in",
                    ""
                ),
                official("Jane Smith", "Contact", "jane.smith@govmail.in", ""),
            ],
            parse_officials(
                "John Doe, Senior Official, john.doe@govmail.in; \
                 Jane Smith, jane.smith@govmail.in",
                "Contact"
            )
        );
    }

    #[test]
    fn email_and_phone_anywhere_in_entry() {
        assert_eq!(
            vec![official(
                "Dr. A. Rao",
                "Director",
                "a.rao@nic.in",
                "+91 11 2345 6789"
            )],
            parse_officials(
                "Dr. A. Rao, Director <a.rao@nic.in> +91 11 2345 6789",
                "Contact"
            )
        );
        assert_eq!(
            vec![official("R. Mehta", "Under Secretary", "rm@gov.in", "")],
            parse_officials("rm@gov.in, R. Mehta, Under Secretary", "Contact")
        );
        assert_eq!(
            vec![official("S. Iyer", "Officer Grade 2", "si@gov.in", "")],
            parse_officials("S. Iyer (si@gov.in), Officer Grade 2", "Contact")
        );
    }

    #[test]
    fn numbers_inside_titles_are_not_phones() {
        assert_eq!(
            vec![official(
                "R. Mehta",
                "Joint Secretary (2019-2024)",
                "rm@gov.in",
                ""
            )],
            parse_officials(
                "R. Mehta, Joint Secretary (2019-2024), rm@gov.in",
                "Contact"
            )
        );
        assert_eq!(
            vec![official(
                "K. Das",
                "Director 2019-2024",
                "kd@gov.in",
                ""
            )],
            parse_officials("K. Das, Director 2019-2024, kd@gov.in", "Contact")
        );
        assert_eq!(
            vec![official("P. Nair", "Officer ID-4455667", "pn@gov.in", "")],
            parse_officials("P. Nair, Officer ID-4455667, pn@gov.in", "Contact")
        );
        assert_eq!(
            vec![official(
                "P. Nair",
                "Officer",
                "pn@gov.in",
                "(011) 2345-6789"
            )],
            parse_officials(
                "P. Nair, Officer, pn@gov.in, (011) 2345-6789.",
                "Contact"
            )
        );
    }

    #[test]
    fn unusable_entries_are_dropped() {
        assert!(parse_officials("", "Contact").is_empty());
        assert!(parse_officials(" ; ;", "Contact").is_empty());
        // No email
        assert!(parse_officials("John Doe, Director", "Contact").is_empty());
        // No name
        assert!(parse_officials("john@gov.in", "Contact").is_empty());
        assert_eq!(
            vec![official("Jane", "Contact", "jane@gov.in", "")],
            parse_officials("To be confirmed; Jane, jane@gov.in", "Contact")
        );
    }

    #[test]
    fn default_official_prefers_request_values() {
        let fallback = FallbackOfficial::default();
        assert_eq!(
            official("Asha Rao", "Contact", "asha@gov.in", "011-555"),
            default_official(
                Some("Asha Rao"),
                Some("asha@gov.in"),
                Some("011-555"),
                &fallback
            )
        );
        assert_eq!(
            official("Contact Person", "Contact", "contact@unknown.com", ""),
            default_official(None, None, None, &fallback)
        );
    }
}
