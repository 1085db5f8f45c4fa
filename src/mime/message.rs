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

use std::borrow::Cow;
use std::str;

use lazy_static::lazy_static;
use regex::Regex;

use super::encoded_word::decode_unstructured;

lazy_static! {
    static ref END_OF_HEADERS: Regex = Regex::new("\r?\n\r?\n").unwrap();
    // RFC 5322 field-name: printable ASCII except colon
    static ref HEADER_LINE: Regex = Regex::new("^[!-9;-~]+:").unwrap();
}

/// An inbound message as handed over by the mail transport.
///
/// `body` is whatever text the transport extracted: plain text, an HTML
/// fragment, or a raw dump of one or more MIME parts including their headers
/// and boundaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawMessage {
    pub subject: String,
    pub body: String,
}

impl RawMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        RawMessage {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Splits a stored RFC 5322 message into its subject and body.
    ///
    /// Only the top-level header block is examined; the body is returned
    /// verbatim, MIME parts and all. Data which does not start with a header
    /// is taken to be a bare body with no subject.
    ///
    /// Non-UTF-8 input is read as Windows-1252.
    pub fn from_rfc822(data: &[u8]) -> Self {
        let text = match str::from_utf8(data) {
            Ok(s) => Cow::Borrowed(s),
            Err(_) => {
                encoding_rs::WINDOWS_1252
                    .decode_without_bom_handling(data)
                    .0
            }
        };

        if !HEADER_LINE.is_match(&text) {
            return RawMessage::new("", text.into_owned());
        }

        let (headers, body) = match END_OF_HEADERS.find(&text) {
            Some(m) => (&text[..m.start()], &text[m.end()..]),
            None => (&text[..], ""),
        };

        let fields = unfold(headers);
        if !fields.iter().any(|&(name, _)| is_message_header(name)) {
            // Something like "Organization: ..." on the first line of a bare
            // request
            return RawMessage::new("", text.to_string());
        }

        let subject = fields
            .into_iter()
            .find_map(|(name, value)| {
                if name.eq_ignore_ascii_case("Subject") {
                    Some(decode_unstructured(value.trim()).into_owned())
                } else {
                    None
                }
            })
            .unwrap_or_default();

        RawMessage::new(subject, body)
    }
}

fn is_message_header(name: &str) -> bool {
    [
        "from",
        "to",
        "cc",
        "subject",
        "date",
        "message-id",
        "received",
        "return-path",
        "reply-to",
        "mime-version",
        "delivered-to",
    ]
    .iter()
    .any(|h| h.eq_ignore_ascii_case(name))
}

/// Unfolds a header block into (name, value) pairs.
fn unfold(headers: &str) -> Vec<(&str, String)> {
    let mut fields: Vec<(&str, String)> = Vec::new();

    for line in headers.lines() {
        if line.starts_with(|c: char| c == ' ' || c == '\t') {
            if let Some((_, value)) = fields.last_mut() {
                value.push_str(line);
            }
            continue;
        }

        if let Some((name, value)) = line.split_once(':') {
            fields.push((name.trim(), value.to_owned()));
        }
    }

    fields
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn splits_headers_from_body() {
        let message = RawMessage::from_rfc822(
            b"From: Ministry <it@ministry.gov.in>\r\n\
              Subject: API Access\r\n \
              Request\r\n\
              Content-Type: text/plain\r\n\
              \r\n\
              Organization: Ministry\r\n\
              \r\n\
              Purpose: Research\r\n",
        );
        assert_eq!("API Access Request", message.subject);
        assert_eq!(
            "Organization: Ministry\r\n\r\nPurpose: Research\r\n",
            message.body
        );
    }

    #[test]
    fn encoded_subjects_are_decoded() {
        let message = RawMessage::from_rfc822(
            b"Subject: =?UTF-8?Q?Demande_d=E2=80=99acc=C3=A8s?=\n\nbody",
        );
        assert_eq!("Demande d\u{2019}accès", message.subject);
        assert_eq!("body", message.body);
    }

    #[test]
    fn bare_body_has_no_subject() {
        let message =
            RawMessage::from_rfc822(b"Please find our request below.");
        assert_eq!("", message.subject);
        assert_eq!("Please find our request below.", message.body);
    }

    #[test]
    fn bare_field_list_is_a_body() {
        let text = "Organization: Ministry\nEmail: a@b.gov.in\n\nThanks";
        let message = RawMessage::from_rfc822(text.as_bytes());
        assert_eq!("", message.subject);
        assert_eq!(text, message.body);
    }

    #[test]
    fn headers_only() {
        let message = RawMessage::from_rfc822(b"Subject: hello");
        assert_eq!("hello", message.subject);
        assert_eq!("", message.body);
    }

    #[test]
    fn latin1_input() {
        let message = RawMessage::from_rfc822(b"Subject: caf\xe9\n\nx");
        assert_eq!("caf\u{e9}", message.subject);
    }
}
