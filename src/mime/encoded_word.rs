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

use encoding_rs::Encoding;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ENCODED_WORD: Regex =
        Regex::new(r"^=\?([!->@-~]*)\?([!->@-~]*)\?([!->@-~]*)\?=$").unwrap();
    static ref TOKEN: Regex = Regex::new("[ \t]+|[^ \t]+").unwrap();
}

/// Decodes an unstructured header value such as `Subject`, replacing every
/// RFC 2047 encoded word with its decoded text.
///
/// Whitespace between two adjacent encoded words is deleted; all other
/// whitespace is preserved. Encoded words that cannot be decoded (unknown
/// charset, bad base64) are left as they are.
pub fn decode_unstructured(value: &str) -> Cow<str> {
    if !value.contains("=?") {
        return Cow::Borrowed(value);
    }

    let mut decoded = String::with_capacity(value.len());
    let mut pending_space = "";
    let mut last_was_encoded = false;

    for token in TOKEN.find_iter(value) {
        let token = token.as_str();
        if token.starts_with(|c: char| c == ' ' || c == '\t') {
            pending_space = token;
            continue;
        }

        match ew_decode(token) {
            Some(text) => {
                if !last_was_encoded {
                    decoded.push_str(pending_space);
                }
                decoded.push_str(&text);
                last_was_encoded = true;
            }
            None => {
                decoded.push_str(pending_space);
                decoded.push_str(token);
                last_was_encoded = false;
            }
        }
        pending_space = "";
    }
    decoded.push_str(pending_space);

    Cow::Owned(decoded)
}

/// Test if `word` (in its entirety) is an RFC 2047 "encoded word".
///
/// If it is, decode it and return its decoded value.
///
/// Returns `None` if it is not an encoded word or if it could not be decoded.
/// The distinction from returning the input unchanged matters to callers,
/// since whitespace between adjacent encoded words is not significant.
pub fn ew_decode(word: &str) -> Option<Cow<str>> {
    // Longer-than-75-character encoded words are accepted, as Thunderbird
    // does.
    let captures = ENCODED_WORD.captures(word)?;

    let charset = captures.get(1)?.as_str();
    let transfer_encoding = captures.get(2)?.as_str();
    let content = captures.get(3)?.as_str().as_bytes();

    let content = match transfer_encoding {
        "q" | "Q" => q_decode(content),
        "b" | "B" => base64::decode(content).ok()?,
        _ => return None,
    };

    // RFC 2231 allows a language suffix, as in `utf-8*en`
    let charset = charset.split('*').next().unwrap_or(charset);
    let (text, _) = Encoding::for_label_no_replacement(charset.as_bytes())?
        .decode_with_bom_removal(&content);
    Some(Cow::Owned(text.into_owned()))
}

/// The "Q" encoding of RFC 2047: quoted-printable where `_` stands for an
/// ASCII space regardless of charset.
fn q_decode(content: &[u8]) -> Vec<u8> {
    let mut decoded = Vec::with_capacity(content.len());
    let mut ix = 0;
    while ix < content.len() {
        match content[ix] {
            b'_' => decoded.push(b' '),
            b'=' if ix + 2 < content.len() => {
                let hex = std::str::from_utf8(&content[ix + 1..ix + 3])
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(b) => {
                        decoded.push(b);
                        ix += 2;
                    }
                    // Invalid encoding, pass through verbatim
                    None => decoded.push(b'='),
                }
            }
            b => decoded.push(b),
        }
        ix += 1;
    }
    decoded
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_ew_decode() {
        assert_eq!(None, ew_decode("hello world"));
        assert_eq!(None, ew_decode("=?x-no-such-charset?Q?abc?="));

        // Examples from RFC 2047
        assert_eq!(
            "Keith Moore",
            ew_decode("=?US-ASCII?Q?Keith_Moore?=").unwrap()
        );
        assert_eq!(
            "Keld Jørn Simonsen",
            ew_decode("=?ISO-8859-1?Q?Keld_J=F8rn_Simonsen?=").unwrap()
        );
        assert_eq!("André", ew_decode("=?ISO-8859-1?Q?Andr=E9?=").unwrap());
        assert_eq!(
            "If you can read this yo",
            ew_decode("=?ISO-8859-1?B?SWYgeW91IGNhbiByZWFkIHRoaXMgeW8=?=")
                .unwrap()
        );
        assert_eq!("a=", ew_decode("=?utf-8?Q?a=?=").unwrap());
        assert_eq!("Ré", ew_decode("=?utf-8*fr?Q?R=C3=A9?=").unwrap());
    }

    #[test]
    fn test_decode_unstructured() {
        assert_eq!(
            "API Access Request",
            decode_unstructured("API Access Request")
        );
        assert_eq!(
            "API Access Request: Ministère",
            decode_unstructured(
                "=?UTF-8?Q?API_Access_Request:?= =?UTF-8?Q?_Minist=C3=A8re?="
            )
        );
        assert_eq!(
            "Re: André  is here",
            decode_unstructured("Re: =?ISO-8859-1?Q?Andr=E9?=  is here")
        );
    }

    proptest! {
        #[test]
        fn ew_decode_never_panics(s in r"=\?.*\?.*\?.*\?=") {
            ew_decode(&s);
        }

        #[test]
        fn decode_unstructured_never_panics(s in r"[ a-zA-Z=?_]*") {
            decode_unstructured(&s);
        }
    }
}
