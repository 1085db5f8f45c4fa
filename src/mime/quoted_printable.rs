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

lazy_static! {
    static ref SOFT_LINE_BREAK: Regex = Regex::new("=\r?\n").unwrap();
    static ref ENCODED_NBSP: Regex = Regex::new("(?i)=C2=A0").unwrap();
}

/// Joins lines folded by quoted-printable soft line breaks (an `=` at the very
/// end of a line). UNIX line endings are handled as well as DOS line endings.
pub fn join_soft_line_breaks(s: &str) -> Cow<str> {
    SOFT_LINE_BREAK.replace_all(s, "")
}

/// Decodes the quoted-printable escapes in text which has already been
/// extracted from a message body, as described by RFC 2045.
///
/// An encoded non-breaking space (`=C2=A0`) becomes a plain space; every other
/// `=XX` escape becomes the byte it denotes, so `=3D` is `=`. Runs of decoded
/// bytes are interpreted as UTF-8 where they are valid UTF-8 and as
/// Windows-1252 elsewhere, since that is what agents which do not declare a
/// charset usually mean.
///
/// This never fails. Invalid sequences, including a dangling `=` at the end of
/// the input, are passed through untransformed. Soft line breaks are
/// discarded.
pub fn qp_decode_text(s: &str) -> Cow<str> {
    if !s.contains('=') {
        return Cow::Borrowed(s);
    }

    let s = ENCODED_NBSP.replace_all(s, " ");
    let mut transformed = String::with_capacity(s.len());
    let mut pending = Vec::<u8>::new();

    let mut split = s.split('=');
    if let Some(prefix) = split.next() {
        transformed.push_str(prefix);
    }

    for element in split {
        if let Some(tail) = element
            .strip_prefix("\r\n")
            .or_else(|| element.strip_prefix('\n'))
        {
            // Soft line break, discard
            if !tail.is_empty() {
                flush(&mut pending, &mut transformed);
                transformed.push_str(tail);
            }
            continue;
        }

        let bytes = element.as_bytes();
        if bytes.len() >= 2
            && bytes[0].is_ascii_hexdigit()
            && bytes[1].is_ascii_hexdigit()
        {
            // Both bytes are ASCII, so 2 is a char boundary
            if let Ok(ch) = u8::from_str_radix(&element[..2], 16) {
                pending.push(ch);
                let tail = &element[2..];
                if !tail.is_empty() {
                    flush(&mut pending, &mut transformed);
                    transformed.push_str(tail);
                }
                continue;
            }
        }

        // Invalid encoding, just push the whole string verbatim
        flush(&mut pending, &mut transformed);
        transformed.push('=');
        transformed.push_str(element);
    }

    flush(&mut pending, &mut transformed);
    Cow::Owned(transformed)
}

fn flush(pending: &mut Vec<u8>, dst: &mut String) {
    let mut rest = &pending[..];
    while !rest.is_empty() {
        match str::from_utf8(rest) {
            Ok(valid) => {
                dst.push_str(valid);
                break;
            }
            Err(e) => {
                let valid_len = e.valid_up_to();
                // valid_up_to() guarantees this prefix is UTF-8
                dst.push_str(&String::from_utf8_lossy(&rest[..valid_len]));
                let bad_len =
                    e.error_len().unwrap_or(rest.len() - valid_len);
                let (decoded, _) = encoding_rs::WINDOWS_1252
                    .decode_without_bom_handling(
                        &rest[valid_len..valid_len + bad_len],
                    );
                dst.push_str(&decoded);
                rest = &rest[valid_len + bad_len..];
            }
        }
    }
    pending.clear();
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn assert_qp(expected: &str, input: &str) {
        assert_eq!(expected, qp_decode_text(input));
    }

    #[test]
    fn test_qp_decode_text() {
        assert_qp("hello world", "hello world");
        assert_qp("a=b", "a=3Db");
        assert_qp("a b", "a=C2=A0b");
        assert_qp("a b", "a=c2=a0b");
        assert_qp("caf\u{e9}", "caf=C3=A9");
        assert_qp("caf\u{e9}s", "caf=C3=A9s");
        assert_qp("caf\u{e9}", "caf=E9");
        assert_qp("\u{e9}t\u{e9}", "=E9t=E9");

        assert_qp("foo", "foo=\n");
        assert_qp("foobar", "foo=\nbar");
        assert_qp("foobar", "foo=\r\nbar");

        assert_qp("foo=()bar", "foo=()bar");
        assert_qp("foo==bar", "foo==3Dbar");
        assert_qp("foo=A=bar", "foo=A=3Dbar");
        assert_qp("foo=ゑbar", "foo=ゑbar");
        assert_qp("foo=", "foo=");
        assert_qp("foo=A", "foo=A");
        assert_qp("=3D", "=3D3D");
    }

    #[test]
    fn test_join_soft_line_breaks() {
        assert_eq!(
            "Organization: Ministry",
            join_soft_line_breaks("Organiza=\ntion: Minis=\r\ntry")
        );
        assert_eq!("a = b\n", join_soft_line_breaks("a = b\n"));
    }

    proptest! {
        #[test]
        fn qp_decode_text_never_fails(s in ".*") {
            qp_decode_text(&s);
        }

        #[test]
        fn qp_decode_text_is_identity_without_escapes(s in "[^=]*") {
            let decoded = qp_decode_text(&s);
            prop_assert_eq!(s.as_str(), &*decoded);
        }
    }
}
