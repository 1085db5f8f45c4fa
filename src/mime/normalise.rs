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

//! Reduction of a message body to plain text lines.
//!
//! Requests arrive as plain text, as quoted-printable text, as HTML, or as a
//! raw dump of several MIME parts one after the other. There is no attempt to
//! understand the MIME structure beyond splitting at boundary lines and
//! dropping part headers. Each part is then decoded on its own, and HTML parts
//! are rendered to text, so that the same request yields the same lines
//! whichever way it was sent.

use std::mem;

use lazy_static::lazy_static;
use log::warn;
use regex::{Captures, Regex};

use super::quoted_printable::{join_soft_line_breaks, qp_decode_text};

lazy_static! {
    static ref BOUNDARY_LINE: Regex =
        Regex::new(r"^--[0-9A-Za-z'()+_,./:=?-]+$").unwrap();
    static ref MIME_HEADER_LINE: Regex =
        Regex::new(r"(?i)^(content-[a-z-]*|mime-version)\s*:").unwrap();
    // Only common element names count, so that `<someone@example.com>` in a
    // plain text part does not make it HTML.
    static ref HTML_MARKUP: Regex = Regex::new(concat!(
        r"(?i)<\s*/?\s*",
        r"(html|head|body|p|div|br|span|font|table|tr|td|ul|ol|li|b|i|u|",
        r"strong|em|h[1-6])",
        r"(\s[^>]*)?/?\s*>",
    ))
    .unwrap();
    static ref INVISIBLE_ELEMENT: Regex = Regex::new(
        r"(?is)<\s*(style|script|head)\b[^>]*>.*?<\s*/\s*(style|script|head)\s*>"
    )
    .unwrap();
    static ref TAG: Regex =
        Regex::new(r"<\s*[/!]?\s*[A-Za-z][A-Za-z0-9:._-]*(\s[^>]*)?/?\s*>")
            .unwrap();
    static ref ENTITY: Regex =
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]+);").unwrap();
}

/// Width handed to the HTML renderer. Wide enough that it never wraps a
/// field line; a wrapped value would come back as a continuation anyway.
const RENDER_WIDTH: usize = 4096;

/// Normalises a raw message body into plain text.
///
/// The result has one logical text line per output line, with runs of
/// whitespace (including non-breaking spaces) collapsed to a single space,
/// no leading or trailing whitespace on any line, and no empty lines.
///
/// In HTML parts, line breaks in the source are ordinary whitespace; only
/// the element structure (paragraphs, `<br>`, and so on) produces lines.
///
/// This never fails. Anything that cannot be decoded is left as-is.
pub fn normalise(body: &str) -> String {
    let body = join_soft_line_breaks(body);
    let body = body.replace("\r\n", "\n").replace('\r', "\n");

    let mut normalised = String::with_capacity(body.len());
    for part in split_parts(&body) {
        let text = render_part(&part);
        for line in text.lines() {
            let mut words = line.split_whitespace();
            if let Some(first) = words.next() {
                if !normalised.is_empty() {
                    normalised.push('\n');
                }
                normalised.push_str(first);
                for word in words {
                    normalised.push(' ');
                    normalised.push_str(word);
                }
            }
        }
    }

    normalised
}

/// Splits the body at MIME boundary lines, dropping part headers including
/// their folded continuations.
fn split_parts(body: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::with_capacity(body.len());
    let mut in_part_header = false;

    for line in body.split('\n') {
        if in_part_header && line.starts_with(|c: char| c == ' ' || c == '\t')
        {
            continue;
        }

        in_part_header = false;
        if BOUNDARY_LINE.is_match(line.trim_end()) {
            parts.push(mem::take(&mut current));
            continue;
        }

        if MIME_HEADER_LINE.is_match(line) {
            in_part_header = true;
            continue;
        }

        current.push_str(line);
        current.push('\n');
    }
    parts.push(current);

    parts.retain(|part| !part.trim().is_empty());
    parts
}

fn render_part(part: &str) -> String {
    let text = qp_decode_text(part);
    if HTML_MARKUP.is_match(&text) {
        html_to_text(&text)
    } else {
        decode_entities(&text)
    }
}

fn html_to_text(html: &str) -> String {
    // Outlook puts conditional comments and stylesheets into <head>; none of
    // it is content
    let html = INVISIBLE_ELEMENT.replace_all(html, " ");
    let text = match html2text::from_read_with_decorator(
        html.as_bytes(),
        RENDER_WIDTH,
        html2text::render::TrivialDecorator::new(),
    ) {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to render HTML part, stripping tags instead: {}", e);
            let stripped = TAG.replace_all(&html, " ");
            decode_entities(&stripped)
        }
    };

    // Table borders
    text.chars()
        .map(|c| {
            if ('\u{2500}'..='\u{257f}').contains(&c) {
                ' '
            } else {
                c
            }
        })
        .collect()
}

fn decode_entities(body: &str) -> String {
    if !body.contains('&') {
        return body.to_owned();
    }

    ENTITY
        .replace_all(body, |cap: &Captures| {
            let entity = &cap[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "nbsp" => Some(' '),
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    _ => None,
                }
            };

            match decoded {
                Some(ch) => ch.to_string(),
                // Unknown entity, leave verbatim
                None => cap[0].to_owned(),
            }
        })
        .into_owned()
}
