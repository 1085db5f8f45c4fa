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

//! The access-request intake pipeline.
//!
//! An inbound message goes through these stages:
//!
//! - `mime::normalise` reduces the body to plain text lines.
//! - `lines` classifies the lines and reassembles wrapped field values.
//! - `fields` dispatches each field to its handler (`data_types`,
//!   `officials`, or plain assignment) to build a `PartialDraft`.
//! - `validate` applies defaults and decides whether the result is a usable
//!   `AccessRequestDraft`.
//!
//! Nothing here does I/O or keeps state between messages. A `Parser` can be
//! shared freely between threads.

pub mod data_types;
pub mod fields;
pub mod lines;
pub mod model;
pub mod officials;
pub mod validate;


use log::{info, warn};

pub use self::model::{AccessRequestDraft, DataTypeTag, Official};
pub use crate::mime::message::RawMessage;
pub use crate::support::error::Rejection;
pub use crate::support::intake_config::{OverwritePolicy, ParserConfig};

use crate::mime::normalise::normalise;
use crate::support::log_prefix::LogPrefix;

/// Parses inbound access-request messages according to a fixed
/// configuration.
#[derive(Clone, Debug, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Parser { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one message.
    ///
    /// A rejection is an ordinary outcome; it has already been logged when
    /// this returns.
    pub fn parse(
        &self,
        message: &RawMessage,
    ) -> Result<AccessRequestDraft, Rejection> {
        parse(message, &self.config)
    }

    /// Like `parse`, but logs with the given prefix, which lets the caller
    /// identify where the message came from.
    pub fn parse_with_prefix(
        &self,
        message: &RawMessage,
        log_prefix: &LogPrefix,
    ) -> Result<AccessRequestDraft, Rejection> {
        parse_with_prefix(message, &self.config, log_prefix)
    }

    /// Parses every message in `messages`, yielding one result per message.
    ///
    /// A rejected message never stops the batch.
    pub fn parse_batch<'a, I>(
        &'a self,
        messages: I,
    ) -> impl Iterator<Item = Result<AccessRequestDraft, Rejection>> + 'a
    where
        I: IntoIterator<Item = &'a RawMessage>,
        I::IntoIter: 'a,
    {
        messages.into_iter().map(move |message| self.parse(message))
    }
}

/// Parses one message with the given configuration.
pub fn parse(
    message: &RawMessage,
    config: &ParserConfig,
) -> Result<AccessRequestDraft, Rejection> {
    parse_with_prefix(
        message,
        config,
        &LogPrefix::for_subject(&message.subject),
    )
}

fn parse_with_prefix(
    message: &RawMessage,
    config: &ParserConfig,
    log_prefix: &LogPrefix,
) -> Result<AccessRequestDraft, Rejection> {
    let result = parse_inner(message, config, log_prefix);
    match result {
        Ok(ref draft) => info!(
            "{} Accepted request from {:?} ({} data types, {} officials)",
            log_prefix,
            draft.organization,
            draft.data_types.len(),
            draft.authorized_officials.len(),
        ),
        Err(ref rejection) => warn!("{} Rejected: {}", log_prefix, rejection),
    }
    result
}

fn parse_inner(
    message: &RawMessage,
    config: &ParserConfig,
    log_prefix: &LogPrefix,
) -> Result<AccessRequestDraft, Rejection> {
    if !subject_matches(&message.subject, &config.subject_keywords) {
        return Err(Rejection::NotAnAccessRequest);
    }

    let text = normalise(&message.body);
    let lines = lines::reconstruct(&text, config);
    let partial = fields::extract(&lines, config, log_prefix);
    validate::finalise(partial, config, log_prefix)
}

/// An empty keyword list matches every subject.
fn subject_matches(subject: &str, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return true;
    }

    let subject = subject.to_lowercase();
    keywords
        .iter()
        .any(|keyword| subject.contains(&keyword.to_lowercase()))
}
