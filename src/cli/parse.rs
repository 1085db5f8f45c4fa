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

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use log::error;

use super::main::{init_logging, load_config, ParseSubcommand};
use crate::intake::{AccessRequestDraft, OverwritePolicy, Parser, RawMessage};
use crate::support::{error::Error, log_prefix::LogPrefix, sysexits::*};

pub(super) fn parse(cmd: ParseSubcommand) {
    init_logging(&cmd.log);

    let mut config = load_config(&cmd.config);
    if cmd.last_wins {
        config.overwrite_policy = OverwritePolicy::LastWins;
    }
    if !cmd.subject.is_empty() {
        config.subject_keywords = cmd.subject.clone();
        config.normalise_tables();
    }

    let parser = Parser::new(config);
    let stdout = io::stdout();
    let status = run_parse(
        &parser,
        cmd.inputs.iter().map(|p| p.as_path()),
        io::stdin().lock(),
        stdout.lock(),
        cmd.compact,
    );
    status.exit();
}

fn run_parse<'a>(
    parser: &Parser,
    inputs: impl Iterator<Item = &'a Path>,
    mut stdin: impl Read,
    mut out: impl Write,
    compact: bool,
) -> Sysexit {
    let mut status = EX_OK;

    for input in inputs {
        let mut log_prefix = LogPrefix::new();
        log_prefix.set_source(input.display().to_string());

        let message = match read_message(input, &mut stdin) {
            Ok(message) => message,
            Err(e) => {
                error!("{} Unable to read: {}", log_prefix, e);
                status = status.worst(EX_NOINPUT);
                continue;
            }
        };
        log_prefix.set_subject(&message.subject);

        match parser.parse_with_prefix(&message, &log_prefix) {
            Ok(draft) => {
                if let Err(e) = write_draft(&mut out, &draft, compact) {
                    error!("{} Unable to write draft: {}", log_prefix, e);
                    return status.worst(EX_IOERR);
                }
            }
            // The parser has already logged why
            Err(_) => status = status.worst(EX_DATAERR),
        }
    }

    status
}

fn read_message(
    input: &Path,
    stdin: &mut impl Read,
) -> Result<RawMessage, Error> {
    let mut data = Vec::new();
    if Path::new("-") == input {
        stdin.read_to_end(&mut data)?;
    } else {
        fs::File::open(input)?.read_to_end(&mut data)?;
    }
    Ok(RawMessage::from_rfc822(&data))
}

fn write_draft(
    out: &mut impl Write,
    draft: &AccessRequestDraft,
    compact: bool,
) -> Result<(), Error> {
    if compact {
        serde_json::to_writer(&mut *out, draft)?;
    } else {
        serde_json::to_writer_pretty(&mut *out, draft)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;
    use crate::test_data::*;

    fn drafts(out: &[u8]) -> Vec<serde_json::Value> {
        serde_json::Deserializer::from_slice(out)
            .into_iter::<serde_json::Value>()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn batch_continues_past_failures() {
        crate::init_test_log();

        let dir = tempfile::TempDir::new().unwrap();
        let plain = dir.path().join("plain.eml");
        let chatter = dir.path().join("chatter.eml");
        let missing = dir.path().join("missing.eml");
        fs::write(&plain, PLAIN_REQUEST).unwrap();
        fs::write(
            &chatter,
            "Subject: Hello\n\nJust checking in.\n\nRegards,\nBob\n",
        )
        .unwrap();

        let inputs: Vec<PathBuf> =
            vec![plain, chatter, missing, PathBuf::from("-")];
        let mut out = Vec::<u8>::new();
        let status = run_parse(
            &Parser::default(),
            inputs.iter().map(|p| p.as_path()),
            MULTIPART_ALTERNATIVE,
            &mut out,
            false,
        );

        assert_eq!(EX_NOINPUT, status);
        let drafts = drafts(&out);
        assert_eq!(2, drafts.len());
        assert_eq!(
            "Ministry of Rural Development",
            drafts[0]["organization"]
        );
        assert_eq!(
            "Ministry of Women and Child Development",
            drafts[1]["organization"]
        );
    }

    #[test]
    fn rejection_sets_data_error_status() {
        crate::init_test_log();

        let mut out = Vec::<u8>::new();
        let status = run_parse(
            &Parser::default(),
            vec![Path::new("-")].into_iter(),
            &b"Subject: Hi\n\nOrganization: Somewhere\n"[..],
            &mut out,
            true,
        );
        assert_eq!(EX_DATAERR, status);
        assert!(out.is_empty());
    }

    #[test]
    fn compact_output_is_one_line_per_draft() {
        crate::init_test_log();

        let mut out = Vec::<u8>::new();
        let status = run_parse(
            &Parser::default(),
            vec![Path::new("-")].into_iter(),
            HTML_QP_REQUEST,
            &mut out,
            true,
        );
        assert_eq!(EX_OK, status);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(1, text.lines().count());
        assert_eq!(
            "asha.rao@rural.gov.in",
            drafts(text.as_bytes())[0]["email"]
        );
    }
}
