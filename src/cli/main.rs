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

use std::path::PathBuf;

use structopt::StructOpt;

use crate::support::error::Error;
use crate::support::intake_config::ParserConfig;
use crate::support::sysexits::*;

#[derive(StructOpt)]
#[structopt(max_term_width = 80)]
enum Command {
    Parse(ParseSubcommand),
    /// Print the effective parser configuration.
    ///
    /// The output is a complete configuration file in the format accepted by
    /// --config, which makes it a convenient starting point for customising
    /// the alias and data-type tables.
    ShowConfig(ConfigOptions),
}

#[derive(StructOpt)]
pub(super) struct ConfigOptions {
    /// The parser configuration file [default: built-in tables]
    #[structopt(long, parse(from_os_str))]
    pub(super) config: Option<PathBuf>,
}

#[derive(StructOpt)]
pub(super) struct LogOptions {
    /// Configure logging from this log4rs file instead of writing warnings
    /// to standard error.
    #[structopt(long, parse(from_os_str))]
    pub(super) log_config: Option<PathBuf>,

    /// Log more to standard error. Pass twice to include debug output.
    #[structopt(short, long, parse(from_occurrences))]
    pub(super) verbose: u8,
}

/// Parse access-request emails into JSON drafts.
///
/// Each input is a single stored message, such as a `.eml` file. Only the
/// top-level headers are interpreted; the body is handled as one text
/// payload, whether it is plain text, HTML, quoted-printable, or the raw
/// parts of a multipart message.
///
/// For every accepted message, the draft is written to standard output as a
/// JSON document. Rejected messages are logged and skipped. Processing always
/// continues with the next input.
///
/// The exit status is 0 if every message was accepted, 65 (EX_DATAERR) if any
/// was rejected, and 66 (EX_NOINPUT) if any input could not be read.
#[derive(StructOpt)]
pub(super) struct ParseSubcommand {
    #[structopt(flatten)]
    pub(super) config: ConfigOptions,

    #[structopt(flatten)]
    pub(super) log: LogOptions,

    /// Let later occurrences of a repeated field replace earlier ones. The
    /// email address always comes from its first occurrence.
    #[structopt(long)]
    pub(super) last_wins: bool,

    /// Reject messages whose subject does not contain this text. Can be
    /// passed multiple times; replaces any keywords from the configuration.
    #[structopt(long, number_of_values(1))]
    pub(super) subject: Vec<String>,

    /// Write each draft on a single line instead of pretty-printing it.
    #[structopt(long)]
    pub(super) compact: bool,

    /// The messages to parse. "-" will read from stdin.
    #[structopt(parse(from_os_str), default_value = "-")]
    pub(super) inputs: Vec<PathBuf>,
}

pub fn main() {
    // Clap exits with status 1 instead of EX_USAGE if we use the more concise
    // API
    let cmd = Command::from_clap(&match Command::clap().get_matches_safe() {
        Ok(matches) => matches,
        Err(
            e @ clap::Error {
                kind: clap::ErrorKind::HelpDisplayed,
                ..
            },
        )
        | Err(
            e @ clap::Error {
                kind: clap::ErrorKind::VersionDisplayed,
                ..
            },
        ) => {
            println!("{}", e.message);
            return;
        }
        Err(e) => {
            eprintln!("{}", e.message);
            EX_USAGE.exit()
        }
    });

    match cmd {
        Command::Parse(cmd) => super::parse::parse(cmd),
        Command::ShowConfig(options) => show_config(options),
    }
}

fn show_config(options: ConfigOptions) {
    match load_config(&options).to_toml() {
        Ok(toml) => print!("{}", toml),
        Err(e) => die!(EX_SOFTWARE, "{}", e),
    }
}

pub(super) fn load_config(options: &ConfigOptions) -> ParserConfig {
    let path = match options.config {
        Some(ref path) => path,
        None => return ParserConfig::default(),
    };

    match ParserConfig::load(path) {
        Ok(config) => config,
        Err(Error::Io(e)) => {
            die!(EX_CONFIG, "Error reading '{}': {}", path.display(), e)
        }
        Err(e) => die!(
            EX_CONFIG,
            "Error in config file at '{}': {}",
            path.display(),
            e
        ),
    }
}

pub(super) fn init_logging(options: &LogOptions) {
    if let Some(ref path) = options.log_config {
        if let Err(e) =
            log4rs::init_file(path, log4rs::file::Deserializers::new())
        {
            die!(
                EX_CONFIG,
                "Error in logging config at '{}': {}",
                path.display(),
                e
            );
        }
        return;
    }

    crate::init_simple_log(match options.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    });
}
