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

#![allow(dead_code)]

#[cfg(test)]
macro_rules! assert_matches {
    ($expected:pat, $actual:expr) => {
        match $actual {
            $expected => (),
            unexpected => panic!(
                "Expected {} matches {}, got {:?}",
                stringify!($expected),
                stringify!($actual),
                unexpected
            ),
        }
    };
}

/// Prints the message to standard error and exits with the given `Sysexit`.
macro_rules! die {
    ($exit:expr, $($fmt:tt)*) => {{
        eprintln!($($fmt)*);
        $exit.exit()
    }};
}

mod cli;
mod intake;
mod mime;
mod support;

#[cfg(test)]
mod test_data;

use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

fn main() {
    cli::main::main();
}

const LOG_PATTERN: &str = "{d(%H:%M:%S%.3f)} [{l}][{t}] {m}{n}";

fn stderr_log_config(level: log::LevelFilter) -> Config {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    match Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
    {
        Ok(config) => config,
        Err(e) => die!(
            support::sysexits::EX_SOFTWARE,
            "Bad built-in logging configuration: {}",
            e
        ),
    }
}

/// Sends log output at `level` and above to standard error.
fn init_simple_log(level: log::LevelFilter) {
    if let Err(e) = log4rs::init_config(stderr_log_config(level)) {
        die!(
            support::sysexits::EX_SOFTWARE,
            "Failed to initialise logging: {}",
            e
        );
    }
}

#[cfg(test)]
static INIT_TEST_LOG: std::sync::Once = std::sync::Once::new();

#[cfg(test)]
fn init_test_log() {
    INIT_TEST_LOG.call_once(|| {
        log4rs::init_config(stderr_log_config(log::LevelFilter::Debug))
            .unwrap();
    })
}
