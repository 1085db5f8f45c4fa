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

//! Exit codes from `sysexits.h`, following the conventions mail tooling
//! (sendmail, procmail, fetchmail hooks) expects of a filter program.

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Sysexit(pub i32);

pub const EX_OK: Sysexit = Sysexit(0);
/// Bad command line.
pub const EX_USAGE: Sysexit = Sysexit(64);
/// At least one message was rejected.
pub const EX_DATAERR: Sysexit = Sysexit(65);
/// An input file could not be read.
pub const EX_NOINPUT: Sysexit = Sysexit(66);
pub const EX_SOFTWARE: Sysexit = Sysexit(70);
/// Output could not be written.
pub const EX_IOERR: Sysexit = Sysexit(74);
pub const EX_CONFIG: Sysexit = Sysexit(78);

impl Sysexit {
    pub fn exit(self) -> ! {
        std::process::exit(self.0)
    }

    /// Combines the outcome of two independent steps, keeping the more
    /// severe (numerically greater) code.
    pub fn worst(self, other: Sysexit) -> Sysexit {
        self.max(other)
    }
}
