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

/// A plain-text request with wrapped field values and a signature.
pub static PLAIN_REQUEST: &[u8] = include_bytes!("plain-request.eml");

/// The same request as `PLAIN_REQUEST`, sent as a quoted-printable HTML part
/// the way a webmail client would format it.
pub static HTML_QP_REQUEST: &[u8] = include_bytes!("html-qp-request.eml");

/// A `multipart/alternative` request whose body still holds both parts. The
/// HTML part differs slightly from the plain one.
pub static MULTIPART_ALTERNATIVE: &[u8] =
    include_bytes!("multipart-alternative.eml");

/// The same request as `PLAIN_REQUEST`, as Outlook sends it: Word-generated
/// HTML with Office namespace elements such as `<o:p>`, and field labels
/// wrapped across source lines.
pub static OUTLOOK_REQUEST: &[u8] = include_bytes!("outlook-request.eml");
