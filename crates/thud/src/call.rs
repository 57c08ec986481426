// SPDX-FileCopyrightText: 2026 Thud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `thud invoke` and `thud publish` command implementations.

use std::io::Write;

use thud_core::ThudError;
use thud_registry::Host;

use crate::output_error;

/// Output buffer size used when `--capacity` is not given.
pub const DEFAULT_CAPACITY: usize = 256;

/// Run `thud invoke`: print what the component wrote.
///
/// When the component needed more room than `capacity`, a note goes to
/// stderr with the full size it reported.
pub fn run_invoke(
    host: &Host,
    component: &str,
    format: &str,
    slot: u8,
    capacity: usize,
    out: &mut impl Write,
) -> Result<(), ThudError> {
    let mut buf = vec![0u8; capacity];
    let size = host.invoke(component, slot, format, &mut buf)?;
    let written = size.min(capacity);

    out.write_all(&buf[..written]).map_err(output_error)?;
    writeln!(out).map_err(output_error)?;
    if size > capacity {
        eprintln!("thud: output truncated ({written} of {size} bytes)");
    }
    Ok(())
}

/// Run `thud publish`: deliver `data` (or an empty payload) to every handler.
pub fn run_publish(
    host: &Host,
    event: &str,
    data: Option<String>,
    out: &mut impl Write,
) -> Result<(), ThudError> {
    let delivered = match &data {
        Some(text) => host.publish(event, text)?,
        None => host.publish(event, &())?,
    };
    writeln!(out, "{event}: delivered to {delivered} handler(s)").map_err(output_error)?;
    Ok(())
}
