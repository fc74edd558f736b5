// src/cli/output.rs

use std::io::{self, Write};

use crate::core::error::DispatchError;

/// Writes an action payload verbatim to the operator stream, ensuring the
/// output ends with a newline. Empty payloads produce no output at all.
pub fn render<W: Write>(out: &mut W, payload: &[u8]) -> io::Result<()> {
    if payload.is_empty() {
        return Ok(());
    }
    out.write_all(payload)?;
    if !payload.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// Writes a dispatch error as human-readable text to the operator stream.
/// Failure is signalled by the caller (non-zero exit in one-shot mode,
/// continue-the-loop in interactive mode); nothing here ever panics.
pub fn report<W: Write>(out: &mut W, err: &DispatchError) -> io::Result<()> {
    writeln!(out, "{err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_appends_missing_newline() {
        let mut out = Vec::new();
        render(&mut out, b"node-1").unwrap();
        assert_eq!(out, b"node-1\n");
    }

    #[test]
    fn test_render_keeps_existing_newline() {
        let mut out = Vec::new();
        render(&mut out, b"node-1\n").unwrap();
        assert_eq!(out, b"node-1\n");
    }

    #[test]
    fn test_render_empty_payload_writes_nothing() {
        let mut out = Vec::new();
        render(&mut out, b"").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_report_is_human_readable() {
        let mut out = Vec::new();
        report(&mut out, &DispatchError::UnknownCommand("frobnicate".into())).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "unknown command 'frobnicate'\n"
        );
    }
}
