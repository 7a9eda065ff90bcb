//! Text capture format read by the `mbimframe` binary.
//!
//! One transfer per line:
//!
//! ```text
//! # comment
//! ctrl h2d 01000000 10000000 01000000 00100000
//! bulk d2h 4e434d48...
//! ```
//!
//! The first field is the pipe (`ctrl` or `bulk`), the second the direction
//! (`h2d` or `d2h`); the rest of the line is hex, with whitespace ignored.

use thiserror::Error;

use crate::transfer::{Direction, RawTransfer, TransferId, TransferKind};

/// Errors raised while parsing a capture.
#[derive(Debug, Error, PartialEq)]
pub enum CaptureError {
    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: unknown pipe {found:?}, expected ctrl or bulk")]
    UnknownKind { line: usize, found: String },

    #[error("line {line}: unknown direction {found:?}, expected h2d or d2h")]
    UnknownDirection { line: usize, found: String },

    #[error("line {line}: invalid hex payload")]
    InvalidHex {
        line: usize,
        #[source]
        source: hex::FromHexError,
    },
}

/// One transfer read from a capture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureLine {
    /// 1-based line number, also used as the transfer id.
    pub line: usize,
    pub kind: TransferKind,
    pub direction: Direction,
    pub bytes: Vec<u8>,
}

impl CaptureLine {
    /// Borrow this line as a transfer.
    #[must_use]
    pub fn transfer(&self) -> RawTransfer<'_> {
        RawTransfer::new(
            TransferId::new(u64::try_from(self.line).unwrap_or(u64::MAX)),
            self.direction,
            self.kind,
            &self.bytes,
        )
    }
}

/// Parse one capture line; blank lines and comments yield `None`.
///
/// # Errors
///
/// Returns a [`CaptureError`] naming the line when a field is missing or
/// invalid.
pub fn parse_line(line: usize, text: &str) -> Result<Option<CaptureLine>, CaptureError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }
    let mut fields = text.splitn(3, char::is_whitespace);
    let kind = match fields.next() {
        Some("ctrl") => TransferKind::Control,
        Some("bulk") => TransferKind::Bulk,
        Some(other) => {
            return Err(CaptureError::UnknownKind {
                line,
                found: other.to_owned(),
            });
        }
        None => return Err(CaptureError::MissingField { line, field: "pipe" }),
    };
    let direction = match fields.next() {
        Some("h2d") => Direction::HostToDevice,
        Some("d2h") => Direction::DeviceToHost,
        Some(other) => {
            return Err(CaptureError::UnknownDirection {
                line,
                found: other.to_owned(),
            });
        }
        None => {
            return Err(CaptureError::MissingField {
                line,
                field: "direction",
            });
        }
    };
    let digits: String = fields
        .next()
        .ok_or(CaptureError::MissingField {
            line,
            field: "payload",
        })?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = hex::decode(digits).map_err(|source| CaptureError::InvalidHex { line, source })?;
    Ok(Some(CaptureLine {
        line,
        kind,
        direction,
        bytes,
    }))
}

/// Parse a whole capture.
///
/// # Errors
///
/// Returns the first [`CaptureError`] encountered.
pub fn parse_capture(text: &str) -> Result<Vec<CaptureLine>, CaptureError> {
    text.lines()
        .enumerate()
        .filter_map(|(index, line)| parse_line(index + 1, line).transpose())
        .collect()
}
