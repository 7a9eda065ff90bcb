//! Nested tag-length-value records.
//!
//! MBIM extended payloads are lists of records, each an 8-byte header
//! followed by payload and padding:
//!
//! ```text
//! tag: u16 | reserved: u8 | padding_length: u8 | data_length: u32
//! payload[data_length] | padding[padding_length]
//! ```
//!
//! Lists are bounded by a byte budget, not a record count. Some record types
//! nest further lists inside their payload; [`TlvRecord::children`] decodes
//! those with the record's own `data_length` as the budget.

mod error;
mod record;
mod types;

pub use error::TlvError;
pub use record::TlvRecord;
pub use types::TlvType;

use crate::byte_order::{le_u16_at, le_u32_at};

/// Length of the fixed record header.
pub const TLV_HEADER_LEN: usize = 8;

/// Decode the record at `offset`, returning it and the offset just past its
/// padding.
///
/// # Errors
///
/// Returns [`TlvError::TruncatedHeader`] when fewer than eight bytes remain
/// and [`TlvError::PayloadOutOfBounds`] when payload or padding would read
/// past `bytes`.
///
/// # Examples
///
/// ```
/// use mbimframe::tlv::{TlvType, decode_one};
///
/// let bytes = [
///     10, 0, 0, 0, 4, 0, 0, 0, // WCHAR_STR, no padding, 4 bytes
///     b'h', 0, b'i', 0,
/// ];
/// let (record, next) = decode_one(&bytes, 0).expect("valid record");
/// assert_eq!(record.tlv_type(), TlvType::WideString);
/// assert_eq!(record.wide_string().expect("even length"), "hi");
/// assert_eq!(next, 12);
/// ```
pub fn decode_one(bytes: &[u8], offset: usize) -> Result<(TlvRecord<'_>, usize), TlvError> {
    let truncated = || TlvError::TruncatedHeader {
        offset,
        available: bytes.len().saturating_sub(offset),
    };
    let tag = le_u16_at(bytes, offset).ok_or_else(truncated)?;
    let data_length = offset
        .checked_add(4)
        .and_then(|at| le_u32_at(bytes, at))
        .ok_or_else(truncated)?;
    // Both single-byte fields precede `data_length`, so they are present.
    let reserved = bytes[offset + 2];
    let padding_length = bytes[offset + 3];

    let payload_start = offset + TLV_HEADER_LEN;
    let out_of_bounds = |end: usize| TlvError::PayloadOutOfBounds {
        offset,
        end,
        available: bytes.len(),
    };
    let payload_end = usize::try_from(data_length)
        .ok()
        .and_then(|len| payload_start.checked_add(len))
        .ok_or_else(|| out_of_bounds(usize::MAX))?;
    let end = payload_end
        .checked_add(usize::from(padding_length))
        .ok_or_else(|| out_of_bounds(usize::MAX))?;
    if end > bytes.len() {
        return Err(out_of_bounds(end));
    }

    let record = TlvRecord {
        tag,
        reserved,
        padding_length,
        data_length,
        payload: &bytes[payload_start..payload_end],
        padding: &bytes[payload_end..end],
    };
    Ok((record, end))
}

/// Decode records from `offset` until exactly `budget` bytes are consumed.
///
/// # Errors
///
/// Returns [`TlvError::BudgetOutOfBounds`] when `offset + budget` exceeds
/// the buffer and [`TlvError::BudgetOverrun`] when a record would end past
/// the budget. Records are never clamped to fit.
///
/// # Examples
///
/// ```
/// use mbimframe::tlv::decode_list;
///
/// let bytes = [
///     11, 0, 0, 2, 2, 0, 0, 0, 7, 0, 0, 0, // UINT16_TBL [7], 2 padding bytes
///     11, 0, 0, 0, 0, 0, 0, 0, // empty UINT16_TBL
/// ];
/// let records = decode_list(&bytes, 0, bytes.len()).expect("valid list");
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].u16_table().expect("even length"), vec![7]);
/// ```
pub fn decode_list(
    bytes: &[u8],
    offset: usize,
    budget: usize,
) -> Result<Vec<TlvRecord<'_>>, TlvError> {
    let limit = offset
        .checked_add(budget)
        .filter(|limit| *limit <= bytes.len())
        .ok_or(TlvError::BudgetOutOfBounds {
            offset,
            budget,
            available: bytes.len(),
        })?;
    let window = &bytes[..limit];

    let mut records = Vec::new();
    let mut cursor = offset;
    while cursor < limit {
        let (record, next) = decode_one(window, cursor).map_err(|_| TlvError::BudgetOverrun {
            offset: cursor,
            limit,
        })?;
        records.push(record);
        cursor = next;
    }
    Ok(records)
}

#[cfg(test)]
mod tests;
