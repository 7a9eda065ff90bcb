use super::{TLV_HEADER_LEN, TlvError, TlvType, decode_list};
use crate::byte_order::read_le_u16;

/// One decoded TLV record borrowing its bytes from the input buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TlvRecord<'a> {
    pub tag: u16,
    pub reserved: u8,
    pub padding_length: u8,
    pub data_length: u32,
    pub payload: &'a [u8],
    pub padding: &'a [u8],
}

impl<'a> TlvRecord<'a> {
    #[must_use]
    pub fn tlv_type(&self) -> TlvType { TlvType::from_raw(self.tag) }

    /// Bytes the record occupies, header and padding included.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        TLV_HEADER_LEN + self.payload.len() + self.padding.len()
    }

    /// Decode the payload as a nested TLV list bounded by `data_length`.
    ///
    /// # Errors
    ///
    /// Propagates [`decode_list`] errors for the nested records.
    pub fn children(&self) -> Result<Vec<TlvRecord<'a>>, TlvError> {
        decode_list(self.payload, 0, self.payload.len())
    }

    /// Decode the payload as a UTF-16LE string.
    ///
    /// Unpaired surrogates are replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TlvError::OddWideString`] when the payload length is odd.
    pub fn wide_string(&self) -> Result<String, TlvError> {
        let units = u16_units(self.payload).ok_or(TlvError::OddWideString {
            length: self.payload.len(),
        })?;
        Ok(String::from_utf16_lossy(&units))
    }

    /// Decode the payload as a table of little-endian `u16` values.
    ///
    /// # Errors
    ///
    /// Returns [`TlvError::OddTable`] when the payload length is odd.
    pub fn u16_table(&self) -> Result<Vec<u16>, TlvError> {
        u16_units(self.payload).ok_or(TlvError::OddTable {
            length: self.payload.len(),
        })
    }
}

fn u16_units(payload: &[u8]) -> Option<Vec<u16>> {
    let pairs = payload.chunks_exact(2);
    pairs.remainder().is_empty().then(|| {
        pairs
            .map(|pair| read_le_u16([pair[0], pair[1]]))
            .collect()
    })
}
