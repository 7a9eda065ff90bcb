use super::{DemuxError, IndexWidth};
use crate::byte_order::{array_at, le_u16_at};

/// NCM transfer header found at offset 0 of every bulk transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NcmTransferHeader {
    pub width: IndexWidth,
    pub header_length: u16,
    pub sequence_number: u16,
    pub block_length: u32,
    pub first_ndp_index: u32,
}

impl NcmTransferHeader {
    /// Parse the transfer header and select the index width.
    ///
    /// # Errors
    ///
    /// Returns [`DemuxError::UnknownSignature`] when the signature is neither
    /// `NCMH` nor `ncmh`, and [`DemuxError::Truncated`] when the buffer ends
    /// inside the header.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbimframe::bulk::{IndexWidth, NcmTransferHeader};
    ///
    /// let bytes = *b"NCMH\x0c\x00\x05\x00\x20\x00\x10\x00";
    /// let header = NcmTransferHeader::parse(&bytes).expect("valid header");
    /// assert_eq!(header.width, IndexWidth::Sixteen);
    /// assert_eq!(header.sequence_number, 5);
    /// assert_eq!(header.first_ndp_index, 16);
    /// ```
    pub fn parse(bytes: &[u8]) -> Result<Self, DemuxError> {
        let signature = array_at::<4>(bytes, 0).ok_or(DemuxError::Truncated {
            what: "transfer header signature",
            offset: 0,
            need: 4,
            have: bytes.len(),
        })?;
        let width = IndexWidth::from_nth_signature(signature)
            .ok_or(DemuxError::UnknownSignature { found: signature })?;
        let truncated = || DemuxError::Truncated {
            what: "transfer header",
            offset: 0,
            need: width.nth_len(),
            have: bytes.len(),
        };
        if bytes.len() < width.nth_len() {
            return Err(truncated());
        }

        let header_length = le_u16_at(bytes, 4).ok_or_else(truncated)?;
        let sequence_number = le_u16_at(bytes, 6).ok_or_else(truncated)?;
        let first_ndp_offset = match width {
            IndexWidth::Sixteen => 10,
            IndexWidth::ThirtyTwo => 12,
        };
        Ok(Self {
            width,
            header_length,
            sequence_number,
            block_length: width.read_index(bytes, 8).ok_or_else(truncated)?,
            first_ndp_index: width
                .read_index(bytes, first_ndp_offset)
                .ok_or_else(truncated)?,
        })
    }
}
