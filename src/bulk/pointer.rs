use super::{DemuxError, IndexWidth, SessionKind};
use crate::byte_order::{array_at, le_u16_at};

/// One `(index, length)` pair from a datagram pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DatagramEntry {
    pub index: u32,
    pub length: u32,
}

impl DatagramEntry {
    /// Whether this entry is the `(0, 0)` list terminator.
    #[must_use]
    pub const fn is_terminator(self) -> bool { self.index == 0 && self.length == 0 }
}

/// A datagram pointer (NDP) with its entry list read up to the terminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatagramPointer {
    pub signature: [u8; 4],
    pub kind: SessionKind,
    pub length: u16,
    pub next_ndp_index: u32,
    /// Entries preceding the terminator, excluding it.
    pub entries: Vec<DatagramEntry>,
    /// Whether a `(0, 0)` terminator was found within `length`.
    pub terminated: bool,
}

impl DatagramPointer {
    /// Parse the datagram pointer at `index`.
    ///
    /// The pointer's position and extent are validated here; the datagrams
    /// its entries describe are checked by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`DemuxError::MisalignedNdp`] for an index that is not 4-byte
    /// aligned, [`DemuxError::NdpOutOfBounds`] when the pointer extends past
    /// `bytes`, and [`DemuxError::NdpLengthInvalid`] when its length cannot
    /// hold its own header.
    pub fn parse(bytes: &[u8], index: u32, width: IndexWidth) -> Result<Self, DemuxError> {
        if index % 4 != 0 {
            return Err(DemuxError::MisalignedNdp { index });
        }
        let header_len = width.ndp_header_len();
        let out_of_bounds = |length: usize| DemuxError::NdpOutOfBounds {
            index,
            length,
            available: bytes.len(),
        };
        let start = usize::try_from(index).map_err(|_| out_of_bounds(header_len))?;
        if start
            .checked_add(header_len)
            .is_none_or(|end| end > bytes.len())
        {
            return Err(out_of_bounds(header_len));
        }

        let signature = array_at::<4>(bytes, start).ok_or_else(|| out_of_bounds(header_len))?;
        let length = le_u16_at(bytes, start + 4).ok_or_else(|| out_of_bounds(header_len))?;
        let declared = usize::from(length);
        if declared < header_len {
            return Err(DemuxError::NdpLengthInvalid {
                index,
                length,
                minimum: header_len,
            });
        }
        let end = start + declared;
        if end > bytes.len() {
            return Err(out_of_bounds(declared));
        }
        let next_offset = match width {
            IndexWidth::Sixteen => start + 6,
            IndexWidth::ThirtyTwo => start + 8,
        };
        let next_ndp_index = width
            .read_index(bytes, next_offset)
            .ok_or_else(|| out_of_bounds(header_len))?;

        let (entries, terminated) = read_entries(&bytes[start + header_len..end], width);
        Ok(Self {
            signature,
            kind: SessionKind::from_signature(signature, width),
            length,
            next_ndp_index,
            entries,
            terminated,
        })
    }
}

fn read_entries(table: &[u8], width: IndexWidth) -> (Vec<DatagramEntry>, bool) {
    let step = width.entry_len();
    let half = step / 2;
    let mut entries = Vec::with_capacity(table.len() / step);
    for offset in (0..table.len() / step).map(|slot| slot * step) {
        let (Some(index), Some(length)) = (
            width.read_index(table, offset),
            width.read_index(table, offset + half),
        ) else {
            break;
        };
        let entry = DatagramEntry { index, length };
        if entry.is_terminator() {
            return (entries, true);
        }
        entries.push(entry);
    }
    (entries, false)
}
