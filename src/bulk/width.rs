use crate::byte_order::{le_u16_at, le_u32_at};

/// Index width of one NCM transfer, chosen by its transfer header signature.
///
/// Every index and length in the transfer, and the layout of each datagram
/// pointer, follows from this value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexWidth {
    /// `NCMH` transfer with 16-bit indices.
    Sixteen,
    /// `ncmh` transfer with 32-bit indices.
    ThirtyTwo,
}

impl IndexWidth {
    /// Width selected by a transfer header signature, if it is one.
    #[must_use]
    pub fn from_nth_signature(signature: [u8; 4]) -> Option<Self> {
        match &signature {
            super::NTH16_SIGNATURE => Some(Self::Sixteen),
            super::NTH32_SIGNATURE => Some(Self::ThirtyTwo),
            _ => None,
        }
    }

    #[must_use]
    pub const fn nth_signature(self) -> &'static [u8; 4] {
        match self {
            Self::Sixteen => super::NTH16_SIGNATURE,
            Self::ThirtyTwo => super::NTH32_SIGNATURE,
        }
    }

    /// Length of the transfer header.
    #[must_use]
    pub const fn nth_len(self) -> usize {
        match self {
            Self::Sixteen => 12,
            Self::ThirtyTwo => 16,
        }
    }

    /// Length of a datagram pointer up to its first entry.
    #[must_use]
    pub const fn ndp_header_len(self) -> usize {
        match self {
            Self::Sixteen => 8,
            Self::ThirtyTwo => 16,
        }
    }

    /// Length of one `(index, length)` entry.
    #[must_use]
    pub const fn entry_len(self) -> usize {
        match self {
            Self::Sixteen => 4,
            Self::ThirtyTwo => 8,
        }
    }

    /// Read one index-width field at `offset`, widened to `u32`.
    #[must_use]
    pub fn read_index(self, bytes: &[u8], offset: usize) -> Option<u32> {
        match self {
            Self::Sixteen => le_u16_at(bytes, offset).map(u32::from),
            Self::ThirtyTwo => le_u32_at(bytes, offset),
        }
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Sixteen => 16,
            Self::ThirtyTwo => 32,
        }
    }
}
