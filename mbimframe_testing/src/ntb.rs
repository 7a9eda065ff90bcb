//! Builders for NCM transfer blocks carried on the MBIM bulk pipes.
//!
//! [`NtbBuilder`] writes structures at explicit offsets so tests can craft
//! malformed layouts (cyclic chains, overlapping datagrams) as easily as
//! well-formed ones.

/// Index width selected by the transfer header signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NtbWidth {
    /// `NCMH` transfer header with 16-bit indices.
    Sixteen,
    /// `ncmh` transfer header with 32-bit indices.
    ThirtyTwo,
}

impl NtbWidth {
    /// Length of the transfer header.
    #[must_use]
    pub const fn nth_len(self) -> usize {
        match self {
            Self::Sixteen => 12,
            Self::ThirtyTwo => 16,
        }
    }

    /// Length of a datagram pointer header.
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

    /// Total NDP length for `entries` datagrams plus the (0,0) terminator.
    #[must_use]
    pub const fn ndp_len(self, entries: usize) -> usize {
        self.ndp_header_len() + (entries + 1) * self.entry_len()
    }

    /// Signature of the transfer header.
    #[must_use]
    pub const fn nth_signature(self) -> [u8; 4] {
        match self {
            Self::Sixteen => *b"NCMH",
            Self::ThirtyTwo => *b"ncmh",
        }
    }

    /// IP session signature for `session_id`.
    #[must_use]
    pub const fn ips(self, session_id: u8) -> [u8; 4] {
        match self {
            Self::Sixteen => [b'I', b'P', b'S', session_id],
            Self::ThirtyTwo => [b'i', b'p', b's', session_id],
        }
    }

    /// Device service stream signature for `session_id`.
    #[must_use]
    pub const fn dss(self, session_id: u8) -> [u8; 4] {
        match self {
            Self::Sixteen => [b'D', b'S', b'S', session_id],
            Self::ThirtyTwo => [b'd', b's', b's', session_id],
        }
    }

    /// Control sub-channel signature.
    #[must_use]
    pub const fn ctl(self, channel: u8) -> [u8; 4] {
        match self {
            Self::Sixteen => [b'C', b'T', b'L', channel],
            Self::ThirtyTwo => [b'c', b't', b'l', channel],
        }
    }
}

/// Incrementally writes an NTB into a growable buffer.
#[derive(Clone, Debug)]
pub struct NtbBuilder {
    width: NtbWidth,
    buf: Vec<u8>,
    sequence: u16,
    first_ndp_index: u32,
    header_length: Option<u16>,
    block_length: Option<u32>,
}

impl NtbBuilder {
    /// Start a transfer of `width`, zero-filled to `len` bytes.
    #[must_use]
    pub fn new(width: NtbWidth, len: usize) -> Self {
        Self {
            width,
            buf: vec![0; len.max(width.nth_len())],
            sequence: 0,
            first_ndp_index: 0,
            header_length: None,
            block_length: None,
        }
    }

    /// Set the transfer sequence number.
    #[must_use]
    pub fn sequence(mut self, sequence: u16) -> Self {
        self.sequence = sequence;
        self
    }

    /// Set the index of the first datagram pointer.
    #[must_use]
    pub fn first_ndp(mut self, index: u32) -> Self {
        self.first_ndp_index = index;
        self
    }

    /// Override the declared header length.
    #[must_use]
    pub fn header_length(mut self, length: u16) -> Self {
        self.header_length = Some(length);
        self
    }

    /// Override the declared block length (defaults to the buffer size).
    #[must_use]
    pub fn block_length(mut self, length: u32) -> Self {
        self.block_length = Some(length);
        self
    }

    /// Write a datagram pointer at `offset`.
    ///
    /// `entries` excludes the terminator, which is appended automatically.
    #[must_use]
    pub fn ndp(self, offset: usize, signature: [u8; 4], next: u32, entries: &[(u32, u32)]) -> Self {
        let length = self.width.ndp_len(entries.len());
        self.ndp_with_length(offset, signature, next, entries, true, length)
    }

    /// Write a datagram pointer with full control over its length field and
    /// whether the (0,0) terminator is written.
    #[must_use]
    pub fn ndp_with_length(
        mut self,
        offset: usize,
        signature: [u8; 4],
        next: u32,
        entries: &[(u32, u32)],
        terminate: bool,
        length: usize,
    ) -> Self {
        let width = self.width;
        self.put(offset, &signature);
        self.put(offset + 4, &to_u16(length).to_le_bytes());
        let mut cursor = match width {
            NtbWidth::Sixteen => {
                self.put(offset + 6, &to_u16(next).to_le_bytes());
                offset + 8
            }
            NtbWidth::ThirtyTwo => {
                self.put(offset + 6, &0u16.to_le_bytes());
                self.put(offset + 8, &next.to_le_bytes());
                self.put(offset + 12, &0u32.to_le_bytes());
                offset + 16
            }
        };
        let terminator = terminate.then_some((0, 0));
        for (index, len) in entries.iter().copied().chain(terminator) {
            match width {
                NtbWidth::Sixteen => {
                    self.put(cursor, &to_u16(index).to_le_bytes());
                    self.put(cursor + 2, &to_u16(len).to_le_bytes());
                }
                NtbWidth::ThirtyTwo => {
                    self.put(cursor, &index.to_le_bytes());
                    self.put(cursor + 4, &len.to_le_bytes());
                }
            }
            cursor += width.entry_len();
        }
        self
    }

    /// Copy datagram bytes to `offset`.
    #[must_use]
    pub fn datagram(mut self, offset: usize, bytes: &[u8]) -> Self {
        self.put(offset, bytes);
        self
    }

    /// Finish the transfer, writing the transfer header last.
    #[must_use]
    pub fn build(mut self) -> Vec<u8> {
        let width = self.width;
        let header_length = self
            .header_length
            .unwrap_or_else(|| to_u16(width.nth_len()));
        let block_length = self
            .block_length
            .unwrap_or_else(|| u32::try_from(self.buf.len()).expect("block fits u32"));
        let signature = width.nth_signature();
        let sequence = self.sequence;
        let first = self.first_ndp_index;
        self.put(0, &signature);
        self.put(4, &header_length.to_le_bytes());
        self.put(6, &sequence.to_le_bytes());
        match width {
            NtbWidth::Sixteen => {
                self.put(8, &to_u16(block_length).to_le_bytes());
                self.put(10, &to_u16(first).to_le_bytes());
            }
            NtbWidth::ThirtyTwo => {
                self.put(8, &block_length.to_le_bytes());
                self.put(12, &first.to_le_bytes());
            }
        }
        self.buf
    }

    /// Lay out one NDP with `signature` followed by 4-byte aligned datagrams.
    ///
    /// Returns the transfer and the `(index, length)` entries written.
    #[must_use]
    pub fn single_ndp(
        width: NtbWidth,
        signature: [u8; 4],
        datagrams: &[Vec<u8>],
    ) -> (Vec<u8>, Vec<(u32, u32)>) {
        let ndp_offset = align4(width.nth_len());
        let mut cursor = align4(ndp_offset + width.ndp_len(datagrams.len()));
        let mut entries = Vec::with_capacity(datagrams.len());
        for datagram in datagrams {
            entries.push((to_u32(cursor), to_u32(datagram.len())));
            cursor = align4(cursor + datagram.len());
        }
        let mut builder = Self::new(width, cursor)
            .first_ndp(to_u32(ndp_offset))
            .ndp(ndp_offset, signature, 0, &entries);
        for (datagram, (index, _)) in datagrams.iter().zip(&entries) {
            builder = builder.datagram(*index as usize, datagram);
        }
        (builder.build(), entries)
    }

    fn put(&mut self, offset: usize, bytes: &[u8]) {
        let end = offset + bytes.len();
        if self.buf.len() < end {
            self.buf.resize(end, 0);
        }
        self.buf[offset..end].copy_from_slice(bytes);
    }
}

const fn align4(value: usize) -> usize { (value + 3) & !3 }

fn to_u16(value: impl TryInto<u16>) -> u16 {
    value
        .try_into()
        .unwrap_or_else(|_| panic!("value does not fit a 16-bit NTB field"))
}

fn to_u32(value: usize) -> u32 { u32::try_from(value).expect("offset fits u32") }
