//! Builder for MBIM extended TLV lists.

use bytes::{BufMut, BytesMut};

/// Appends TLV records to a buffer.
///
/// Records written through [`TlvBuilder::record`] are padded to a 4-byte
/// boundary, matching what devices emit.
#[derive(Clone, Debug, Default)]
pub struct TlvBuilder {
    buf: BytesMut,
}

impl TlvBuilder {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Append a record padded to a 4-byte boundary.
    #[must_use]
    pub fn record(self, tag: u16, payload: &[u8]) -> Self {
        let padding = (4 - payload.len() % 4) % 4;
        self.record_with_padding(tag, payload, padding)
    }

    /// Append a record with an explicit padding length.
    #[must_use]
    pub fn record_with_padding(mut self, tag: u16, payload: &[u8], padding: usize) -> Self {
        self.buf.put_u16_le(tag);
        self.buf.put_u8(0);
        self.buf
            .put_u8(u8::try_from(padding).expect("padding fits u8"));
        self.buf
            .put_u32_le(u32::try_from(payload.len()).expect("payload fits u32"));
        self.buf.put_slice(payload);
        self.buf.put_bytes(0, padding);
        self
    }

    /// Append a record whose payload is itself a TLV list.
    #[must_use]
    pub fn nested(self, tag: u16, inner: TlvBuilder) -> Self {
        let payload = inner.build();
        self.record(tag, &payload)
    }

    /// Append a UTF-16LE string record.
    #[must_use]
    pub fn wide_string(self, tag: u16, text: &str) -> Self {
        let payload: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        self.record(tag, &payload)
    }

    /// Append raw bytes, e.g. a deliberately truncated record.
    #[must_use]
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.buf.put_slice(bytes);
        self
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize { self.buf.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.buf.is_empty() }

    #[must_use]
    pub fn build(self) -> Vec<u8> { self.buf.to_vec() }
}
