//! Builders for MBIM control-channel transfers.

use bytes::{BufMut, BytesMut};

/// Raw message type values used on the control channel.
pub mod message_type {
    pub const OPEN: u32 = 0x0000_0001;
    pub const CLOSE: u32 = 0x0000_0002;
    pub const COMMAND: u32 = 0x0000_0003;
    pub const HOST_ERROR: u32 = 0x0000_0004;
    pub const OPEN_DONE: u32 = 0x8000_0001;
    pub const CLOSE_DONE: u32 = 0x8000_0002;
    pub const COMMAND_DONE: u32 = 0x8000_0003;
    pub const FUNCTION_ERROR: u32 = 0x8000_0004;
    pub const INDICATE_STATUS: u32 = 0x8000_0007;

    /// Whether messages of this type carry a fragment header.
    #[must_use]
    pub const fn is_fragmented(value: u32) -> bool {
        matches!(value, COMMAND | COMMAND_DONE | INDICATE_STATUS)
    }
}

const CONTROL_HEADER_LEN: usize = 12;
const FRAGMENT_HEADER_LEN: usize = 8;

/// Builds a logical control message and its on-wire fragment split.
#[derive(Clone, Debug)]
pub struct ControlMessageBuilder {
    message_type: u32,
    transaction_id: u32,
    body: Vec<u8>,
}

impl ControlMessageBuilder {
    /// Start a message with an empty body.
    #[must_use]
    pub fn new(message_type: u32, transaction_id: u32) -> Self {
        Self {
            message_type,
            transaction_id,
            body: Vec::new(),
        }
    }

    /// Replace the body following the headers.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// OPEN_MSG carrying `max_control_transfer`.
    #[must_use]
    pub fn open(transaction_id: u32, max_control_transfer: u32) -> Self {
        Self::new(message_type::OPEN, transaction_id)
            .body(max_control_transfer.to_le_bytes().to_vec())
    }

    /// COMMAND_MSG addressed to `service`/`cid`.
    #[must_use]
    pub fn command(
        transaction_id: u32,
        service: [u8; 16],
        cid: u32,
        command_type: u32,
        information: &[u8],
    ) -> Self {
        let mut body = BytesMut::with_capacity(28 + information.len());
        body.put_slice(&service);
        body.put_u32_le(cid);
        body.put_u32_le(command_type);
        body.put_u32_le(len_u32(information.len()));
        body.put_slice(information);
        Self::new(message_type::COMMAND, transaction_id).body(body.to_vec())
    }

    /// COMMAND_DONE answering `service`/`cid`.
    #[must_use]
    pub fn command_done(
        transaction_id: u32,
        service: [u8; 16],
        cid: u32,
        status: u32,
        information: &[u8],
    ) -> Self {
        let mut body = BytesMut::with_capacity(28 + information.len());
        body.put_slice(&service);
        body.put_u32_le(cid);
        body.put_u32_le(status);
        body.put_u32_le(len_u32(information.len()));
        body.put_slice(information);
        Self::new(message_type::COMMAND_DONE, transaction_id).body(body.to_vec())
    }

    /// INDICATE_STATUS_MSG for `service`/`cid`.
    #[must_use]
    pub fn indicate_status(
        transaction_id: u32,
        service: [u8; 16],
        cid: u32,
        information: &[u8],
    ) -> Self {
        let mut body = BytesMut::with_capacity(24 + information.len());
        body.put_slice(&service);
        body.put_u32_le(cid);
        body.put_u32_le(len_u32(information.len()));
        body.put_slice(information);
        Self::new(message_type::INDICATE_STATUS, transaction_id).body(body.to_vec())
    }

    /// FUNCTION_ERROR_MSG with `error_status_code`.
    #[must_use]
    pub fn function_error(transaction_id: u32, error_status_code: u32) -> Self {
        Self::new(message_type::FUNCTION_ERROR, transaction_id)
            .body(error_status_code.to_le_bytes().to_vec())
    }

    /// Body bytes following the headers.
    #[must_use]
    pub fn body_bytes(&self) -> &[u8] { &self.body }

    /// Encode the message as a single, unfragmented transfer.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        if message_type::is_fragmented(self.message_type) {
            self.encode_fragment(1, 0, &self.body)
        } else {
            let mut buf = BytesMut::with_capacity(CONTROL_HEADER_LEN + self.body.len());
            self.put_control_header(&mut buf, CONTROL_HEADER_LEN + self.body.len());
            buf.put_slice(&self.body);
            buf.to_vec()
        }
    }

    /// Split the body into chunks of the given sizes, one transfer each.
    ///
    /// The final chunk takes whatever remains of the body, so the sizes only
    /// need to describe the leading fragments exactly.
    #[must_use]
    pub fn fragments(&self, chunk_sizes: &[usize]) -> Vec<Vec<u8>> {
        let total = len_u32(chunk_sizes.len());
        let mut offset = 0;
        let mut out = Vec::with_capacity(chunk_sizes.len());
        for (current, size) in chunk_sizes.iter().enumerate() {
            let end = if current + 1 == chunk_sizes.len() {
                self.body.len()
            } else {
                (offset + size).min(self.body.len())
            };
            out.push(self.encode_fragment(total, len_u32(current), &self.body[offset..end]));
            offset = end;
        }
        out
    }

    /// Encode one fragment with explicit fragment header values.
    #[must_use]
    pub fn encode_fragment(&self, total: u32, current: u32, chunk: &[u8]) -> Vec<u8> {
        let length = CONTROL_HEADER_LEN + FRAGMENT_HEADER_LEN + chunk.len();
        let mut buf = BytesMut::with_capacity(length);
        self.put_control_header(&mut buf, length);
        buf.put_u32_le(total);
        buf.put_u32_le(current);
        buf.put_slice(chunk);
        buf.to_vec()
    }

    fn put_control_header(&self, buf: &mut BytesMut, length: usize) {
        buf.put_u32_le(self.message_type);
        buf.put_u32_le(len_u32(length));
        buf.put_u32_le(self.transaction_id);
    }
}

fn len_u32(len: usize) -> u32 { u32::try_from(len).expect("test message length fits u32") }
