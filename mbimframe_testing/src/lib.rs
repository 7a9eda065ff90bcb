//! Wire builders and log-capture fixtures for exercising `mbimframe`.
//!
//! The builders emit plain byte vectors so they can be shared by unit tests
//! inside the decoder crate and by its integration tests without tying the
//! two crates' types together.
//!
//! ```rust
//! use mbimframe_testing::{ControlMessageBuilder, message_type};
//!
//! let message = ControlMessageBuilder::new(message_type::COMMAND, 7).body(vec![0; 40]);
//! let fragments = message.fragments(&[16, 16, 8]);
//! assert_eq!(fragments.len(), 3);
//! ```

pub mod control;
pub mod logging;
pub mod ntb;
pub mod tlv;

pub use control::{ControlMessageBuilder, message_type};
pub use logging::{LoggerHandle, logger};
pub use ntb::{NtbBuilder, NtbWidth};
pub use tlv::TlvBuilder;
