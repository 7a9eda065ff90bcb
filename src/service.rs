//! Service and command addressing.
//!
//! Command, completion and indication messages name their target with a
//! 16-byte service UUID and a 32-bit command id. The core treats the pair
//! opaquely and hands it to the [`Catalogue`](crate::catalogue::Catalogue).

use std::fmt;

use derive_more::{Display, From, Into};

/// Device service UUID as carried on the wire.
///
/// # Examples
///
/// ```
/// use mbimframe::service::ServiceId;
///
/// assert_eq!(
///     ServiceId::BASIC_CONNECT.to_string(),
///     "a289cc33-bcbb-8b4f-b6b0-133ec2aae6df"
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into)]
pub struct ServiceId([u8; 16]);

impl ServiceId {
    pub const BASIC_CONNECT: Self = Self([
        0xa2, 0x89, 0xcc, 0x33, 0xbc, 0xbb, 0x8b, 0x4f, 0xb6, 0xb0, 0x13, 0x3e, 0xc2, 0xaa, 0xe6,
        0xdf,
    ]);
    pub const SMS: Self = Self([
        0x53, 0x3f, 0xbe, 0xeb, 0x14, 0xfe, 0x44, 0x67, 0x9f, 0x90, 0x33, 0xa2, 0x23, 0xe5, 0x6c,
        0x3f,
    ]);
    pub const USSD: Self = Self([
        0xe5, 0x50, 0xa0, 0xc8, 0x5e, 0x82, 0x47, 0x9e, 0x82, 0xf7, 0x10, 0xab, 0xf4, 0xc3, 0x35,
        0x1f,
    ]);
    pub const PHONEBOOK: Self = Self([
        0x4b, 0xf3, 0x84, 0x76, 0x1e, 0x6a, 0x41, 0xdb, 0xb1, 0xd8, 0xbe, 0xd2, 0x89, 0xc2, 0x5b,
        0xdb,
    ]);
    pub const STK: Self = Self([
        0xd8, 0xf2, 0x01, 0x31, 0xfc, 0xb5, 0x4e, 0x17, 0x86, 0x02, 0xd6, 0xed, 0x38, 0x16, 0x16,
        0x4c,
    ]);
    pub const AUTH: Self = Self([
        0x1d, 0x2b, 0x5f, 0xf7, 0x0a, 0xa1, 0x48, 0xb2, 0xaa, 0x52, 0x50, 0xf1, 0x57, 0x67, 0x17,
        0x4e,
    ]);
    pub const DSS: Self = Self([
        0xc0, 0x8a, 0x26, 0xdd, 0x77, 0x18, 0x43, 0x82, 0x84, 0x82, 0x6e, 0x0d, 0x58, 0x3c, 0x4d,
        0x0e,
    ]);
    pub const MS_BASIC_CONNECT_EXTENSIONS: Self = Self([
        0x3d, 0x01, 0xdc, 0xc5, 0xfe, 0xf5, 0x4d, 0x05, 0x0d, 0x3a, 0xbe, 0xf7, 0x05, 0x8e, 0x9a,
        0xaf,
    ]);

    #[must_use]
    pub const fn new(bytes: [u8; 16]) -> Self { Self(bytes) }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] { &self.0 }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, byte) in self.0.iter().enumerate() {
            if matches!(index, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Command identifier within a service.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into,
)]
#[display("{_0}")]
pub struct CommandId(u32);

impl CommandId {
    #[must_use]
    pub const fn new(value: u32) -> Self { Self(value) }

    #[must_use]
    pub const fn get(self) -> u32 { self.0 }
}

/// Service and command a message is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandAddress {
    pub service: ServiceId,
    pub command: CommandId,
}

impl CommandAddress {
    #[must_use]
    pub const fn new(service: ServiceId, command: CommandId) -> Self { Self { service, command } }
}

impl fmt::Display for CommandAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.command)
    }
}
