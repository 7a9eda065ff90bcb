//! Dispatch from service and command to payload decoders.
//!
//! The framing core stops at the information buffer. A [`Catalogue`] maps
//! each [`CommandAddress`] to a decoder supplied by the caller. Catalogues
//! are assembled once through a [`CatalogueBuilder`] and are immutable while
//! decoding.

use std::collections::HashMap;

use thiserror::Error;

use crate::{
    control::{ControlMessage, FramerError, InformationBuffer},
    service::{CommandAddress, CommandId, ServiceId},
};

/// Decoder for one command's information buffer.
pub type DecodeFn<T> = fn(&InformationBuffer<'_>) -> T;

/// Errors raised while assembling a catalogue.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CatalogueError {
    /// A decoder is already registered for this address.
    #[error("a decoder is already registered for {0}")]
    Duplicate(CommandAddress),
}

/// Collects decoders before freezing them into a [`Catalogue`].
#[derive(Debug)]
pub struct CatalogueBuilder<T> {
    entries: HashMap<CommandAddress, DecodeFn<T>>,
}

impl<T> Default for CatalogueBuilder<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> CatalogueBuilder<T> {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Register `decode` for `service`/`command`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Duplicate`] if the address is taken; the
    /// existing decoder is kept.
    pub fn register(
        mut self,
        service: ServiceId,
        command: CommandId,
        decode: DecodeFn<T>,
    ) -> Result<Self, CatalogueError> {
        let address = CommandAddress::new(service, command);
        if self.entries.contains_key(&address) {
            return Err(CatalogueError::Duplicate(address));
        }
        self.entries.insert(address, decode);
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> Catalogue<T> {
        Catalogue {
            entries: self.entries,
        }
    }
}

/// Immutable lookup table from [`CommandAddress`] to decoder.
///
/// # Examples
///
/// ```
/// use mbimframe::{
///     catalogue::CatalogueBuilder,
///     control::InformationBuffer,
///     service::{CommandId, ServiceId},
/// };
///
/// fn length(buffer: &InformationBuffer<'_>) -> usize { buffer.bytes.len() }
///
/// let catalogue = CatalogueBuilder::new()
///     .register(ServiceId::BASIC_CONNECT, CommandId::new(1), length)
///     .expect("first registration")
///     .build();
/// assert_eq!(catalogue.len(), 1);
/// ```
#[derive(Debug)]
pub struct Catalogue<T> {
    entries: HashMap<CommandAddress, DecodeFn<T>>,
}

impl<T> Catalogue<T> {
    /// Decoder registered for `address`.
    #[must_use]
    pub fn get(&self, address: &CommandAddress) -> Option<DecodeFn<T>> {
        self.entries.get(address).copied()
    }

    /// Decode the information buffer of `message`.
    ///
    /// Returns `Ok(None)` for messages without an information buffer and for
    /// addresses with no registered decoder.
    ///
    /// # Errors
    ///
    /// Propagates errors locating the information buffer.
    pub fn dispatch(&self, message: &ControlMessage) -> Result<Option<T>, FramerError> {
        let Some(buffer) = message.information_buffer()? else {
            return Ok(None);
        };
        Ok(self.get(&buffer.address).map(|decode| decode(&buffer)))
    }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
    use mbimframe_testing::ControlMessageBuilder;

    use super::{CatalogueBuilder, CatalogueError};
    use crate::{
        config::FramerConfig,
        control::{ControlMessage, InformationBuffer, InformationRole, MessageFramer},
        service::{CommandAddress, CommandId, ServiceId},
        transfer::{Direction, RawTransfer, TransferId},
    };

    fn describe(buffer: &InformationBuffer<'_>) -> String {
        match buffer.role {
            InformationRole::Request(_) => format!("request {}", buffer.bytes.len()),
            InformationRole::Response { status } => format!("response {status}"),
            InformationRole::Indication => "indication".to_owned(),
        }
    }

    fn message(bytes: &[u8], direction: Direction) -> ControlMessage {
        MessageFramer::new(FramerConfig::default())
            .submit(&RawTransfer::control(TransferId::new(1), direction, bytes))
            .expect("valid transfer")
            .into_message()
            .expect("complete")
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let err = CatalogueBuilder::new()
            .register(ServiceId::SMS, CommandId::new(1), describe)
            .expect("first registration")
            .register(ServiceId::SMS, CommandId::new(1), describe)
            .expect_err("second registration");
        assert_eq!(
            err,
            CatalogueError::Duplicate(CommandAddress::new(ServiceId::SMS, CommandId::new(1)))
        );
    }

    #[test]
    fn dispatch_invokes_the_registered_decoder() {
        let catalogue = CatalogueBuilder::new()
            .register(ServiceId::BASIC_CONNECT, CommandId::new(2), describe)
            .expect("registered")
            .build();

        let done = ControlMessageBuilder::command_done(
            4,
            *ServiceId::BASIC_CONNECT.as_bytes(),
            2,
            0,
            &[1],
        )
        .encode();
        assert_eq!(
            catalogue
                .dispatch(&message(&done, Direction::DeviceToHost))
                .expect("valid body"),
            Some("response 0".to_owned())
        );

        let other = ControlMessageBuilder::command(4, *ServiceId::SMS.as_bytes(), 2, 0, &[])
            .encode();
        assert_eq!(
            catalogue
                .dispatch(&message(&other, Direction::HostToDevice))
                .expect("valid body"),
            None
        );
    }

    #[test]
    fn messages_without_buffers_dispatch_to_none() {
        let catalogue = CatalogueBuilder::<String>::new().build();
        let open = ControlMessageBuilder::open(1, 4096).encode();
        assert!(catalogue.is_empty());
        assert_eq!(
            catalogue
                .dispatch(&message(&open, Direction::HostToDevice))
                .expect("valid body"),
            None
        );
    }
}
