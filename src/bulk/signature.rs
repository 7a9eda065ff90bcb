//! Datagram pointer signatures and the session kinds they select.
//!
//! Signatures are case sensitive. 16-bit transfers use upper case tags and
//! 32-bit transfers the lower case form of the same tags; both resolve to
//! the same [`SessionKind`]. A tag written in the other width's case is kept
//! as [`SessionKind::Unknown`].

use std::fmt;

use super::IndexWidth;

/// Logical sub-channel a bulk datagram belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// IP packets of the numbered session (`IPS`).
    IpSession(u8),
    /// TLV control records carried in-band (`CTL`).
    ControlSubchannel,
    /// Device service stream of the numbered session (`DSS`).
    AuxiliaryStream(u8),
    /// Ethernet frames (`NCM0` without FCS, `NCM1` with).
    RawEthernet { with_fcs: bool },
    /// Unrecognised signature, retained verbatim.
    Unknown([u8; 4]),
}

impl SessionKind {
    /// Resolve an NDP signature under the transfer's index width.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbimframe::bulk::{IndexWidth, SessionKind};
    ///
    /// let narrow = SessionKind::from_signature(*b"IPS\x02", IndexWidth::Sixteen);
    /// let wide = SessionKind::from_signature(*b"ips\x02", IndexWidth::ThirtyTwo);
    /// assert_eq!(narrow, SessionKind::IpSession(2));
    /// assert_eq!(narrow, wide);
    ///
    /// let crossed = SessionKind::from_signature(*b"ips\x02", IndexWidth::Sixteen);
    /// assert_eq!(crossed, SessionKind::Unknown(*b"ips\x02"));
    /// ```
    #[must_use]
    pub fn from_signature(signature: [u8; 4], width: IndexWidth) -> Self {
        let [a, b, c, id] = signature;
        let tag = [a, b, c];
        let (ips, dss, ctl, ncm) = match width {
            IndexWidth::Sixteen => (b"IPS", b"DSS", b"CTL", b"NCM"),
            IndexWidth::ThirtyTwo => (b"ips", b"dss", b"ctl", b"ncm"),
        };
        match (&tag, id) {
            (t, id) if t == ips => Self::IpSession(id),
            (t, id) if t == dss => Self::AuxiliaryStream(id),
            (t, _) if t == ctl => Self::ControlSubchannel,
            (t, b'0') if t == ncm => Self::RawEthernet { with_fcs: false },
            (t, b'1') if t == ncm => Self::RawEthernet { with_fcs: true },
            _ => Self::Unknown(signature),
        }
    }

    /// Signature this kind is written with at `width`.
    ///
    /// [`SessionKind::ControlSubchannel`] is written with a zero channel
    /// byte.
    #[must_use]
    pub fn signature(self, width: IndexWidth) -> [u8; 4] {
        let [a, b, c, d] = match self {
            Self::IpSession(id) => [b'I', b'P', b'S', id],
            Self::AuxiliaryStream(id) => [b'D', b'S', b'S', id],
            Self::ControlSubchannel => [b'C', b'T', b'L', 0],
            Self::RawEthernet { with_fcs } => [b'N', b'C', b'M', if with_fcs { b'1' } else { b'0' }],
            Self::Unknown(raw) => return raw,
        };
        match width {
            IndexWidth::Sixteen => [a, b, c, d],
            IndexWidth::ThirtyTwo => [
                a.to_ascii_lowercase(),
                b.to_ascii_lowercase(),
                c.to_ascii_lowercase(),
                d,
            ],
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IpSession(id) => write!(f, "IP session {id}"),
            Self::ControlSubchannel => f.write_str("control sub-channel"),
            Self::AuxiliaryStream(id) => write!(f, "device service stream {id}"),
            Self::RawEthernet { with_fcs: false } => f.write_str("Ethernet"),
            Self::RawEthernet { with_fcs: true } => f.write_str("Ethernet with FCS"),
            Self::Unknown(raw) => write!(f, "unknown signature {}", hex::encode(raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::SessionKind;
    use crate::bulk::IndexWidth;

    #[rstest]
    #[case(*b"IPS\x00", *b"ips\x00", SessionKind::IpSession(0))]
    #[case(*b"IPS\x07", *b"ips\x07", SessionKind::IpSession(7))]
    #[case(*b"DSS\x01", *b"dss\x01", SessionKind::AuxiliaryStream(1))]
    #[case(*b"CTL\x00", *b"ctl\x00", SessionKind::ControlSubchannel)]
    #[case(*b"NCM0", *b"ncm0", SessionKind::RawEthernet { with_fcs: false })]
    #[case(*b"NCM1", *b"ncm1", SessionKind::RawEthernet { with_fcs: true })]
    fn both_widths_resolve_to_the_same_kind(
        #[case] narrow: [u8; 4],
        #[case] wide: [u8; 4],
        #[case] kind: SessionKind,
    ) {
        assert_eq!(SessionKind::from_signature(narrow, IndexWidth::Sixteen), kind);
        assert_eq!(SessionKind::from_signature(wide, IndexWidth::ThirtyTwo), kind);
        assert_eq!(
            SessionKind::from_signature(wide, IndexWidth::Sixteen),
            SessionKind::Unknown(wide)
        );
        assert_eq!(
            SessionKind::from_signature(narrow, IndexWidth::ThirtyTwo),
            SessionKind::Unknown(narrow)
        );
    }

    #[rstest]
    #[case(SessionKind::IpSession(3))]
    #[case(SessionKind::AuxiliaryStream(0))]
    #[case(SessionKind::ControlSubchannel)]
    #[case(SessionKind::RawEthernet { with_fcs: true })]
    fn signatures_resolve_back_to_their_kind(#[case] kind: SessionKind) {
        for width in [IndexWidth::Sixteen, IndexWidth::ThirtyTwo] {
            assert_eq!(SessionKind::from_signature(kind.signature(width), width), kind);
        }
    }

    #[test]
    fn unrecognised_signatures_are_retained() {
        let kind = SessionKind::from_signature(*b"NCM2", IndexWidth::Sixteen);
        assert_eq!(kind, SessionKind::Unknown(*b"NCM2"));
        assert_eq!(kind.to_string(), "unknown signature 4e434d32");
    }
}
