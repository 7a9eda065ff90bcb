use std::fmt;

/// Extended TLV types defined for MBIM information buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TlvType {
    Invalid,
    UePolicies,
    SingleNssai,
    AllowedNssai,
    CfgNssai,
    DefaultCfgNssai,
    PreconfigDefaultCfgNssai,
    RejectedNssai,
    Ladn,
    Tai,
    WideString,
    U16Table,
    EapPacket,
    Pco,
    RouteSelectionDescriptors,
    TrafficParameters,
    WakeCommand,
    WakePacket,
    Unknown(u16),
}

impl TlvType {
    const NAMED: [(u16, Self, &'static str); 18] = [
        (0, Self::Invalid, "INVALID"),
        (1, Self::UePolicies, "UE_POLICIES"),
        (2, Self::SingleNssai, "SINGLE_NSSAI"),
        (3, Self::AllowedNssai, "ALLOWED_NSSAI"),
        (4, Self::CfgNssai, "CFG_NSSAI"),
        (5, Self::DefaultCfgNssai, "DFLT_CFG_NSSAI"),
        (6, Self::PreconfigDefaultCfgNssai, "PRECFG_DFLT_CFG_NSSAI"),
        (7, Self::RejectedNssai, "REJ_NSSAI"),
        (8, Self::Ladn, "LADN"),
        (9, Self::Tai, "TAI"),
        (10, Self::WideString, "WCHAR_STR"),
        (11, Self::U16Table, "UINT16_TBL"),
        (12, Self::EapPacket, "EAP_PACKET"),
        (13, Self::Pco, "PCO"),
        (14, Self::RouteSelectionDescriptors, "ROUTE_SELECTION_DESCRIPTORS"),
        (15, Self::TrafficParameters, "TRAFFIC_PARAMETERS"),
        (16, Self::WakeCommand, "WAKE_COMMAND"),
        (17, Self::WakePacket, "WAKE_PACKET"),
    ];

    /// Map a wire tag to its type.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbimframe::tlv::TlvType;
    ///
    /// assert_eq!(TlvType::from_raw(10), TlvType::WideString);
    /// assert_eq!(TlvType::from_raw(0x1234), TlvType::Unknown(0x1234));
    /// ```
    #[must_use]
    pub fn from_raw(tag: u16) -> Self {
        Self::NAMED
            .iter()
            .find(|(raw, ..)| *raw == tag)
            .map_or(Self::Unknown(tag), |(_, ty, _)| *ty)
    }

    #[must_use]
    pub fn raw(self) -> u16 {
        match self {
            Self::Unknown(tag) => tag,
            named => Self::NAMED
                .iter()
                .find(|(_, ty, _)| *ty == named)
                .map_or(0, |(raw, ..)| *raw),
        }
    }
}

impl From<u16> for TlvType {
    fn from(tag: u16) -> Self { Self::from_raw(tag) }
}

impl fmt::Display for TlvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(tag) => write!(f, "UNKNOWN({tag:#06x})"),
            named => {
                let name = Self::NAMED
                    .iter()
                    .find(|(_, ty, _)| ty == named)
                    .map_or("UNKNOWN", |(.., name)| *name);
                f.write_str(name)
            }
        }
    }
}
