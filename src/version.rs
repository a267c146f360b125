//! Protocol version carried in the first field of every message.

/// Community-based SNMP version a session speaks.
///
/// The configured value is written to the wire as-is. It also decides how
/// the end of a walk is signalled: v2c agents return `endOfMibView`, while
/// v1 agents answer with a `noSuchName` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Version {
    /// SNMPv1 (RFC 1157)
    V1,
    /// SNMPv2c (RFC 1901)
    #[default]
    V2c,
}

impl Version {
    /// Value of the message version field (v1 = 0, v2c = 1).
    pub const fn as_i32(self) -> i32 {
        match self {
            Version::V1 => 0,
            Version::V2c => 1,
        }
    }

    /// Map a decoded version field back; `None` for v2u, v3 and anything else.
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Version::V1),
            1 => Some(Version::V2c),
            _ => None,
        }
    }

    /// Whether a bulk walk can be used; v1 falls back to GETNEXT.
    pub const fn supports_get_bulk(self) -> bool {
        matches!(self, Version::V2c)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Version::V1 => write!(f, "SNMPv1"),
            Version::V2c => write!(f, "SNMPv2c"),
        }
    }
}
