//! Request/response packets.
//!
//! A [`Packet`] is the structured form of one community-based SNMP message:
//! `SEQUENCE { version, community, PDU }`. Sessions build a fresh packet per
//! request and never touch it again once it has been handed to the codec.

use bytes::Bytes;

use crate::ber::tag;
use crate::error::ErrorStatus;
use crate::oid::Oid;
use crate::varbind::VarBind;
use crate::version::Version;

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PduType {
    GetRequest = tag::pdu::GET_REQUEST,
    GetNextRequest = tag::pdu::GET_NEXT_REQUEST,
    Response = tag::pdu::RESPONSE,
    GetBulkRequest = tag::pdu::GET_BULK_REQUEST,
}

impl PduType {
    /// Create from tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            tag::pdu::GET_REQUEST => Some(Self::GetRequest),
            tag::pdu::GET_NEXT_REQUEST => Some(Self::GetNextRequest),
            tag::pdu::RESPONSE => Some(Self::Response),
            tag::pdu::GET_BULK_REQUEST => Some(Self::GetBulkRequest),
            _ => None,
        }
    }

    /// Get the tag byte.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Whether a session may send this PDU type.
    pub fn is_request(self) -> bool {
        !matches!(self, Self::Response)
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetNextRequest => write!(f, "GetNextRequest"),
            Self::Response => write!(f, "Response"),
            Self::GetBulkRequest => write!(f, "GetBulkRequest"),
        }
    }
}

/// One SNMP message.
///
/// For [`PduType::GetBulkRequest`], `non_repeaters` and `max_repetitions`
/// travel in the error-status and error-index slots of the PDU; for every
/// other type those two fields are zero and ignored by the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Protocol version placed on the wire.
    pub version: Version,
    /// Community string, sent unmodified.
    pub community: Bytes,
    /// Operation kind.
    pub pdu_type: PduType,
    /// Request identifier.
    pub request_id: i32,
    /// Error status (responses).
    pub error_status: i32,
    /// Error index, 1-based (responses).
    pub error_index: i32,
    /// GETBULK non-repeaters.
    pub non_repeaters: i32,
    /// GETBULK max-repetitions.
    pub max_repetitions: i32,
    /// Variable bindings, in tree order for responses.
    pub varbinds: Vec<VarBind>,
}

impl Packet {
    /// Build a GET or GETNEXT query: one NULL binding per OID.
    pub fn request(
        version: Version,
        community: Bytes,
        pdu_type: PduType,
        request_id: i32,
        oids: &[Oid],
    ) -> Self {
        Self {
            version,
            community,
            pdu_type,
            request_id,
            error_status: 0,
            error_index: 0,
            non_repeaters: 0,
            max_repetitions: 0,
            varbinds: oids.iter().cloned().map(VarBind::null).collect(),
        }
    }

    /// Build a GETBULK query: one NULL binding per OID.
    pub fn get_bulk(
        version: Version,
        community: Bytes,
        request_id: i32,
        non_repeaters: i32,
        max_repetitions: i32,
        oids: &[Oid],
    ) -> Self {
        Self {
            non_repeaters,
            max_repetitions,
            ..Self::request(
                version,
                community,
                PduType::GetBulkRequest,
                request_id,
                oids,
            )
        }
    }

    /// Build a response.
    pub fn response(
        version: Version,
        community: Bytes,
        request_id: i32,
        varbinds: Vec<VarBind>,
    ) -> Self {
        Self {
            version,
            community,
            pdu_type: PduType::Response,
            request_id,
            error_status: 0,
            error_index: 0,
            non_repeaters: 0,
            max_repetitions: 0,
            varbinds,
        }
    }

    /// Set the error status and index (builder style).
    pub fn with_error(mut self, status: ErrorStatus, index: i32) -> Self {
        self.error_status = status.as_i32();
        self.error_index = index;
        self
    }

    /// Whether the agent reported an error.
    pub fn is_error(&self) -> bool {
        self.pdu_type == PduType::Response && self.error_status != 0
    }

    /// Error status as an enum.
    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }

    /// The binding the error index points at, if any.
    pub fn error_oid(&self) -> Option<&Oid> {
        (self.error_index as usize)
            .checked_sub(1)
            .and_then(|idx| self.varbinds.get(idx))
            .map(|vb| &vb.oid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::value::Value;

    #[test]
    fn test_request_uses_null_placeholders() {
        let packet = Packet::request(
            Version::V2c,
            Bytes::from_static(b"public"),
            PduType::GetRequest,
            7,
            &[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)],
        );
        assert_eq!(packet.varbinds.len(), 2);
        assert!(packet.varbinds.iter().all(|vb| vb.value == Value::Null));
        assert!(!packet.is_error());
    }

    #[test]
    fn test_error_oid_is_one_based() {
        let packet = Packet::response(
            Version::V1,
            Bytes::from_static(b"public"),
            1,
            vec![
                VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)),
                VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)),
            ],
        )
        .with_error(ErrorStatus::NoSuchName, 2);

        assert!(packet.is_error());
        assert_eq!(packet.error_status_enum(), ErrorStatus::NoSuchName);
        assert_eq!(packet.error_oid(), Some(&oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)));

        let pdu_level = packet.with_error(ErrorStatus::GenErr, 0);
        assert_eq!(pdu_level.error_oid(), None);
    }

    #[test]
    fn test_pdu_type_tags() {
        for pdu_type in [
            PduType::GetRequest,
            PduType::GetNextRequest,
            PduType::Response,
            PduType::GetBulkRequest,
        ] {
            assert_eq!(PduType::from_tag(pdu_type.tag()), Some(pdu_type));
        }
        assert_eq!(PduType::from_tag(0xA3), None);
    }
}
