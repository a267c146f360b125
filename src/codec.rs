//! Packet codec.
//!
//! The session never touches bytes directly: it hands a [`Packet`] to a
//! [`Codec`] and gets bytes back, and the reverse for responses. [`BerCodec`]
//! is the community-based message format:
//!
//! ```text
//! SEQUENCE {
//!     version    INTEGER,
//!     community  OCTET STRING,
//!     pdu        [PDU type] IMPLICIT SEQUENCE {
//!         request-id, error-status, error-index, variable-bindings
//!     }
//! }
//! ```

use bytes::Bytes;

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, EncodeErrorKind, Error, Result};
use crate::packet::{Packet, PduType};
use crate::varbind::{decode_varbind_list, encode_varbind_list};
use crate::version::Version;

/// Converts packets to and from their wire form.
pub trait Codec: Send + Sync {
    /// Serialize a packet.
    fn encode(&self, packet: &Packet) -> Result<Bytes>;

    /// Parse a packet.
    fn decode(&self, data: Bytes) -> Result<Packet>;
}

/// BER codec for SNMPv1/v2c community messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct BerCodec;

impl BerCodec {
    fn check(packet: &Packet) -> Result<()> {
        if packet.pdu_type == PduType::GetBulkRequest && !packet.version.supports_get_bulk() {
            return Err(Error::encode(EncodeErrorKind::GetBulkInV1));
        }
        if packet.varbinds.iter().any(|vb| !vb.oid.is_encodable()) {
            return Err(Error::encode(EncodeErrorKind::UnencodableOid));
        }
        Ok(())
    }
}

impl Codec for BerCodec {
    fn encode(&self, packet: &Packet) -> Result<Bytes> {
        Self::check(packet)?;

        let (status_slot, index_slot) = match packet.pdu_type {
            PduType::GetBulkRequest => (packet.non_repeaters, packet.max_repetitions),
            _ => (packet.error_status, packet.error_index),
        };

        let mut buf = EncodeBuf::new();
        buf.push_sequence(|buf| {
            buf.push_constructed(packet.pdu_type.tag(), |buf| {
                encode_varbind_list(buf, &packet.varbinds);
                buf.push_integer(index_slot);
                buf.push_integer(status_slot);
                buf.push_integer(packet.request_id);
            });
            buf.push_octet_string(&packet.community);
            buf.push_integer(packet.version.as_i32());
        });
        Ok(buf.finish())
    }

    fn decode(&self, data: Bytes) -> Result<Packet> {
        let mut decoder = Decoder::new(data);
        let mut seq = decoder.read_sequence()?;

        let version_offset = seq.offset();
        let raw_version = seq.read_integer()?;
        let version = Version::from_i32(raw_version).ok_or_else(|| {
            Error::decode(version_offset, DecodeErrorKind::UnknownVersion(raw_version))
        })?;

        let community = seq.read_octet_string()?;

        let pdu_offset = seq.offset();
        let pdu_tag = seq
            .peek_tag()
            .ok_or_else(|| Error::decode(pdu_offset, DecodeErrorKind::TruncatedData))?;
        let pdu_type = PduType::from_tag(pdu_tag)
            .ok_or_else(|| Error::decode(pdu_offset, DecodeErrorKind::UnknownPduType(pdu_tag)))?;

        let mut pdu = seq.read_constructed(pdu_tag)?;
        let request_id = pdu.read_integer()?;
        let status_slot = pdu.read_integer()?;
        let index_slot = pdu.read_integer()?;
        let varbinds = decode_varbind_list(&mut pdu)?;

        let mut packet = Packet {
            version,
            community,
            pdu_type,
            request_id,
            error_status: 0,
            error_index: 0,
            non_repeaters: 0,
            max_repetitions: 0,
            varbinds,
        };
        if pdu_type == PduType::GetBulkRequest {
            packet.non_repeaters = status_slot;
            packet.max_repetitions = index_slot;
        } else {
            packet.error_status = status_slot;
            packet.error_index = index_slot;
        }
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorStatus;
    use crate::oid;
    use crate::oid::Oid;
    use crate::value::Value;
    use crate::varbind::VarBind;

    fn community() -> Bytes {
        Bytes::from_static(b"public")
    }

    #[test]
    fn test_get_next_wire_form() {
        let packet = Packet::request(
            Version::V2c,
            community(),
            PduType::GetNextRequest,
            1,
            &[oid!(1, 3, 6, 1)],
        );
        let bytes = BerCodec.encode(&packet).unwrap();

        #[rustfmt::skip]
        let expected: &[u8] = &[
            0x30, 0x21,
                0x02, 0x01, 0x01,
                0x04, 0x06, b'p', b'u', b'b', b'l', b'i', b'c',
                0xA1, 0x14,
                    0x02, 0x01, 0x01,
                    0x02, 0x01, 0x00,
                    0x02, 0x01, 0x00,
                    0x30, 0x09,
                        0x30, 0x07, 0x06, 0x03, 0x2B, 0x06, 0x01, 0x05, 0x00,
        ];
        assert_eq!(&bytes[..], expected);
    }

    #[test]
    fn test_configured_version_on_wire() {
        let packet = Packet::request(
            Version::V1,
            community(),
            PduType::GetRequest,
            9,
            &[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)],
        );
        let bytes = BerCodec.encode(&packet).unwrap();
        // SEQUENCE header, then INTEGER 0
        assert_eq!(&bytes[2..5], &[0x02, 0x01, 0x00]);
    }

    #[test]
    fn test_get_bulk_slots() {
        let packet = Packet::get_bulk(
            Version::V2c,
            community(),
            42,
            0,
            10,
            &[oid!(1, 3, 6, 1, 2, 1, 2)],
        );
        let bytes = BerCodec.encode(&packet).unwrap();
        let decoded = BerCodec.decode(bytes).unwrap();

        assert_eq!(decoded.pdu_type, PduType::GetBulkRequest);
        assert_eq!(decoded.non_repeaters, 0);
        assert_eq!(decoded.max_repetitions, 10);
        assert_eq!(decoded.error_status, 0);
        assert_eq!(decoded, packet);
    }

    #[test]
    fn test_get_bulk_rejected_in_v1() {
        let packet = Packet::get_bulk(Version::V1, community(), 1, 0, 10, &[oid!(1, 3, 6, 1)]);
        let err = BerCodec.encode(&packet).unwrap_err();
        assert!(matches!(
            err,
            Error::Encode {
                kind: EncodeErrorKind::GetBulkInV1
            }
        ));
    }

    #[test]
    fn test_unencodable_oid_rejected() {
        let packet = Packet::request(
            Version::V2c,
            community(),
            PduType::GetRequest,
            1,
            &[Oid::from_slice(&[1])],
        );
        assert!(matches!(
            BerCodec.encode(&packet),
            Err(Error::Encode {
                kind: EncodeErrorKind::UnencodableOid
            })
        ));
    }

    #[test]
    fn test_response_with_error_decodes() {
        let response = Packet::response(
            Version::V1,
            community(),
            77,
            vec![VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0))],
        )
        .with_error(ErrorStatus::NoSuchName, 1);

        let decoded = BerCodec.decode(BerCodec.encode(&response).unwrap()).unwrap();
        assert_eq!(decoded.request_id, 77);
        assert_eq!(decoded.error_status_enum(), ErrorStatus::NoSuchName);
        assert_eq!(decoded.error_index, 1);
        assert_eq!(decoded.version, Version::V1);
    }

    #[test]
    fn test_response_values_decode() {
        let response = Packet::response(
            Version::V2c,
            community(),
            3,
            vec![
                VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("Linux")),
                VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(123)),
                VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 4, 0), Value::EndOfMibView),
            ],
        );
        let decoded = BerCodec.decode(BerCodec.encode(&response).unwrap()).unwrap();
        assert_eq!(decoded.varbinds, response.varbinds);
    }

    #[test]
    fn test_decode_unknown_version() {
        // version 3 in an otherwise community-shaped message
        let data = Bytes::from_static(&[
            0x30, 0x12, 0x02, 0x01, 0x03, 0x04, 0x00, 0xA2, 0x0B, 0x02, 0x01, 0x01, 0x02, 0x01,
            0x00, 0x02, 0x01, 0x00, 0x30, 0x00,
        ]);
        assert!(matches!(
            BerCodec.decode(data),
            Err(Error::Decode {
                kind: DecodeErrorKind::UnknownVersion(3),
                offset: 2,
            })
        ));
    }

    #[test]
    fn test_decode_unknown_pdu_type() {
        // Trap PDU (0xA4) is not understood
        let data = Bytes::from_static(&[
            0x30, 0x0C, 0x02, 0x01, 0x01, 0x04, 0x00, 0xA4, 0x05, 0x02, 0x01, 0x01, 0x30, 0x00,
        ]);
        assert!(matches!(
            BerCodec.decode(data),
            Err(Error::Decode {
                kind: DecodeErrorKind::UnknownPduType(0xA4),
                offset: 7,
            })
        ));
    }

    #[test]
    fn test_decode_truncated() {
        let packet = Packet::request(
            Version::V2c,
            community(),
            PduType::GetRequest,
            1,
            &[oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)],
        );
        let bytes = BerCodec.encode(&packet).unwrap();
        let truncated = bytes.slice(..bytes.len() - 3);
        assert!(matches!(
            BerCodec.decode(truncated),
            Err(Error::Decode { .. })
        ));
    }
}
