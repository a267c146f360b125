//! Tags that appear in SNMPv1 and SNMPv2c community messages.
//!
//! Every tag here fits in a single identifier octet: class in the top two
//! bits, the constructed flag in bit 5 and the tag number below it.

/// Class bits of the context-specific tags used for PDUs and exceptions.
pub mod class {
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
}

/// Set on SEQUENCE and on every PDU tag.
pub const CONSTRUCTED: u8 = 0x20;

/// ASN.1 universal types carried in messages and bindings.
pub mod universal {
    pub const INTEGER: u8 = 0x02;
    pub const OCTET_STRING: u8 = 0x04;
    /// Segmented OCTET STRING; agents never send it and the decoder refuses it
    pub const OCTET_STRING_CONSTRUCTED: u8 = 0x24;
    pub const NULL: u8 = 0x05;
    pub const OBJECT_IDENTIFIER: u8 = 0x06;
    pub const SEQUENCE: u8 = 0x30;
}

/// SMI application types a walk can return.
pub mod application {
    pub const IP_ADDRESS: u8 = 0x40;
    pub const COUNTER32: u8 = 0x41;
    /// Gauge32, which is also Unsigned32
    pub const GAUGE32: u8 = 0x42;
    pub const TIMETICKS: u8 = 0x43;
    pub const OPAQUE: u8 = 0x44;
    /// v2c only
    pub const COUNTER64: u8 = 0x46;
}

/// v2c exception markers that take the place of a value.
///
/// `END_OF_MIB_VIEW` is the sentinel that ends a walk.
pub mod context {
    pub const NO_SUCH_OBJECT: u8 = 0x80;
    pub const NO_SUCH_INSTANCE: u8 = 0x81;
    pub const END_OF_MIB_VIEW: u8 = 0x82;
}

/// PDUs a read-only manager sends or receives.
pub mod pdu {
    use super::CONSTRUCTED;
    use super::class::CONTEXT_SPECIFIC;

    pub const GET_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED;
    pub const GET_NEXT_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x01;
    pub const RESPONSE: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x02;
    /// v2c only; v1 has no bulk retrieval
    pub const GET_BULK_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x05;
}
