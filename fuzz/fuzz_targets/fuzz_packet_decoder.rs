#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use snmp_walker::codec::{BerCodec, Codec};

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);

    // Anything that decodes must encode again
    if let Ok(packet) = BerCodec.decode(bytes) {
        let _ = BerCodec.encode(&packet);
    }
});
