#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_walker::oid::Oid;

fuzz_target!(|data: &[u8]| {
    if let Ok(oid) = Oid::from_ber(data)
        && oid.is_encodable()
    {
        let _ = Oid::from_ber(&oid.to_ber());
    }

    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(oid) = Oid::parse(s)
    {
        // Display output always parses back to the same OID
        assert_eq!(Oid::parse(&oid.to_string()).ok(), Some(oid));
    }
});
