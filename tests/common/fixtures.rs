//! Common test fixtures and constants.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use bytes::Bytes;
use snmp_walker::{Oid, Value, oid};

// =============================================================================
// Standard system MIB OIDs (1.3.6.1.2.1.1.*)
// =============================================================================

pub fn sys_descr() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
}
pub fn sys_object_id() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 2, 0)
}
pub fn sys_uptime() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 3, 0)
}
pub fn sys_contact() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 4, 0)
}
pub fn sys_name() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)
}
pub fn sys_location() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 6, 0)
}
pub fn sys_services() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1, 7, 0)
}

// =============================================================================
// Subtree roots (for walks)
// =============================================================================

/// System subtree root: 1.3.6.1.2.1.1
pub fn system_subtree() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 1)
}

/// Interfaces subtree root: 1.3.6.1.2.1.2
pub fn interfaces_subtree() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2)
}

/// ifDescr column: 1.3.6.1.2.1.2.2.1.2
pub fn if_descr_column() -> Oid {
    oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2)
}

/// Nonexistent OID for testing NoSuchObject and empty walks
pub fn nonexistent_oid() -> Oid {
    oid!(1, 3, 6, 1, 99, 99, 99, 0)
}

/// Read-only community used by every test agent.
pub const COMMUNITY_RO: &[u8] = b"public";

/// Number of rows in the sample interface table.
pub const IF_COUNT: u32 = 4;

// =============================================================================
// Sample trees
// =============================================================================

/// The system group on its own.
pub fn system_tree() -> BTreeMap<Oid, Value> {
    BTreeMap::from([
        (sys_descr(), Value::from("Linux core-sw 6.1.0 x86_64")),
        (
            sys_object_id(),
            Value::ObjectIdentifier(oid!(1, 3, 6, 1, 4, 1, 8072, 3, 2, 10)),
        ),
        (sys_uptime(), Value::TimeTicks(123_456)),
        (sys_contact(), Value::from("noc@example.net")),
        (sys_name(), Value::from("core-sw")),
        (sys_location(), Value::from("rack 12")),
        (sys_services(), Value::Integer(72)),
    ])
}

/// The system group, an interface table and a trailing enterprise object.
///
/// The interface table has [`IF_COUNT`] rows with ifIndex, ifDescr, ifType
/// and ifPhysAddress columns.
pub fn sample_tree() -> BTreeMap<Oid, Value> {
    let mut tree = system_tree();
    tree.insert(oid!(1, 3, 6, 1, 2, 1, 2, 1, 0), Value::Integer(IF_COUNT as i32));
    for i in 1..=IF_COUNT {
        let entry = oid!(1, 3, 6, 1, 2, 1, 2, 2, 1);
        tree.insert(entry.child(1).child(i), Value::Integer(i as i32));
        tree.insert(entry.child(2).child(i), Value::from(format!("eth{}", i - 1).as_str()));
        tree.insert(entry.child(3).child(i), Value::Integer(6));
        tree.insert(
            entry.child(6).child(i),
            Value::OctetString(Bytes::from(vec![0x00, 0x1A, 0x2B, 0x3C, 0x4D, i as u8])),
        );
    }
    tree.insert(
        oid!(1, 3, 6, 1, 2, 1, 4, 20, 1, 1, 10, 0, 0, 1),
        Value::IpAddress(Ipv4Addr::new(10, 0, 0, 1).octets()),
    );
    tree.insert(oid!(1, 3, 6, 1, 4, 1, 8072, 1, 1, 0), Value::Counter64(u64::MAX));
    tree
}

/// Entries of `tree` under `root`, in tree order.
pub fn subtree(tree: &BTreeMap<Oid, Value>, root: &Oid) -> Vec<(Oid, Value)> {
    tree.iter()
        .filter(|(oid, _)| oid.starts_with(root) && *oid != root)
        .map(|(oid, value)| (oid.clone(), value.clone()))
        .collect()
}
