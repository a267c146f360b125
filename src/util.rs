//! Internal utilities.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

/// Bind an ephemeral UDP socket in the address family of `target`.
///
/// IPv6 sockets are dual-stack (`IPV6_V6ONLY = false`) so that v4-mapped
/// targets work as well.
pub(crate) fn bind_ephemeral_udp_socket(target: SocketAddr) -> io::Result<UdpSocket> {
    let (domain, bind_addr) = if target.is_ipv6() {
        (
            Domain::IPV6,
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        )
    } else {
        (
            Domain::IPV4,
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
        )
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;

    if target.is_ipv6() {
        socket.set_only_v6(false)?;
    }

    // Set non-blocking before converting to tokio socket
    socket.set_nonblocking(true)?;
    socket.bind(&bind_addr.into())?;

    UdpSocket::from_std(socket.into())
}

/// Append `port` to a target that does not carry one.
///
/// Accepts `host`, `host:port`, `a.b.c.d`, `a.b.c.d:port`, `[v6]`,
/// `[v6]:port` and bare IPv6 literals such as `::1`.
pub(crate) fn with_default_port(target: &str, port: u16) -> String {
    if target.parse::<SocketAddr>().is_ok() {
        return target.to_string();
    }
    if let Ok(ip) = target.parse::<IpAddr>() {
        return SocketAddr::new(ip, port).to_string();
    }
    if let Some(inner) = target.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return format!("[{}]:{}", inner, port);
    }
    if target.contains(':') {
        target.to_string()
    } else {
        format!("{}:{}", target, port)
    }
}

/// Lowercase hex encoding for display purposes.
pub(crate) fn encode_hex(data: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_appended() {
        assert_eq!(with_default_port("10.0.0.1", 161), "10.0.0.1:161");
        assert_eq!(with_default_port("router.lan", 161), "router.lan:161");
        assert_eq!(with_default_port("::1", 161), "[::1]:161");
        assert_eq!(with_default_port("[fe80::1]", 161), "[fe80::1]:161");
    }

    #[test]
    fn test_explicit_port_kept() {
        assert_eq!(with_default_port("10.0.0.1:1161", 161), "10.0.0.1:1161");
        assert_eq!(with_default_port("router.lan:1161", 161), "router.lan:1161");
        assert_eq!(with_default_port("[::1]:1161", 161), "[::1]:1161");
    }

    #[test]
    fn test_encode_hex() {
        assert_eq!(encode_hex(&[0x00, 0xAB, 0xFF]), "00abff");
        assert_eq!(encode_hex(&[]), "");
    }

    #[tokio::test]
    async fn test_bind_ephemeral_ipv4() {
        let target: SocketAddr = "127.0.0.1:161".parse().unwrap();
        let socket = bind_ephemeral_udp_socket(target).unwrap();
        let local = socket.local_addr().unwrap();
        assert!(local.is_ipv4());
        assert_ne!(local.port(), 0);
    }
}
