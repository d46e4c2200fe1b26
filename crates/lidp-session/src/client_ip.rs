//! Coarse client address extraction.
//!
//! Sessions are bound to the address the user authenticated from. This only
//! catches gross client changes, such as a cookie replayed from another
//! network; it is not an authorization control.

use std::net::{IpAddr, SocketAddr};

/// Derives the client IP from a transport-level remote address.
///
/// Accepts `ip:port`, `[ipv6]:port`, a bare IP, or a bracketed IPv6 address.
/// IPv4-mapped IPv6 addresses are reported as IPv4.
#[must_use]
pub fn client_ip(remote_addr: &str) -> Option<IpAddr> {
    let addr = remote_addr.trim();

    if let Ok(socket) = addr.parse::<SocketAddr>() {
        return Some(socket.ip().to_canonical());
    }
    if let Ok(ip) = addr.parse::<IpAddr>() {
        return Some(ip.to_canonical());
    }

    let host = match addr.strip_prefix('[') {
        Some(rest) => rest.split_once(']').map(|(host, _)| host)?,
        None => addr.rsplit_once(':').map(|(host, _)| host)?,
    };
    host.parse::<IpAddr>().ok().map(|ip| ip.to_canonical())
}

/// Checks that a recorded client address matches the current one.
///
/// An unknown address on either side never matches.
#[must_use]
pub fn same_client(recorded: Option<IpAddr>, current: Option<IpAddr>) -> bool {
    match (recorded, current) {
        (Some(recorded), Some(current)) => recorded.to_canonical() == current.to_canonical(),
        _ => false,
    }
}
