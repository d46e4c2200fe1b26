//! HTTP seams: reading cookies and the remote address, setting cookies.
//!
//! The session layer never touches headers, bodies, or routing beyond these
//! primitives. Adapters for `axum::http` types are provided; other stacks
//! implement [`ClientRequest`] and [`ClientResponse`] themselves.

use std::fmt;
use std::net::SocketAddr;

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};
use tracing::warn;

/// Read access to an inbound request.
pub trait ClientRequest {
    /// Value of the named cookie, if the request carries one.
    fn cookie(&self, name: &str) -> Option<String>;

    /// Transport-level source address, usually `ip:port`.
    fn remote_addr(&self) -> String;
}

/// Write access to an outbound response.
pub trait ClientResponse {
    /// Adds a `Set-Cookie` to the response.
    fn set_cookie(&mut self, cookie: &Cookie);
}

/// A cookie issued by this layer.
///
/// Always `HttpOnly`, `Secure`, scoped to `/`, and without an expiry
/// attribute; lifetime is governed by the store TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value (an opaque identifier).
    pub value: String,
}

impl Cookie {
    /// Creates a cookie.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path=/; HttpOnly; Secure", self.name, self.value)
    }
}

/// An `axum::http` request view: headers plus the peer address.
#[derive(Debug, Clone, Copy)]
pub struct HttpRequest<'a> {
    headers: &'a HeaderMap,
    remote_addr: SocketAddr,
}

impl<'a> HttpRequest<'a> {
    /// Wraps request headers and the connection's peer address.
    #[must_use]
    pub const fn new(headers: &'a HeaderMap, remote_addr: SocketAddr) -> Self {
        Self {
            headers,
            remote_addr,
        }
    }
}

impl ClientRequest for HttpRequest<'_> {
    fn cookie(&self, name: &str) -> Option<String> {
        cookie_value(self.headers, name)
    }

    fn remote_addr(&self) -> String {
        self.remote_addr.to_string()
    }
}

impl ClientResponse for HeaderMap {
    fn set_cookie(&mut self, cookie: &Cookie) {
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                self.append(SET_COOKIE, value);
            }
            Err(err) => {
                warn!(cookie = %cookie.name, error = %err, "Cookie value is not a valid header");
            }
        }
    }
}

/// Finds a cookie in the `Cookie` headers.
///
/// Empty values are treated as absent.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
