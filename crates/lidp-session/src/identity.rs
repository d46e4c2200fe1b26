//! Authenticated identity records.
//!
//! The protocol layer owns the identity record. This layer only needs to
//! persist it and read back the client address it was issued to.

use std::collections::HashMap;
use std::net::IpAddr;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// An identity record that can be bound to a session.
pub trait BoundIdentity: Serialize + DeserializeOwned + Send + Sync {
    /// Human-readable name used in log messages.
    fn display_name(&self) -> &str;

    /// Client address recorded when the user authenticated.
    fn client_ip(&self) -> Option<IpAddr>;
}

/// A user who completed authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Subject name.
    pub name: String,
    /// Name identifier format (for example a SAML NameID format URI).
    #[serde(default)]
    pub format: String,
    /// Authentication context the user satisfied.
    #[serde(default)]
    pub context: String,
    /// Client address at authentication time.
    pub ip: Option<IpAddr>,
    /// Additional attributes; multi-valued.
    #[serde(default)]
    pub attributes: HashMap<String, Vec<String>>,
}

impl AuthenticatedUser {
    /// Creates a user authenticated from `ip`.
    #[must_use]
    pub fn new(name: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            name: name.into(),
            format: String::new(),
            context: String::new(),
            ip: Some(ip),
            attributes: HashMap::new(),
        }
    }

    /// Get a single-valued attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Set a single-valued attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), vec![value.into()]);
    }
}

impl BoundIdentity for AuthenticatedUser {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn client_ip(&self) -> Option<IpAddr> {
        self.ip
    }
}
