//! User roles and their home routes.

#[cfg(test)]
#[path = "role_test.rs"]
mod role_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Portal a user is entitled to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Client,
}

impl Role {
    /// Every role, in portal order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Doctor, Role::Client];

    /// Wire name of the role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::Client => "client",
        }
    }

    /// Landing route after login for this role.
    #[must_use]
    pub fn home_route(self) -> &'static str {
        match self {
            Self::Admin => "/admin/dashboard",
            Self::Doctor => "/doctor/dashboard",
            Self::Client => "/client/dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role string is not one of `admin`, `doctor`, `client`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "doctor" => Ok(Self::Doctor),
            "client" => Ok(Self::Client),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}
