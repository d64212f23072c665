//! Per-role resource reads (users, products, orders, appointments,
//! prescriptions, notifications).
//!
//! DESIGN
//! ======
//! Every list endpoint answers `{ "data": [...] }` (pagination keys beside
//! `data` are ignored). A body without that envelope is a typed
//! `ApiError::Decode`, never an empty list, so a contract drift on the API
//! side shows up as an error instead of a blank page.

#[cfg(test)]
#[path = "resources_test.rs"]
mod resources_test;

use std::fmt;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::ClinicApi;
use crate::error::ApiError;
use crate::role::Role;
use crate::types::{User, deserialize_id};

/// Resource collections exposed by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Users,
    Products,
    Orders,
    Appointments,
    Prescriptions,
    Notifications,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Users,
        ResourceKind::Products,
        ResourceKind::Orders,
        ResourceKind::Appointments,
        ResourceKind::Prescriptions,
        ResourceKind::Notifications,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Appointments => "appointments",
            Self::Prescriptions => "prescriptions",
            Self::Notifications => "notifications",
        }
    }

    /// Whether the endpoint is readable without a session.
    #[must_use]
    pub fn is_public(self) -> bool {
        matches!(self, Self::Products)
    }

    /// Endpoint path for `role`, `None` when the role has no view of it.
    #[must_use]
    pub fn endpoint(self, role: Option<Role>) -> Option<String> {
        match (self, role) {
            (Self::Products, _) => Some("/products".to_owned()),
            (Self::Notifications, Some(_)) => Some("/notifications".to_owned()),
            (Self::Users, Some(Role::Admin))
            | (Self::Orders, Some(Role::Admin | Role::Client))
            | (Self::Appointments, Some(_))
            | (Self::Prescriptions, Some(Role::Doctor | Role::Client)) => {
                role.map(|r| format!("/{}/{}", r.as_str(), self.as_str()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource: {0}")]
pub struct UnknownResource(pub String);

impl std::str::FromStr for ResourceKind {
    type Err = UnknownResource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownResource(s.to_owned()))
    }
}

/// A row type served by one resource endpoint.
pub trait Resource: DeserializeOwned {
    const KIND: ResourceKind;

    /// One-line human summary for list views.
    fn summary(&self) -> String;
}

#[derive(Deserialize)]
struct ListEnvelope<T> {
    data: Vec<T>,
}

/// Decode a list body strictly through its `{ "data": [...] }` envelope.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when the envelope or any row does not match.
pub fn decode_list<T: DeserializeOwned>(body: serde_json::Value) -> Result<Vec<T>, ApiError> {
    serde_json::from_value::<ListEnvelope<T>>(body)
        .map(|env| env.data)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Fetch the `R` list visible to `role`.
///
/// # Errors
///
/// Returns [`ApiError::Rejected`] with status 403 when `role` has no endpoint
/// for `R`, and any transport or decode failure from the API.
pub async fn fetch_list<R, A>(api: &A, role: Option<Role>, token: Option<&str>) -> Result<Vec<R>, ApiError>
where
    R: Resource,
    A: ClinicApi + ?Sized,
{
    let Some(path) = R::KIND.endpoint(role) else {
        return Err(ApiError::Rejected {
            status: 403,
            message: format!("{} are not available for this account", R::KIND),
        });
    };
    let token = if R::KIND.is_public() { None } else { token };
    let body = api.get_json(&path, token).await?;
    decode_list(body)
}

/// Fetch `kind` for `role` and render each row with [`Resource::summary`].
///
/// # Errors
///
/// Same as [`fetch_list`].
pub async fn fetch_summaries<A>(
    api: &A,
    kind: ResourceKind,
    role: Option<Role>,
    token: Option<&str>,
) -> Result<Vec<String>, ApiError>
where
    A: ClinicApi + ?Sized,
{
    fn summarize<R: Resource>(rows: Vec<R>) -> Vec<String> {
        rows.iter().map(Resource::summary).collect()
    }

    Ok(match kind {
        ResourceKind::Users => summarize(fetch_list::<User, A>(api, role, token).await?),
        ResourceKind::Products => summarize(fetch_list::<Product, A>(api, role, token).await?),
        ResourceKind::Orders => summarize(fetch_list::<Order, A>(api, role, token).await?),
        ResourceKind::Appointments => summarize(fetch_list::<Appointment, A>(api, role, token).await?),
        ResourceKind::Prescriptions => summarize(fetch_list::<Prescription, A>(api, role, token).await?),
        ResourceKind::Notifications => summarize(fetch_list::<Notification, A>(api, role, token).await?),
    })
}

// =============================================================================
// Row types
// =============================================================================

impl Resource for User {
    const KIND: ResourceKind = ResourceKind::Users;

    fn summary(&self) -> String {
        format!("#{} {} <{}> [{}]", self.id, self.name, self.email, self.role)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub price: f64,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Resource for Product {
    const KIND: ResourceKind = ResourceKind::Products;

    fn summary(&self) -> String {
        let brand = self.brand.as_deref().map(|b| format!(" ({b})")).unwrap_or_default();
        format!("#{} {}{} ${:.2}", self.id, self.name, brand, self.price)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    pub quantity: u32,
    #[serde(deserialize_with = "deserialize_amount")]
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub status: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub total: f64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Resource for Order {
    const KIND: ResourceKind = ResourceKind::Orders;

    fn summary(&self) -> String {
        format!("#{} {} ${:.2} ({} items)", self.id, self.status, self.total, self.items.len())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    pub status: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Resource for Appointment {
    const KIND: ResourceKind = ResourceKind::Appointments;

    fn summary(&self) -> String {
        let when = match &self.time {
            Some(t) => format!("{} {t}", self.date),
            None => self.date.clone(),
        };
        let who = [self.patient_name.as_deref(), self.doctor_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" / ");
        format!("#{} {when} [{}] {who}", self.id, self.status).trim_end().to_owned()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub issued_at: Option<String>,
    #[serde(default)]
    pub right_eye: Option<String>,
    #[serde(default)]
    pub left_eye: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Resource for Prescription {
    const KIND: ResourceKind = ResourceKind::Prescriptions;

    fn summary(&self) -> String {
        format!(
            "#{} {} OD {} OS {}",
            self.id,
            self.issued_at.as_deref().unwrap_or("-"),
            self.right_eye.as_deref().unwrap_or("-"),
            self.left_eye.as_deref().unwrap_or("-"),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Resource for Notification {
    const KIND: ResourceKind = ResourceKind::Notifications;

    fn summary(&self) -> String {
        let mark = if self.read { ' ' } else { '*' };
        match &self.title {
            Some(title) => format!("{mark} {title}: {}", self.message),
            None => format!("{mark} {}", self.message),
        }
    }
}

/// Decimal columns arrive as JSON numbers or as strings (`"199.00"`).
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| D::Error::custom("amount out of range")),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("invalid amount: {s:?}"))),
        other => Err(D::Error::custom(format!("expected amount, got {other}"))),
    }
}
