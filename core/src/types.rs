//! Domain DTOs for the admin API.
//!
//! # Design
//! Decoding is lenient where the backend is known to drift: identifiers may
//! be numbers or strings, roles may be an id or an embedded object, prices
//! may arrive as numeric strings. Request payloads use the backend's exact
//! field names, including the camel-cased `numberPhone`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Record identifier, kept in the textual form used in paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for Id {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(serde_json::Number),
            Text(String),
        }
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Id(integral(&n).unwrap_or_else(|| n.to_string())),
            Raw::Text(s) => Id(s),
        })
    }
}

/// `7.0` and `7` name the same record.
fn integral(n: &serde_json::Number) -> Option<String> {
    if let Some(n) = n.as_u64() {
        return Some(n.to_string());
    }
    if let Some(n) = n.as_i64() {
        return Some(n.to_string());
    }
    n.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| format!("{f:.0}"))
}

/// Built-in roles by numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Staff,
    Customer,
}

impl Role {
    /// Unknown ids fall back to `Customer`.
    pub fn from_id(id: u64) -> Self {
        match id {
            1 => Role::Admin,
            2 => Role::Staff,
            _ => Role::Customer,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Role::Admin => 1,
            Role::Staff => 2,
            Role::Customer => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Staff => "Staff",
            Role::Customer => "User",
        }
    }
}

/// A role as the backend sends it: an id, a numeric string, or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleRef {
    Id(u64),
    Code(String),
    Object {
        id: Id,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl RoleRef {
    pub fn role(&self) -> Role {
        let id = match self {
            RoleRef::Id(id) => Some(*id),
            RoleRef::Code(code) => code.trim().parse().ok(),
            RoleRef::Object { id, .. } => id.as_str().parse().ok(),
        };
        id.map(Role::from_id).unwrap_or(Role::Customer)
    }
}

fn default_active() -> bool {
    true
}

/// An account as listed by `GET /admin-user/get-admin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "UserWire")]
pub struct User {
    pub id: Id,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<RoleRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleRef>,
    pub is_active: bool,
}

/// Both spellings of a field may be present; the snake-cased one wins.
#[derive(Deserialize)]
struct UserWire {
    id: Id,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default, rename = "numberPhone")]
    number_phone: Option<String>,
    #[serde(default)]
    role_id: Option<RoleRef>,
    #[serde(default)]
    role: Option<RoleRef>,
    #[serde(default = "default_active")]
    is_active: bool,
}

impl From<UserWire> for User {
    fn from(wire: UserWire) -> Self {
        Self {
            id: wire.id,
            full_name: wire.full_name.or(wire.name).unwrap_or_default(),
            email: wire.email.unwrap_or_default(),
            phone_number: wire.phone_number.or(wire.number_phone),
            role_id: wire.role_id,
            role: wire.role,
            is_active: wire.is_active,
        }
    }
}

impl User {
    /// `role_id` first, then an embedded `role`, else customer.
    pub fn role(&self) -> Role {
        self.role_id
            .as_ref()
            .or(self.role.as_ref())
            .map(RoleRef::role)
            .unwrap_or(Role::Customer)
    }
}

/// Payload for `PUT /admin-user/update-admin/{id}`. Server-owned fields
/// (id, password hash, timestamps, OTP state, avatar) are never sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub role_id: u8,
    pub is_active: bool,
}

impl From<&User> for UpdateUser {
    fn from(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone().unwrap_or_default(),
            role_id: user.role().id(),
            is_active: user.is_active,
        }
    }
}

/// Payload for `PATCH /admin-user/toggle-admin/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleStatus {
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CategoryWire")]
pub struct Category {
    pub id: Id,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,
}

#[derive(Deserialize)]
struct CategoryWire {
    id: Id,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    item_count: Option<u64>,
    #[serde(default, rename = "itemCount", deserialize_with = "lenient_count")]
    item_count_camel: Option<u64>,
}

impl From<CategoryWire> for Category {
    fn from(wire: CategoryWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            description: wire.description.unwrap_or_default(),
            item_count: wire.item_count.or(wire.item_count_camel),
        }
    }
}

/// Payload for creating or updating a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Minutes.
    #[serde(default, deserialize_with = "lenient_count", skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Payload for creating or updating a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Id>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Null,
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Raw::Null => Ok(0.0),
    }
}

/// A count that may arrive as a number, a numeric string, or null.
/// Anything unreadable or out of range reads as absent.
fn lenient_count<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Float(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }
    let count = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(n)) => Some(n),
        Some(Raw::Float(f)) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Some(f as u64),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(count.and_then(|n| T::try_from(n).ok()))
}

// Auth payloads

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    #[serde(rename = "numberPhone")]
    pub number_phone: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(rename = "numberPhone")]
    pub number_phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest {
    pub otp: String,
    #[serde(rename = "numberPhone")]
    pub number_phone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyResetOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    pub reset_token: String,
    pub new_password: String,
}

/// The access token of a login or verify response, wherever it was put.
pub fn extract_token(response: &serde_json::Value) -> Option<String> {
    find_string(response, &["access_token", "token"])
}

/// The reset token of a verify-reset-otp response.
pub fn extract_reset_token(response: &serde_json::Value) -> Option<String> {
    find_string(response, &["reset_token"])
}

fn find_string(response: &serde_json::Value, keys: &[&str]) -> Option<String> {
    [Some(response), response.get("data")]
        .into_iter()
        .flatten()
        .flat_map(|scope| keys.iter().filter_map(move |key| scope.get(*key)))
        .filter_map(|value| value.as_str())
        .find(|token| !token.is_empty())
        .map(str::to_string)
}
