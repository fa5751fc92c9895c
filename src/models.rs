//! Entity shapes and request payloads, serialized camelCase for the
//! dashboard frontend.
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    Critical,
    Stable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalStatus {
    Open,
    Investigating,
    Resolved,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneCategory {
    Safety,
    IT,
    Facilities,
    General,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    Admin,
    Student,
    Management,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Admin => "Admin",
            UserType::Student => "Student",
            UserType::Management => "Management",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub id: String,
    pub title: String,
    pub category: String,
    pub location: String,
    /// ISO or relative string, `"Just now"` for fresh records.
    pub timestamp: String,
    pub risk_level: RiskLevel,
    pub description: String,
    pub status: SignalStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub category: ZoneCategory,
    pub risk_level: RiskLevel,
    /// Denormalized display counter, maintained by hand rather than derived
    /// from the signals collection.
    pub signal_count: u32,
    /// Percentage placement fallback for the map view.
    pub coordinates: Coordinates,
    /// Real `[lat, lng]` coordinates.
    pub lat_lng: [f64; 2],
    pub details: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub role: String,
    pub avatar: String,
    pub email: String,
    pub department: String,
    pub id_string: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub time: String,
    pub read: bool,
}

/// Derived on every read, never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub health_score: i64,
    pub active_signals: usize,
    pub trend: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalCreate {
    pub title: String,
    pub category: String,
    pub location: String,
    pub risk_level: RiskLevel,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SignalStatusUpdate {
    pub status: SignalStatus,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationCreate {
    pub title: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NotificationReadUpdate {
    #[serde(default = "default_read")]
    pub read: bool,
}

fn default_read() -> bool {
    true
}
