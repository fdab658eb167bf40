use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ShiftType {
    #[serde(rename = "Day Shift")]
    Day,
    #[serde(rename = "Evening Shift")]
    Evening,
    #[serde(rename = "Night Shift")]
    Night,
}

impl ShiftType {
    pub const ALL: [ShiftType; 3] = [ShiftType::Day, ShiftType::Evening, ShiftType::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Day => "Day Shift",
            ShiftType::Evening => "Evening Shift",
            ShiftType::Night => "Night Shift",
        }
    }
}

impl TryFrom<&str> for ShiftType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Day Shift" => Ok(ShiftType::Day),
            "Evening Shift" => Ok(ShiftType::Evening),
            "Night Shift" => Ok(ShiftType::Night),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Staff,
    Manager,
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Staff
    }
}

impl UserRole {
    /// Schema editing is restricted to managers and admins. A profile with
    /// no role at all reads as Staff and gets no access.
    pub fn can_edit_schema(&self) -> bool {
        matches!(self, UserRole::Manager | UserRole::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Staff => "staff",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }
}

/// Cached mirror of the identity provider's account record. The identity
/// provider is the source of truth; this document only exists so reports can
/// resolve a submitter display name without another provider round-trip.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "photoURL")]
    pub photo_url: String,
    #[serde(default)]
    pub role: UserRole,
}

/// One dynamic answer. Untagged so JSON booleans stay booleans, integers
/// stay integers and strings stay strings across a store round-trip.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// One submitted shift report. Dynamic answers are flattened into the same
/// document, keyed by field id. Historical reports may carry answer keys
/// that no longer exist in the active schema, or lack keys added later;
/// readers treat a missing key as absent, never as an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReport {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub shift_type: ShiftType,
    pub house: String,
    pub patient_name: String,
    pub shift_date: NaiveDate,
    #[serde(default)]
    pub educator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub incident_status: bool,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub answers: BTreeMap<String, FieldValue>,
}

impl ShiftReport {
    /// Sort key for "newest submitted first" orderings: submission time,
    /// falling back to the start of the shift date when a legacy report
    /// carries no timestamp.
    pub fn submitted_sort_key(&self) -> DateTime<Utc> {
        self.submitted_at.unwrap_or_else(|| {
            self.shift_date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or_else(Utc::now)
        })
    }
}
