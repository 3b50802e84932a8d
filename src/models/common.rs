use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Record identifier assigned by storage. Starts at 1 per collection.
pub type Id = i64;

/// Calendar day stored as `YYYY-MM-DD`.
///
/// Accepts either a plain date or an RFC 3339 timestamp on input; timestamps
/// are reduced to their UTC calendar day, so two values are equal exactly when
/// they fall on the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(pub NaiveDate);

impl Day {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Some(Day(date));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .map(|dt| Day(dt.with_timezone(&Utc).date_naive()))
    }

    pub fn today() -> Self {
        Day(Utc::now().date_naive())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Day::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid date '{}', expected YYYY-MM-DD or RFC 3339", raw))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    SchoolAdmin,
    Teacher,
    Student,
    Parent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::SchoolAdmin => "school_admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
            Role::Parent => "parent",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "super_admin" => Some(Role::SuperAdmin),
            "school_admin" => Some(Role::SchoolAdmin),
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            "parent" => Some(Role::Parent),
            _ => None,
        }
    }
}

/// Who a message is addressed to: one role, or everybody in the school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    All,
    SuperAdmin,
    SchoolAdmin,
    Teacher,
    Student,
    Parent,
}

impl From<Role> for Audience {
    fn from(role: Role) -> Self {
        match role {
            Role::SuperAdmin => Audience::SuperAdmin,
            Role::SchoolAdmin => Audience::SchoolAdmin,
            Role::Teacher => Audience::Teacher,
            Role::Student => Audience::Student,
            Role::Parent => Audience::Parent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeFrequency {
    Monthly,
    Quarterly,
    HalfYearly,
    Annually,
    OneTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Pending,
    Partial,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Paid,
    Unpaid,
    Overdue,
}
