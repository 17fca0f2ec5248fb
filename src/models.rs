// ABOUTME: Shared data models for Parcel Tracker
// ABOUTME: The parcel record and the lifecycle statuses it moves through

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Status string for a parcel that has been registered but not yet sent
pub const PARCEL_STATUS_REGISTERED: &str = "registered";
/// Status string for a parcel in transit
pub const PARCEL_STATUS_SENT: &str = "sent";
/// Status string for a parcel that reached its address
pub const PARCEL_STATUS_DELIVERED: &str = "delivered";

/// A shipment record as stored in the `parcel` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    pub number: i64,
    pub client: i64,
    pub status: String,
    pub address: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Parcel {
    /// Build an unsaved parcel in the `registered` state, stamped with the current UTC time.
    /// `number` stays 0 until storage assigns one.
    pub fn registered(client: i64, address: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: PARCEL_STATUS_REGISTERED.to_string(),
            address: address.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Typed status, or `None` when the stored string is not a known lifecycle state
    pub fn status(&self) -> Option<ParcelStatus> {
        self.status.parse().ok()
    }
}

impl fmt::Display for Parcel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parcel #{}: client {}, address '{}', status {}, created {}",
            self.number, self.client, self.address, self.status, self.created_at
        )
    }
}

/// Lifecycle states a parcel moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParcelStatus {
    Registered,
    Sent,
    Delivered,
}

impl ParcelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ParcelStatus::Registered => PARCEL_STATUS_REGISTERED,
            ParcelStatus::Sent => PARCEL_STATUS_SENT,
            ParcelStatus::Delivered => PARCEL_STATUS_DELIVERED,
        }
    }

    /// The state that follows this one; `delivered` is terminal
    pub fn next(self) -> Option<ParcelStatus> {
        match self {
            ParcelStatus::Registered => Some(ParcelStatus::Sent),
            ParcelStatus::Sent => Some(ParcelStatus::Delivered),
            ParcelStatus::Delivered => None,
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown parcel status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ParcelStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PARCEL_STATUS_REGISTERED => Ok(ParcelStatus::Registered),
            PARCEL_STATUS_SENT => Ok(ParcelStatus::Sent),
            PARCEL_STATUS_DELIVERED => Ok(ParcelStatus::Delivered),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lifecycle() {
        assert_eq!(ParcelStatus::Registered.next(), Some(ParcelStatus::Sent));
        assert_eq!(ParcelStatus::Sent.next(), Some(ParcelStatus::Delivered));
        assert_eq!(ParcelStatus::Delivered.next(), None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("sent".parse::<ParcelStatus>(), Ok(ParcelStatus::Sent));
        assert_eq!(
            "lost".parse::<ParcelStatus>(),
            Err(UnknownStatus("lost".to_string()))
        );
    }

    #[test]
    fn test_registered_parcel() {
        let parcel = Parcel::registered(1000, "test");
        assert_eq!(parcel.number, 0);
        assert_eq!(parcel.status(), Some(ParcelStatus::Registered));
        assert!(chrono::DateTime::parse_from_rfc3339(&parcel.created_at).is_ok());
    }

    #[test]
    fn test_opaque_status_is_kept() {
        let parcel = Parcel {
            status: "returned".to_string(),
            ..Parcel::registered(1, "x")
        };
        assert_eq!(parcel.status(), None);
        assert_eq!(parcel.status, "returned");
    }
}
