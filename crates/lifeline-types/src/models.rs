use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// True iff both components are within the valid WGS84 ranges.
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Lifecycle of an emergency record. Created `Active`; the owner may flip it
/// to `Resolved` (and back). No history of prior statuses is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyStatus {
    Active,
    Resolved,
}

impl EmergencyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
        }
    }
}

impl FromStr for EmergencyStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "resolved" => Ok(Self::Resolved),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EmergencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_range_check() {
        assert!(Point::new(0.0, 0.0).in_range());
        assert!(Point::new(-90.0, 180.0).in_range());
        assert!(!Point::new(90.1, 0.0).in_range());
        assert!(!Point::new(0.0, -180.5).in_range());
    }

    #[test]
    fn status_round_trip() {
        assert_eq!("active".parse::<EmergencyStatus>(), Ok(EmergencyStatus::Active));
        assert_eq!("resolved".parse::<EmergencyStatus>(), Ok(EmergencyStatus::Resolved));
        assert!("closed".parse::<EmergencyStatus>().is_err());
        assert_eq!(EmergencyStatus::Active.as_str(), "active");
    }
}
