//! Service area domain entity

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "coordinates out of range: ({}, {})",
                self.latitude, self.longitude
            )))
        }
    }

    /// Great-circle distance (haversine)
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

/// What the user picked: a postal code or a device location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationQuery {
    Pincode(String),
    Coordinates(GeoPoint),
}

impl LocationQuery {
    pub fn pincode(code: impl Into<String>) -> Self {
        Self::Pincode(code.into())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Self::Coordinates(GeoPoint::new(latitude, longitude))
    }

    /// Normalized form: pincode trimmed, coordinates range-checked.
    pub fn normalized(&self) -> Result<LocationQuery, DomainError> {
        match self {
            Self::Pincode(code) => {
                let code = code.trim();
                if code.is_empty() || code.len() > 12 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(DomainError::Validation(format!("invalid pincode '{}'", code)));
                }
                Ok(Self::Pincode(code.to_string()))
            }
            Self::Coordinates(point) => {
                point.validate()?;
                Ok(Self::Coordinates(*point))
            }
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pincode(code) => write!(f, "pincode {}", code),
            Self::Coordinates(p) => write!(f, "({:.5}, {:.5})", p.latitude, p.longitude),
        }
    }
}

/// Geographic coverage unit with its own serviceability and verticals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceArea {
    pub id: i32,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub is_serviceable: bool,
    pub service_types: BTreeSet<String>,
    pub delivery_time_hours: Option<u32>,
    /// Minor currency units
    pub delivery_charge: Option<i64>,
    pub location: Option<GeoPoint>,
}

impl ServiceArea {
    pub fn new(pincode: impl Into<String>, city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            id: 0,
            pincode: pincode.into(),
            city: city.into(),
            state: state.into(),
            country: "India".to_string(),
            is_serviceable: true,
            service_types: BTreeSet::new(),
            delivery_time_hours: None,
            delivery_charge: None,
            location: None,
        }
    }

    pub fn with_service_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(GeoPoint::new(latitude, longitude));
        self
    }

    /// Serviceable and listing the given vertical.
    pub fn offers(&self, service_type: &str) -> bool {
        self.is_serviceable && self.service_types.contains(service_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_distance_is_plausible() {
        // Bengaluru MG Road → Whitefield, roughly 14 km
        let mg_road = GeoPoint::new(12.9756, 77.6050);
        let whitefield = GeoPoint::new(12.9698, 77.7500);
        let d = mg_road.distance_km(&whitefield);
        assert!((14.0..17.0).contains(&d), "distance was {}", d);
        assert!(mg_road.distance_km(&mg_road).abs() < 1e-9);
    }

    #[test]
    fn coordinates_are_range_checked() {
        assert!(GeoPoint::new(91.0, 0.0).validate().is_err());
        assert!(GeoPoint::new(0.0, -181.0).validate().is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).validate().is_err());
        assert!(GeoPoint::new(-33.9, 151.2).validate().is_ok());
    }

    #[test]
    fn pincode_is_trimmed_and_validated() {
        assert_eq!(
            LocationQuery::pincode(" 560001 ").normalized().unwrap(),
            LocationQuery::pincode("560001")
        );
        assert!(LocationQuery::pincode("   ").normalized().is_err());
        assert!(LocationQuery::pincode("56-0001").normalized().is_err());
    }

    #[test]
    fn offers_requires_serviceable_flag() {
        let mut area = ServiceArea::new("560001", "Bengaluru", "Karnataka").with_service_types(["grocery"]);
        assert!(area.offers("grocery"));
        assert!(!area.offers("fashion"));
        area.is_serviceable = false;
        assert!(!area.offers("grocery"));
    }
}
