use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Static metro reference data (`metro_codes` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetroCode {
    pub id: Uuid,
    pub code: String,
    pub city: String,
    pub state: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// (code, city, state, region, lat, lon)
const REFERENCE_METROS: &[(&str, &str, &str, &str, f64, f64)] = &[
    ("ATL", "Atlanta", "GA", "Southeast", 33.749, -84.388),
    ("BOS", "Boston", "MA", "Northeast", 42.3601, -71.0589),
    ("CHI", "Chicago", "IL", "Midwest", 41.8781, -87.6298),
    ("CLT", "Charlotte", "NC", "Southeast", 35.2271, -80.8431),
    ("CMH", "Columbus", "OH", "Midwest", 39.9612, -82.9988),
    ("DEN", "Denver", "CO", "Mountain", 39.7392, -104.9903),
    ("DFW", "Dallas-Fort Worth", "TX", "South", 32.7767, -96.797),
    ("HOU", "Houston", "TX", "South", 29.7604, -95.3698),
    ("IAD", "Ashburn", "VA", "Mid-Atlantic", 39.0438, -77.4874),
    ("LAS", "Las Vegas", "NV", "West", 36.1699, -115.1398),
    ("LAX", "Los Angeles", "CA", "West", 34.0522, -118.2437),
    ("NYC", "New York", "NY", "Northeast", 40.7128, -74.006),
    ("PDX", "Hillsboro", "OR", "Northwest", 45.5229, -122.9898),
    ("PHX", "Phoenix", "AZ", "Southwest", 33.4484, -112.074),
    ("RIC", "Richmond", "VA", "Mid-Atlantic", 37.5407, -77.436),
    ("SAT", "San Antonio", "TX", "South", 29.4241, -98.4936),
    ("SEA", "Seattle", "WA", "Northwest", 47.6062, -122.3321),
    ("SJC", "San Jose", "CA", "West", 37.3382, -121.8863),
    ("SLC", "Salt Lake City", "UT", "Mountain", 40.7608, -111.891),
];

/// Reference metros seeded into every store at startup.
pub fn reference_metros() -> Vec<MetroCode> {
    REFERENCE_METROS
        .iter()
        .map(|(code, city, state, region, latitude, longitude)| MetroCode {
            id: Uuid::new_v4(),
            code: code.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            region: region.to_string(),
            latitude: *latitude,
            longitude: *longitude,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_reference_codes_are_unique_and_uppercase() {
        let metros = reference_metros();
        let codes: HashSet<_> = metros.iter().map(|m| m.code.clone()).collect();
        assert_eq!(codes.len(), metros.len());
        assert!(metros
            .iter()
            .all(|m| m.code.chars().all(|c| c.is_ascii_uppercase())));
    }
}
