use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geo::Coordinates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cinema {
    pub id: i32,
    pub name: String,
    pub address: String,
    /// Well-known-text point, `POINT(<longitude> <latitude>)`.
    pub coordinates: String,
    pub phone_number: Option<String>,
    pub open_hours: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCinema {
    pub name: String,
    pub address: String,
    pub coordinates: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub open_hours: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CinemaPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<String>,
    pub phone_number: Option<String>,
    pub open_hours: Option<Value>,
}

impl CinemaPatch {
    pub fn apply_to(&self, cinema: &mut Cinema) {
        if let Some(name) = &self.name {
            cinema.name = name.clone();
        }
        if let Some(address) = &self.address {
            cinema.address = address.clone();
        }
        if let Some(coordinates) = &self.coordinates {
            cinema.coordinates = coordinates.clone();
        }
        if let Some(phone_number) = &self.phone_number {
            cinema.phone_number = Some(phone_number.clone());
        }
        if let Some(open_hours) = &self.open_hours {
            cinema.open_hours = Some(open_hours.clone());
        }
    }
}

/// Restricts a cinema listing to addresses containing a (lowercase) needle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CinemaFilter {
    pub address_contains: Option<String>,
}

impl CinemaFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a filter from the `city` query value. Unknown cities do not
    /// filter at all.
    pub fn for_city(city: Option<&str>) -> Self {
        let needle = city
            .map(|c| c.trim().to_lowercase())
            .and_then(|c| match c.as_str() {
                "moscow" | "москва" => Some("москва"),
                "saint-petersburg" | "spb" | "санкт-петербург" => {
                    Some("санкт-петербург")
                }
                _ => None,
            });

        Self {
            address_contains: needle.map(str::to_string),
        }
    }

    pub fn matches(&self, cinema: &Cinema) -> bool {
        match &self.address_contains {
            Some(needle) => cinema.address.to_lowercase().contains(needle),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CinemaSource {
    Database,
    StaticSeed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CinemaListing {
    pub cinemas: Vec<Cinema>,
    pub source: CinemaSource,
}

/// A cinema annotated with its parsed position and distance from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CinemaLocation {
    #[serde(flatten)]
    pub cinema: Cinema,
    pub location: Option<Coordinates>,
    pub distance_km: Option<f64>,
}
