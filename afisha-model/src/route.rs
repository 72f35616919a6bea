use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteProfile {
    #[default]
    Driving,
    Bike,
}

impl RouteProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteProfile::Driving => "driving",
            RouteProfile::Bike => "bike",
        }
    }
}

impl FromStr for RouteProfile {
    type Err = std::convert::Infallible;

    /// Anything that is not `bike` routes as driving.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "bike" => RouteProfile::Bike,
            _ => RouteProfile::Driving,
        })
    }
}

impl fmt::Display for RouteProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    GraphHopper,
    Osrm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Polyline as `[latitude, longitude]` pairs.
    pub coordinates: Vec<[f64; 2]>,
    /// Metres.
    pub distance: Option<f64>,
    /// Seconds.
    pub duration: Option<f64>,
    pub source: RouteSource,
}
