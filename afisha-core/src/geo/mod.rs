//! Point parsing, distances and cinema ranking, plus the geocoding and
//! routing services built on the upstream providers.

pub mod geocoding;
pub mod routing;

use std::{cmp::Ordering, sync::LazyLock};

use afisha_model::{Cinema, CinemaLocation, Coordinates};
use regex::Regex;

pub use geocoding::GeocodingService;
pub use routing::{RoutePlanner, RouteRequest};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

static WKT_POINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*POINT\s*\(\s*([+-]?\d+(?:\.\d+)?)\s+([+-]?\d+(?:\.\d+)?)\s*\)\s*$",
    )
    .expect("wkt point regex should compile")
});

/// Parse `POINT(<longitude> <latitude>)`. Returns `None` for anything
/// malformed or out of range.
pub fn parse_wkt_point(raw: &str) -> Option<Coordinates> {
    let caps = WKT_POINT.captures(raw)?;
    let longitude = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let latitude = caps.get(2)?.as_str().parse::<f64>().ok()?;
    let point = Coordinates::new(latitude, longitude);
    point.is_valid().then_some(point)
}

pub fn format_wkt_point(point: Coordinates) -> String {
    format!("POINT({:.6} {:.6})", point.longitude, point.latitude)
}

/// Great-circle distance in kilometres.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Filter cinemas by a name/address substring, attach positions and
/// distances from `origin`, nearest first. Cinemas without a known distance
/// sort last, by name.
pub fn rank_cinemas(
    cinemas: Vec<Cinema>,
    origin: Option<Coordinates>,
    query: Option<&str>,
) -> Vec<CinemaLocation> {
    let needle = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let mut ranked: Vec<CinemaLocation> = cinemas
        .into_iter()
        .filter(|c| match &needle {
            Some(n) => {
                c.name.to_lowercase().contains(n)
                    || c.address.to_lowercase().contains(n)
            }
            None => true,
        })
        .map(|cinema| {
            let location = parse_wkt_point(&cinema.coordinates);
            let distance_km = origin
                .filter(Coordinates::is_valid)
                .zip(location)
                .map(|(from, to)| haversine_km(from, to));
            CinemaLocation {
                cinema,
                location,
                distance_km,
            }
        })
        .collect();

    ranked.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cinema.name.cmp(&b.cinema.name),
    });
    ranked
}
