pub mod error;
pub mod http;
pub mod kinopoisk;
pub mod kinopoisk_types;
pub mod nominatim;
pub mod routing;

#[cfg(test)]
pub(crate) mod stub_server;

pub use error::ProviderError;
pub use kinopoisk::{FilmProvider, KinopoiskProvider};
pub use nominatim::{Geocoder, NominatimGeocoder};
pub use routing::{GraphHopperRouter, OsrmRouter, RouteProvider};
