use std::sync::Arc;

use afisha_model::{Coordinates, GeocodeHit, ResolvedAddress};
use tracing::warn;

use crate::{
    error::{AfishaError, Result},
    providers::{Geocoder, kinopoisk_types::non_blank, nominatim::ReverseAddress},
};

/// Forward and reverse geocoding over a [`Geocoder`].
#[derive(Clone)]
pub struct GeocodingService {
    geocoder: Arc<dyn Geocoder>,
}

impl std::fmt::Debug for GeocodingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingService").finish_non_exhaustive()
    }
}

impl GeocodingService {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn locate(&self, query: &str) -> Result<GeocodeHit> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AfishaError::InvalidInput(
                "address query must not be empty".to_string(),
            ));
        }

        match self.geocoder.search(query).await {
            Ok(Some(hit)) => Ok(hit),
            Ok(None) => Err(AfishaError::NotFound(format!("address {query:?}"))),
            Err(e) => Err(AfishaError::UpstreamUnavailable(format!(
                "geocoding failed: {e}"
            ))),
        }
    }

    /// Human-readable label for a position. Never fails; when nothing can be
    /// resolved the label is the raw coordinates and `fallback` is set.
    pub async fn describe(&self, at: Coordinates) -> ResolvedAddress {
        let address = match self.geocoder.reverse(at).await {
            Ok(address) => address,
            Err(e) => {
                warn!(
                    latitude = at.latitude,
                    longitude = at.longitude,
                    error = %e,
                    "reverse geocoding failed"
                );
                None
            }
        };

        match address.as_ref().and_then(address_label) {
            Some(label) => ResolvedAddress {
                label,
                coordinates: at,
                fallback: false,
            },
            None => ResolvedAddress {
                label: at.to_label(),
                coordinates: at,
                fallback: true,
            },
        }
    }
}

/// `"road house, city"` when a road is known, else the display name.
fn address_label(address: &ReverseAddress) -> Option<String> {
    let locality = non_blank(address.city.as_deref())
        .or_else(|| non_blank(address.town.as_deref()))
        .or_else(|| non_blank(address.village.as_deref()));

    if let Some(road) = non_blank(address.road.as_deref()) {
        let street = match non_blank(address.house_number.as_deref()) {
            Some(house) => format!("{road} {house}"),
            None => road.to_string(),
        };
        return Some(match locality {
            Some(city) => format!("{street}, {city}"),
            None => street,
        });
    }

    non_blank(address.display_name.as_deref()).map(str::to_string)
}
