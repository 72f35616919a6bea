//! Core data model definitions shared across Afisha crates.
#![allow(missing_docs)]

pub mod cinema;
pub mod external;
pub mod film;
pub mod geo;
pub mod route;

pub use cinema::{
    Cinema, CinemaFilter, CinemaListing, CinemaLocation, CinemaPatch,
    CinemaSource, NewCinema,
};
pub use external::{
    FactsPage, FilmDetail, FilmFact, FilmReview, FilmSummary, PersistOutcome,
    ReconciledFilm, ReviewsPage, SampleResult, TopListKind,
};
pub use film::{Film, FilmPatch, NewFilm};
pub use geo::{Coordinates, GeocodeHit, ResolvedAddress};
pub use route::{Route, RouteProfile, RouteSource};
