pub mod memory;
pub mod ports;
#[cfg(feature = "database")]
pub mod postgres;

pub use memory::{InMemoryCinemaRepository, InMemoryFilmRepository};
pub use ports::{CinemaRepository, FilmRepository};
#[cfg(feature = "database")]
pub use postgres::{
    PostgresCinemaRepository, PostgresDatabase, PostgresFilmRepository,
};
