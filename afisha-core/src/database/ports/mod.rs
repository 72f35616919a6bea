//! Repository ports. Adapters live in `database::postgres` and
//! `database::memory`.

pub mod cinemas;
pub mod films;

pub use cinemas::CinemaRepository;
pub use films::FilmRepository;
