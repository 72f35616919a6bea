//! # Afisha Core
//!
//! Domain logic behind the Afisha cinema service.
//!
//! - **Catalog**: randomized sampling of the upstream top-film lists through a
//!   shared TTL page cache, and reconciliation of upstream film details into
//!   the local catalogue.
//! - **Films**: CRUD over the local catalogue.
//! - **Cinemas**: cinema directory with a static seed fallback for when the
//!   database is unavailable or empty.
//! - **Geo**: WKT point parsing, great-circle distances, route planning with a
//!   fallback provider, and geocoding that degrades to raw coordinates.
//! - **Database**: repository ports with PostgreSQL and in-memory adapters.
//!
//! ## Feature Flags
//!
//! - `database`: PostgreSQL adapters and embedded migrations (SQLx).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod catalog;
pub mod cinemas;
pub mod database;
pub mod error;
pub mod films;
pub mod geo;
pub mod providers;

pub use afisha_model as model;
pub use error::{AfishaError, Result};

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
