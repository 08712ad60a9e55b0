//! Contribution scoring and classification engine
//!
//! The per-signal scoring algorithms and the expertise classifier are pure
//! functions over the models in `common`; everything touching the database
//! or the network lives in the orchestration modules around them.

pub mod contributor;
pub mod discovery;
pub mod expertise;
pub mod export;
pub mod pipeline;
pub mod scoring;
pub mod summary;

#[cfg(test)]
mod discovery_test;
#[cfg(test)]
mod scoring_test;

pub use export::ExportService;
pub use pipeline::{Pipeline, ProcessingResult};

pub(crate) fn db_err(e: sqlx::Error) -> common::Error {
    common::Error::Database(e.to_string())
}
