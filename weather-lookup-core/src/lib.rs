//! Core library for the `weather-lookup` tool.
//!
//! This crate defines:
//! - The stored weather record model
//! - Retrieval of records from the storage service
//! - The lookup session state machine
//! - Read-only presentation of a lookup
//! - Configuration of the storage service address
//!
//! It is used by `weather-lookup-cli`, but can also be embedded in other front ends.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod presenter;

pub use client::{HttpRecordClient, RecordSource, record_source_from_config};
pub use config::{Config, DEFAULT_BASE_URL};
pub use controller::{LookupController, Phase, Ticket};
pub use error::{LookupError, NOT_FOUND_MESSAGE};
pub use model::{CurrentObservation, RequestEcho, ResolvedLocation, WeatherData, WeatherRecord};
pub use presenter::{Presenter, RecordView, Row, Screen, Section};
