//! `job-insights` library crate.
//!
//! Loads a job postings table once, normalizes compensation and location,
//! and precomputes a fixed set of chart-ready views. The binary (and any
//! HTTP layer in front of it) only reads from [`state::DashboardState`].

pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod views;

pub use error::InsightsError;
pub use state::DashboardState;
pub use views::{ViewId, ViewPayload};
