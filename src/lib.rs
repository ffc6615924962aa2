pub mod config;
pub mod controller;
pub mod cycle;
pub mod error;
pub mod intersection;
pub mod metrics;
pub mod provider;
pub mod report;
pub mod schedule;
pub mod state;
