//! Mission Dashboard - data synchronization and chart lifecycle core
//!
//! This library exposes the core modules for testing and embedding in a host UI.

pub mod api;
pub mod category;
pub mod charts;
pub mod collaborators;
pub mod common;
pub mod config;
pub mod dashboard;
pub mod data_client;
pub mod error;
pub mod panels;
pub mod preferences;
pub mod query;
pub mod sync;
