// storefront/src/lib.rs

//! Olira storefront service: catalog, cart, cash-on-delivery checkout and the
//! admin panel, served as a JSON API over a pluggable data backend.

pub mod admin;
pub mod backend;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod realtime;
pub mod search;
pub mod services;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use state::AppState;
