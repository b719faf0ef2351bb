// storefront/src/services/mod.rs

pub mod auth_client;
pub mod auth_service;
pub mod seed;
