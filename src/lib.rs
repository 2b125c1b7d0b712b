//! # Placetag API Server Library
//!
//! This library provides the core functionality for the Placetag API server:
//! user signup, saving photo-verified places, and querying places by feature.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `password`: Argon2id password hashing
//! - `features`: Normalized feature sets, matching and merging
//! - `models`: Domain types (users, places, coordinates)
//! - `clients`: External geocoding and image-labeling adapters
//! - `store`: Document store adapters (Firestore REST, in-memory)
//! - `routes`: API route handlers

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod features;
pub mod models;
pub mod password;
pub mod routes;
pub mod store;

/// Current version of the Placetag server
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
