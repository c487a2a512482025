//! # Synapse API Server Library
//!
//! HTTP surface for Synapse: projects, notes, tasks, and the calendar, all
//! scoped to the user named by the identity provider's bearer token.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Authentication and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
