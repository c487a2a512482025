/// Middleware modules for the API server
///
/// This module contains custom middleware for:
/// - Bearer-token authentication
/// - Security headers

pub mod auth;
pub mod security;
