//! Identity provider implementations.

pub mod auth0;
