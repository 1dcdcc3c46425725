//! HTTP request handlers for API endpoints.

pub mod auth;
pub mod health;
pub mod pokemons;
