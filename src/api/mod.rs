//! HTTP layer: handlers, middleware and DTOs for the proxy endpoints.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
