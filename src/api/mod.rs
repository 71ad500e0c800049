//! Backend API module: REST client, payload builders, and the mockable
//! client trait

mod client;
pub mod payload;
mod traits;

pub use client::{ApiError, RestClient};
pub use traits::BackendClient;

#[cfg(test)]
pub use traits::MockBackendClient;
