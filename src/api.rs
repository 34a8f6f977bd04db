//! Upstream API implementations of [`crate::gateway::Gateway`].

pub mod rapidapi;

pub use rapidapi::RapidApiGateway;
