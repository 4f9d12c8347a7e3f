//! Donations: the public donate endpoint and the role-gated donations list
//! with money aggregates.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;

pub use service::DonationService;
