//! Participant records and the admin participants list.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;

pub use service::ParticipantService;
