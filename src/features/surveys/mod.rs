//! Post-event surveys: submission with server-side overall/NPS scoring and
//! the role-gated survey list.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;

pub use service::SurveyService;
