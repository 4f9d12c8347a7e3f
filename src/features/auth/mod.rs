//! Account registration, login, and request identity.
//!
//! Identity travels as an immutable [`model::CurrentUser`] value: the guard
//! middleware decodes the bearer token and attaches it to the request, and
//! every query-layer call receives it as a plain parameter.

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod password;
pub mod routes;
pub mod service;
pub mod token;

pub use service::AuthService;
pub use token::TokenService;
