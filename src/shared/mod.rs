pub mod constants;
pub mod dates;
pub mod listing;
pub mod types;
pub mod validation;
