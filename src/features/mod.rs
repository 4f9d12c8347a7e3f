pub mod auth;
pub mod dashboard;
pub mod donations;
pub mod events;
pub mod milestones;
pub mod participants;
pub mod registrations;
pub mod surveys;
