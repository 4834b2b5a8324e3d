pub mod analytics;
pub mod auth;
pub mod departments;
pub mod incidents;
