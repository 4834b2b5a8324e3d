pub mod dtos;
pub mod handler;
pub mod routes;
pub mod service;

pub use service::AnalyticsService;
