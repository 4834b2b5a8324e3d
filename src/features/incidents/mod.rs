pub mod dtos;
pub mod handlers;
pub mod models;
pub mod providers;
pub mod routes;
pub mod services;
