pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;
pub mod token_store;

pub use services::AuthService;
pub use token_store::{InMemoryTokenStore, TokenStore};
