pub mod error;
pub mod handlers;
pub mod language;
pub mod models;
pub mod payload;
pub mod routes;
pub mod server;

pub use server::{create_router, ApiServer, AppState};
