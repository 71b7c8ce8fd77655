pub mod adapter;
pub mod handlers;
pub mod models;
pub mod routes;
