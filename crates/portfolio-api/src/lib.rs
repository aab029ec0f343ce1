pub mod admin;
pub mod auth;
pub mod contacts;
pub mod error;
pub mod health;
pub mod leaderboard;
pub mod middleware;
pub mod routes;
pub mod validate;

mod store;
