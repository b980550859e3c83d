pub mod auth;
pub mod classify;
pub mod config;
pub mod db;
pub mod requests;
pub mod routes;
pub mod state;
