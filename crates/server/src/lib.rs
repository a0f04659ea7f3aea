//! Revline catalog server library.
//!
//! Exposes the catalog store, search engine, and HTTP routes for
//! integration testing. The main entry point for running the server is
//! the `revline` binary.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod search;
pub mod state;
