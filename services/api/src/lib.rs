//! Synthetic Patients API Library Crate
//!
//! Configuration, shared state, handlers and routing for the web service that
//! hosts consultation sessions over HTTP and serves the static front end. The
//! `api` binary is a thin wrapper around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
