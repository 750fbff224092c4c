//! HTTP front-end for spam-rs
//!
//! Serves the single classification page

pub mod server;
pub mod web;

pub use server::WebServer;
