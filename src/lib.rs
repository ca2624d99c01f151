//! Real-time departure boards for the Belgrano Norte commuter line.
//!
//! The upstream operator publishes next-train times as an HTML page per
//! station. This crate fetches that page, scrapes it into departure groups
//! split by direction, and keeps a board and a compact widget up to date.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod refresh;
pub mod render;
pub mod widget;

pub use error::BoardError;
