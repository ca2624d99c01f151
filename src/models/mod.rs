//! Domain models for ferroboard.
//!
//! # Core Concepts
//!
//! ## Static
//!
//! - [`Station`]: A stop on the line and its upstream `idEst` code.
//!
//! ## Per refresh cycle
//!
//! These are built fresh on every refresh and replaced wholesale by the next one:
//!
//! - [`DepartureRow`]: One scraped table row. Never leaves the pipeline.
//! - [`DepartureGroup`]: All rows sharing a destination, times in row order.
//! - [`AggregationResult`]: Groups split into inbound and outbound buckets, with a timestamp.
//! - [`WidgetSnapshot`]: Next departure per direction, for compact displays.
//!
//! ## Display
//!
//! - [`BoardState`]: What a board currently shows. Survives failed refreshes.

mod board;
mod departure;
mod station;
mod widget;

pub use board::*;
pub use departure::*;
pub use station::*;
pub use widget::*;
