//! # lure-finder
//!
//! Lookup and search over a static catalog of historical lure colors and
//! model variants.
//!
//! ## Architecture
//!
//! - **model**: Producer, color and variant records as found in the catalog
//! - **catalog**: Catalog document loading and advisory lookup hints
//! - **index**: Generic exact-match / substring search with deterministic ranking
//! - **colors**: Color index over every producer's colors
//! - **variants**: Variant index over every producer's model variants
//! - **resolve**: Variant-to-color cross references and derived lure codes
//! - **cache**: Atomically swapped snapshot of both indexes, reload and degradation
//! - **config**: Catalog path and log filter resolution
//! - **output**: JSON and text rendering for the command line

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod colors;
pub mod config;
pub mod index;
pub mod model;
pub mod output;
pub mod resolve;
pub mod variants;
