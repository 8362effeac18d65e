#![deny(missing_docs)]

//! # intpack command line tool
//!
//! Thin caller around the `intpack` library: inspects the format catalog,
//! selects formats for ranges and packs/unpacks integer lists to and from
//! the container layout.

pub mod commands;
pub mod config;
pub mod logging;
