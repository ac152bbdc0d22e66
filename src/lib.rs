//! maintkit: maintenance & procurement seeding kit
//!
//! Generates synthetic service manuals and parts lists, loads them into a
//! SQLite database, synthesizes procurement stock for every referenced part,
//! and reconciles stock against total maintenance demand.

pub mod cli;
pub mod core;
pub mod generator;
pub mod procurement;
