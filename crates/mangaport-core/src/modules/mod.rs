//! Configuration, logging and reader-side helpers.

pub mod chapters;
pub mod config;
pub mod logger;
pub mod pages;
pub mod reconcile;
