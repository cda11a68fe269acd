//! License record format.

pub mod models;
