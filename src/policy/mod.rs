//! Access policy over a loaded license.

pub mod access;
