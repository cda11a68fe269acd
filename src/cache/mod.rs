//! Local persistence of the encrypted license.

pub mod file;
