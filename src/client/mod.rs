//! HTTP transport to the license issuance service.

pub mod http;
