//! Inbound interfaces. Only HTTP for now.

pub mod http;
