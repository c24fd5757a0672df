//! Network clients.

pub mod api;
