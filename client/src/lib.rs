//! # client
//!
//! Client-side logic for the design extractor. Rendering lives elsewhere;
//! this crate holds what the views bind to: upload validation and the upload
//! state machine, the extraction provider boundary, the element display
//! model with per-element downloads, and an HTTP client for the record API.

pub mod extract;
pub mod net;
pub mod sink;
pub mod state;
