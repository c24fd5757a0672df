//! Client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`upload`, `display`, `notice`) so a view can
//! depend on the one small model it renders.

pub mod display;
pub mod notice;
pub mod upload;
