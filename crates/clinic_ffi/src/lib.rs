//! Flutter-facing boundary for the clinic point-of-sale core.

pub mod api;
