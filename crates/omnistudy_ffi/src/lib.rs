//! Flutter-facing bindings over `omnistudy_core`.

pub mod api;
