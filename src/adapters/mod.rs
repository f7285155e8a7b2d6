// Adapters layer: concrete implementations for external systems.

pub mod nominatim;
pub mod rate_limit;
