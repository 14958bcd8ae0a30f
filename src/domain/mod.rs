// Domain layer: core models and ports (interfaces). Depends only on std, serde and chrono.

pub mod model;
pub mod ports;
