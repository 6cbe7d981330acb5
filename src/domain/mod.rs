// Domain layer: request-scoped models and the ports the broker talks through.

pub mod model;
pub mod ports;
