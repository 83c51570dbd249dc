// Domain layer: listing model, timestamps, and the storage capability port.

pub mod model;
pub mod ports;
