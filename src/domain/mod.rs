// Domain layer: row types, run statistics and the ports the pipeline is built on.

pub mod model;
pub mod ports;
