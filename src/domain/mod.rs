// Domain layer: report models and ports (interfaces). No storage code here.

pub mod model;
pub mod ports;
