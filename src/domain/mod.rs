// Domain layer: core models and collaborator ports.

pub mod model;
pub mod ports;
