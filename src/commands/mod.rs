// Declarative commands: validate, plan, deps
pub mod declarative;

pub mod config;
pub mod describe;
