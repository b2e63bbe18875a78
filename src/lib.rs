//! Pasture - toroidal predator-prey grazing simulation

pub mod core;
pub mod ecs;
pub mod entity;
pub mod simulation;
pub mod spatial;
