pub mod grid;
pub mod occupancy;

pub use grid::{wrap, Grid};
pub use occupancy::{OccupancyIndex, PreyOccupancy};
