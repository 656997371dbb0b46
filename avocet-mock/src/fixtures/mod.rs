pub mod hotspots;
pub mod observations;
pub mod taxonomy;
