pub mod random_provider;
pub mod saturation;
pub mod tracker;

pub use tracker::Tracker;
