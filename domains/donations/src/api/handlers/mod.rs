pub mod centers;
pub mod donations;
