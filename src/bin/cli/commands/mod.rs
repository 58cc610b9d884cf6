pub mod browse;
pub mod delete;
pub mod due;
pub mod reset;
pub mod review;
pub mod stats;
pub mod units;
