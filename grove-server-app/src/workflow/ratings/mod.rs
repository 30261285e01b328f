pub mod rate;
pub mod summary;
