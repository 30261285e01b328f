pub mod proxy;
pub mod upload;
