pub mod assets;
pub mod catalog;
pub mod comments;
pub mod games;
pub mod ratings;
