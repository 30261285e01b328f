pub mod comment;
pub mod game;
pub mod rating;
