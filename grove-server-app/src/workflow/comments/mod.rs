pub mod list;
pub mod moderate;
pub mod post;
