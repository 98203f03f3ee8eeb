pub mod book;
pub mod category;
pub mod image;
pub mod user;
