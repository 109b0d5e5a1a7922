pub mod colors;
pub mod geometry;
pub mod shape;
pub mod source;
