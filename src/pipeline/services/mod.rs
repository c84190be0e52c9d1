pub mod image;
pub mod preprocessing;
