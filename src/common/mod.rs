pub mod capture;

pub use capture::Capture;
