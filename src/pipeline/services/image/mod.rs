pub mod analysis;
pub mod overlay_service;

pub use overlay_service::OverlayRenderer;
