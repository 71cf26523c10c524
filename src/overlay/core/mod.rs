// ============================================
// Core - Конфигурация и ошибки оверлея
// ============================================

pub mod config;
pub mod error;

pub use config::{OverlayConfig, PlaneConfig, PointCloudConfig, CaptureConfig, TrackingConfig};
pub use error::OverlayError;
