// ============================================
// Points Module - Облако точек трекинга
// ============================================

pub mod stream;
pub mod vertex;

pub use stream::{PointCloudSnapshot, PointCloudStream};
pub use vertex::{CloudPoint, FLOATS_PER_POINT};
