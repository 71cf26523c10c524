// ============================================
// Render Module - Кадр оверлея и его загрузка на GPU
// ============================================

pub mod frame;
pub mod gpu;

pub use frame::{FrameStats, OverlayFrame, PlaneDraw};
pub use gpu::{plane_primitive_state, point_primitive_state, GpuUploadStats, OverlayGpu, PlaneGpuDraw, PLANE_BLEND};
