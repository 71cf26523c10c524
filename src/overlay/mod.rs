// ============================================
// Overlay Module - Геометрия AR оверлея
// ============================================
// Плоскости с затуханием по краю, облако точек,
// выбор разрешения камеры и упаковка YUV кадров.
// Трекинг, камера и шейдеры - внешние сервисы.

pub mod core;
pub mod buffer;
pub mod plane;
pub mod points;
pub mod capture;
pub mod tracking;
pub mod render;

pub use self::core::{OverlayConfig, OverlayError};
pub use buffer::{GpuStreamBuffer, GrowableBuffer};
pub use plane::{
    PlaneBoundary, PlaneId, PlaneMesh, PlaneTessellator, PlaneUvTable, PlaneVertex,
    PlaneVisibilitySorter, SortablePlane, TrackedPlane,
};
pub use points::{CloudPoint, PointCloudSnapshot, PointCloudStream};
pub use capture::{CandidateResolution, CaptureResolutionSelector, CropRect, PackedImage, Yuv420Packer, YuvImage, YuvPlane};
pub use tracking::{AnchorList, ColoredAnchor, HitResult, Pose, Trackable, TrackingState, TrackingStateWatcher};
pub use render::{FrameStats, OverlayFrame, OverlayGpu};
