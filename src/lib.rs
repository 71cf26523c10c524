pub mod overlay;

// Реэкспорт основного API
pub use overlay::{
    CaptureResolutionSelector, OverlayConfig, OverlayError, OverlayFrame, OverlayGpu,
    PlaneTessellator, PlaneVisibilitySorter, PointCloudStream, Yuv420Packer,
};
