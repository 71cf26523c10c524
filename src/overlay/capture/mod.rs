// ============================================
// Capture Module - Поток камеры и упаковка кадров
// ============================================
// Обе операции чистые и без состояния - можно звать из любого потока.

pub mod resolution;
pub mod yuv;

pub use resolution::{CandidateResolution, CaptureResolutionSelector};
pub use yuv::{CropRect, PackedImage, Yuv420Packer, YuvImage, YuvPlane, YUV420_BITS_PER_PIXEL};
