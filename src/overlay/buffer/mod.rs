// ============================================
// Buffer Module - Растущие буферы для потоковых данных
// ============================================
//
// - growable: CPU staging с удвоением ёмкости
// - gpu: зеркало на wgpu с тем же правилом роста

pub mod growable;
pub mod gpu;

pub use growable::GrowableBuffer;
pub use gpu::GpuStreamBuffer;
