// ============================================
// Plane Vertex - Вершина меша плоскости
// ============================================

/// Вершина в локальных координатах плоскости: (x, z) + alpha
/// alpha = 0 на внешнем кольце, 1 на внутреннем
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct PlaneVertex {
    pub x: f32,
    pub z: f32,
    pub alpha: f32,
}

impl PlaneVertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        0 => Float32x3,  // x, z, alpha
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PlaneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }

    #[inline]
    pub fn new(x: f32, z: f32, alpha: f32) -> Self {
        Self { x, z, alpha }
    }
}
