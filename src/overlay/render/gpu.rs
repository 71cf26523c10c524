// ============================================
// Overlay GPU - Загрузка геометрии кадра в wgpu
// ============================================
//
// Шейдеры и пайплайны - на стороне внешнего бэкенда.
// Здесь только буферы и состояния примитивов/смешивания,
// которые этой геометрии нужны.

use std::collections::{HashMap, HashSet};

use crate::overlay::buffer::GpuStreamBuffer;
use crate::overlay::core::OverlayConfig;
use crate::overlay::plane::tessellator::{INDICES_PER_BOUNDARY_VERT, VERTS_PER_BOUNDARY_VERT};
use crate::overlay::plane::{PlaneId, PlaneVertex};
use crate::overlay::points::CloudPoint;

use super::frame::{OverlayFrame, PlaneDraw};

/// Premultiplied alpha: (ONE, ONE_MINUS_SRC_ALPHA). Зависит от порядка!
pub const PLANE_BLEND: wgpu::BlendState = wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING;

/// Один strip на плоскость, u16 индексы
pub fn plane_primitive_state() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleStrip,
        strip_index_format: Some(wgpu::IndexFormat::Uint16),
        cull_mode: None,
        ..Default::default()
    }
}

pub fn point_primitive_state() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::PointList,
        ..Default::default()
    }
}

/// GPU данные одной плоскости
struct PlaneGpuData {
    vertex_buffer: GpuStreamBuffer,
    index_buffer: GpuStreamBuffer,
}

impl PlaneGpuData {
    fn new(device: &wgpu::Device, initial_boundary_vertices: usize) -> Self {
        let vertex_bytes = initial_boundary_vertices * VERTS_PER_BOUNDARY_VERT * std::mem::size_of::<PlaneVertex>();
        let index_bytes = initial_boundary_vertices * INDICES_PER_BOUNDARY_VERT * std::mem::size_of::<u16>();
        Self {
            vertex_buffer: GpuStreamBuffer::new(device, "Plane Vertex", wgpu::BufferUsages::VERTEX, vertex_bytes as u64),
            index_buffer: GpuStreamBuffer::new(device, "Plane Index", wgpu::BufferUsages::INDEX, index_bytes as u64),
        }
    }
}

/// Плоскость, готовая к draw call
pub struct PlaneGpuDraw<'a> {
    pub draw: PlaneDraw<'a>,
    pub vertex_buffer: &'a wgpu::Buffer,
    pub index_buffer: &'a wgpu::Buffer,
    pub index_count: u32,
}

/// Что реально ушло на GPU за один upload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpuUploadStats {
    pub planes: usize,
    pub cloud_uploaded: bool,
    /// Сколько буферов пришлось пересоздать
    pub recreated: usize,
}

pub struct OverlayGpu {
    planes: HashMap<PlaneId, PlaneGpuData>,
    points: GpuStreamBuffer,
    /// upload_count облака, уже лежащего на GPU
    uploaded_cloud: u64,
    initial_boundary_vertices: usize,
}

impl OverlayGpu {
    pub fn new(device: &wgpu::Device, config: &OverlayConfig) -> Self {
        let point_bytes = config.point_cloud.initial_points * std::mem::size_of::<CloudPoint>();
        Self {
            planes: HashMap::new(),
            points: GpuStreamBuffer::new(device, "Point Cloud", wgpu::BufferUsages::VERTEX, point_bytes as u64),
            uploaded_cloud: 0,
            initial_boundary_vertices: config.plane.initial_boundary_vertices,
        }
    }

    /// Загрузить результат OverlayFrame::update. Вызывать между update и draw.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, frame: &OverlayFrame) -> GpuUploadStats {
        let mut stats = GpuUploadStats::default();
        let mut alive = HashSet::new();

        for draw in frame.draws() {
            let initial = self.initial_boundary_vertices;
            let data = self
                .planes
                .entry(draw.plane)
                .or_insert_with(|| PlaneGpuData::new(device, initial));

            stats.recreated += data.vertex_buffer.upload(device, queue, draw.mesh.vertex_buffer()) as usize;
            stats.recreated += data.index_buffer.upload(device, queue, draw.mesh.index_buffer()) as usize;
            stats.planes += 1;
            alive.insert(draw.plane);
        }

        // Невидимые в этом кадре плоскости отпускают GPU память
        self.planes.retain(|id, _| alive.contains(id));

        let cloud = frame.point_cloud();
        if cloud.upload_count() != self.uploaded_cloud {
            stats.recreated += self.points.upload(device, queue, cloud.buffer()) as usize;
            self.uploaded_cloud = cloud.upload_count();
            stats.cloud_uploaded = true;
        }

        stats
    }

    /// Плоскости в порядке отрисовки кадра
    pub fn iter_planes<'a>(&'a self, frame: &'a OverlayFrame) -> impl Iterator<Item = PlaneGpuDraw<'a>> + 'a {
        frame.draws().filter_map(move |draw| {
            let data = self.planes.get(&draw.plane)?;
            Some(PlaneGpuDraw {
                draw,
                vertex_buffer: data.vertex_buffer.buffer(),
                index_buffer: data.index_buffer.buffer(),
                index_count: data.index_buffer.len(),
            })
        })
    }

    /// Буфер точек и количество точек последней загрузки
    pub fn points(&self) -> (&wgpu::Buffer, u32) {
        (self.points.buffer(), self.points.len())
    }

    #[inline]
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }
}
