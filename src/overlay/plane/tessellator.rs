// ============================================
// Plane Tessellator - Граница плоскости -> меш с затуханием
// ============================================
//
// Для n вершин границы строим два кольца:
// - внешнее: сама граница, alpha = 0
// - внутреннее: граница, сжатая к центру на fade radius, alpha = 1
//
// Один TRIANGLE_STRIP покрывает и полосу затухания, и внутренность:
//   2(n-1) | 0 1 2 3 ... 2n-2 2n-1 | 1 | 2(n-2)+1 3 2(n-3)+1 5 ... | середина (n нечётное)
//
// Итого 2n вершин и 3n индексов.

use crate::overlay::buffer::GrowableBuffer;
use crate::overlay::core::PlaneConfig;

use super::boundary::PlaneBoundary;
use super::vertex::PlaneVertex;

pub const VERTS_PER_BOUNDARY_VERT: usize = 2;
pub const INDICES_PER_BOUNDARY_VERT: usize = 3;

/// Больше вершин границы не адресовать u16 индексами
pub const MAX_BOUNDARY_VERTS: usize = (u16::MAX as usize + 1) / VERTS_PER_BOUNDARY_VERT;

/// Меш одной плоскости: кольца вершин + strip индексов
pub struct PlaneMesh {
    vertices: GrowableBuffer<PlaneVertex>,
    indices: GrowableBuffer<u16>,
}

impl PlaneMesh {
    pub fn new(initial_boundary_vertices: usize) -> Self {
        Self {
            vertices: GrowableBuffer::new(initial_boundary_vertices * VERTS_PER_BOUNDARY_VERT),
            indices: GrowableBuffer::new(initial_boundary_vertices * INDICES_PER_BOUNDARY_VERT),
        }
    }

    /// Пустой меш = "нечего рисовать", не ошибка
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[PlaneVertex] {
        self.vertices.as_slice()
    }

    #[inline]
    pub fn indices(&self) -> &[u16] {
        self.indices.as_slice()
    }

    #[inline]
    pub fn vertex_buffer(&self) -> &GrowableBuffer<PlaneVertex> {
        &self.vertices
    }

    #[inline]
    pub fn index_buffer(&self) -> &GrowableBuffer<u16> {
        &self.indices
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

/// Коэффициент сжатия оси для внутреннего кольца.
/// Если протяжённость <= 2r, вся ось затухает к центральной линии.
#[inline]
pub fn fade_scale(extent: f32, fade_radius: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    ((extent - 2.0 * fade_radius) / extent).max(0.0)
}

/// Индексы strip для n вершин границы (out.len() == 3n).
/// При n < 3 или коротком out ничего не пишет.
pub(crate) fn write_strip_indices(n: usize, out: &mut [u16]) {
    if n < 3 || out.len() < n * INDICES_PER_BOUNDARY_VERT {
        return;
    }

    let mut cursor = 0;
    let mut put = |index: usize| {
        out[cursor] = index as u16;
        cursor += 1;
    };

    // Полоса затухания: последняя внешняя, затем пары (внешняя, внутренняя)
    put((n - 1) * 2);
    for i in 0..n {
        put(i * 2);
        put(i * 2 + 1);
    }

    // Замыкаем на второй внутренней и зашиваем внутренность с двух концов
    put(1);
    for i in 1..n / 2 {
        put((n - 1 - i) * 2 + 1);
        put(i * 2 + 1);
    }
    if n % 2 != 0 {
        put(n / 2 * 2 + 1);
    }
}

/// Строит PlaneMesh из границы
#[derive(Debug, Clone)]
pub struct PlaneTessellator {
    fade_radius: f32,
}

impl PlaneTessellator {
    pub fn new(fade_radius: f32) -> Self {
        Self { fade_radius }
    }

    pub fn from_config(config: &PlaneConfig) -> Self {
        Self::new(config.fade_radius)
    }

    #[inline]
    pub fn fade_radius(&self) -> f32 {
        self.fade_radius
    }

    /// Перестроить меш. Возвращает false, если рисовать нечего
    /// (нет полигона или меньше 3 вершин).
    pub fn rebuild(&self, boundary: Option<&PlaneBoundary<'_>>, mesh: &mut PlaneMesh) -> bool {
        let Some(boundary) = boundary else {
            mesh.clear();
            return false;
        };

        let n = boundary.vertex_count();
        if n < 3 {
            mesh.clear();
            return false;
        }
        if n > MAX_BOUNDARY_VERTS {
            log::warn!("Plane boundary has {} vertices, more than u16 indices allow; skipped", n);
            mesh.clear();
            return false;
        }

        let x_scale = fade_scale(boundary.extent_x, self.fade_radius);
        let z_scale = fade_scale(boundary.extent_z, self.fade_radius);

        let vertices = mesh.vertices.rewrite(n * VERTS_PER_BOUNDARY_VERT);
        for (ring, &[x, z]) in vertices.chunks_exact_mut(2).zip(boundary.points) {
            ring[0] = PlaneVertex::new(x, z, 0.0);
            ring[1] = PlaneVertex::new(x * x_scale, z * z_scale, 1.0);
        }

        write_strip_indices(n, mesh.indices.rewrite(n * INDICES_PER_BOUNDARY_VERT));
        true
    }
}
