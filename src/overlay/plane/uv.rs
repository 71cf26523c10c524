// ============================================
// Plane UV Table - Стабильный поворот узора плоскости
// ============================================
// Каждой новой плоскости - следующий индекс, угол = index * step.
// Чисто косметика: соседние плоскости получают разный наклон сетки.
//
// Записи не удаляются: таблица растёт с числом когда-либо
// увиденных плоскостей.

use std::collections::HashMap;

use crate::overlay::core::PlaneConfig;

use super::boundary::PlaneId;

/// 1 / sqrt(3): вертикальный масштаб для равносторонних треугольников
const EQUILATERAL_TRIANGLE_SCALE: f32 = 0.577_350_26;

/// Таблица plane -> индекс, принадлежит рендер-компоненту
pub struct PlaneUvTable {
    indices: HashMap<PlaneId, u32>,
    dots_per_meter: f32,
    angle_step: f32,
}

impl PlaneUvTable {
    pub fn new(dots_per_meter: f32, angle_step: f32) -> Self {
        Self {
            indices: HashMap::new(),
            dots_per_meter,
            angle_step,
        }
    }

    pub fn from_config(config: &PlaneConfig) -> Self {
        Self::new(config.dots_per_meter, config.angle_step)
    }

    /// Индекс плоскости; при первой встрече выдаётся следующий
    pub fn index_for(&mut self, plane: PlaneId) -> u32 {
        let next = self.indices.len() as u32;
        *self.indices.entry(plane).or_insert(next)
    }

    /// 2x2 матрица поворота UV (column-major) для плоскости
    pub fn uv_matrix(&mut self, plane: PlaneId) -> [f32; 4] {
        let index = self.index_for(plane);
        rotation_uv_matrix(index as f32 * self.angle_step, self.dots_per_meter)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// [cos*u, -sin*v, sin*u, cos*v], u = dots_per_meter, v = u / sqrt(3)
pub fn rotation_uv_matrix(angle_radians: f32, dots_per_meter: f32) -> [f32; 4] {
    let u_scale = dots_per_meter;
    let v_scale = dots_per_meter * EQUILATERAL_TRIANGLE_SCALE;
    let (sin, cos) = angle_radians.sin_cos();
    [cos * u_scale, -sin * v_scale, sin * u_scale, cos * v_scale]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_stable_and_sequential() {
        let mut table = PlaneUvTable::new(10.0, 0.144);
        assert_eq!(table.index_for(PlaneId(42)), 0);
        assert_eq!(table.index_for(PlaneId(7)), 1);
        assert_eq!(table.index_for(PlaneId(42)), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_first_plane_has_unrotated_grid() {
        let mut table = PlaneUvTable::new(10.0, 0.144);
        let m = table.uv_matrix(PlaneId(1));
        assert_eq!(m[0], 10.0);
        assert_eq!(m[2], 0.0);
        assert!((m[3] - 10.0 / 3f32.sqrt()).abs() < 1e-5);

        // Вторая плоскость повернута на 0.144 рад
        let m = table.uv_matrix(PlaneId(2));
        assert!((m[0] - 0.144f32.cos() * 10.0).abs() < 1e-5);
        assert!((m[2] - 0.144f32.sin() * 10.0).abs() < 1e-5);
    }
}
