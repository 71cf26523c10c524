// ============================================
// Plane Visibility Sorter - Порядок отрисовки плоскостей
// ============================================
//
// Смешивание (ONE, ONE_MINUS_SRC_ALPHA) не коммутативно для
// перекрывающейся полупрозрачной геометрии, поэтому рисуем
// от дальних к ближним. Плоскости, повёрнутые от камеры, отбрасываем.

use ultraviolet::Vec3;

use crate::overlay::tracking::Pose;

use super::boundary::{PlaneId, TrackedPlane};

/// Плоскость с расстоянием до камеры (пересчитывается каждый кадр)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortablePlane {
    pub plane: PlaneId,
    /// Индекс во входном срезе плоскостей
    pub index: usize,
    pub distance: f32,
}

/// Знаковое расстояние от камеры до плоскости вдоль её нормали
#[inline]
pub fn signed_distance(plane_pose: &Pose, camera_position: Vec3) -> f32 {
    (camera_position - plane_pose.translation).dot(plane_pose.y_axis())
}

/// Фильтрация + сортировка дальние -> ближние
#[derive(Default)]
pub struct PlaneVisibilitySorter {
    sorted: Vec<SortablePlane>,
}

impl PlaneVisibilitySorter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(&mut self, planes: &[TrackedPlane], camera_position: Vec3) -> &[SortablePlane] {
        self.sorted.clear();

        for (index, plane) in planes.iter().enumerate() {
            if !plane.tracking_state.is_tracking() || plane.subsumed_by.is_some() {
                continue;
            }

            let distance = signed_distance(&plane.center_pose, camera_position);
            // Back-facing или камера в плоскости
            if !(distance > 0.0) {
                continue;
            }

            self.sorted.push(SortablePlane { plane: plane.id, index, distance });
        }

        self.sorted.sort_by(|a, b| b.distance.total_cmp(&a.distance));
        &self.sorted
    }

    /// Результат последней сортировки
    #[inline]
    pub fn sorted(&self) -> &[SortablePlane] {
        &self.sorted
    }
}
