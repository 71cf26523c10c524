// ============================================
// Plane Boundary - Отслеживаемая плоскость и её граница
// ============================================
// Граница - упорядоченный полигон (x, z) в локальных
// координатах плоскости вокруг её центра.

use ultraviolet::Vec3;

use crate::overlay::tracking::{Pose, TrackingState};

/// Стабильный идентификатор плоскости от трекинга
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneId(pub u64);

/// Плоскость, как её отдаёт внешний трекинг за один кадр
#[derive(Debug, Clone)]
pub struct TrackedPlane {
    pub id: PlaneId,
    pub center_pose: Pose,
    pub extent_x: f32,
    pub extent_z: f32,
    /// Полигона ещё может не быть
    pub polygon: Option<Vec<[f32; 2]>>,
    pub tracking_state: TrackingState,
    /// Плоскость поглощена другой (после слияния)
    pub subsumed_by: Option<PlaneId>,
}

impl TrackedPlane {
    /// Нормаль = локальная ось +Y позы центра
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.center_pose.y_axis()
    }

    /// Граница для построения меша (None, если полигона нет)
    pub fn boundary(&self) -> Option<PlaneBoundary<'_>> {
        self.polygon.as_deref().map(|points| PlaneBoundary {
            points,
            extent_x: self.extent_x,
            extent_z: self.extent_z,
            pose: self.center_pose,
        })
    }

    /// Лежит ли мировая точка внутри полигона (проекция на плоскость)
    pub fn contains_point(&self, world: Vec3) -> bool {
        match self.boundary() {
            Some(boundary) => {
                let local = self.center_pose.inverse().transform_point(world);
                boundary.contains_local(local.x, local.z)
            }
            None => false,
        }
    }
}

/// Только чтение на время построения меша / отрисовки
#[derive(Debug, Clone, Copy)]
pub struct PlaneBoundary<'a> {
    pub points: &'a [[f32; 2]],
    pub extent_x: f32,
    pub extent_z: f32,
    pub pose: Pose,
}

impl<'a> PlaneBoundary<'a> {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Even-odd тест точки в полигоне
    pub fn contains_local(&self, x: f32, z: f32) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let [xi, zi] = self.points[i];
            let [xj, zj] = self.points[j];
            if (zi > z) != (zj > z) && x < (xj - xi) * (z - zi) / (zj - zi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_plane() -> TrackedPlane {
        TrackedPlane {
            id: PlaneId(1),
            center_pose: Pose::from_translation(Vec3::new(0.0, -1.0, 0.0)),
            extent_x: 1.0,
            extent_z: 1.0,
            polygon: Some(vec![[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]]),
            tracking_state: TrackingState::Tracking,
            subsumed_by: None,
        }
    }

    #[test]
    fn test_contains_point_in_plane_frame() {
        let plane = square_plane();
        assert!(plane.contains_point(Vec3::new(0.2, -1.0, -0.3)));
        assert!(!plane.contains_point(Vec3::new(0.7, -1.0, 0.0)));
    }

    #[test]
    fn test_no_polygon_contains_nothing() {
        let mut plane = square_plane();
        plane.polygon = None;
        assert!(plane.boundary().is_none());
        assert!(!plane.contains_point(Vec3::new(0.0, -1.0, 0.0)));
    }
}
