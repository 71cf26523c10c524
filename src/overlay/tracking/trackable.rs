// ============================================
// Trackable - Во что попал тап
// ============================================
// Тагированный вариант вместо проверки типов во время выполнения:
// каждый вариант сам знает, годится ли попадание и каким цветом
// рисовать якорь.

use ultraviolet::Vec3;

use crate::overlay::plane::{signed_distance, TrackedPlane};

use super::pose::Pose;

/// Цвет якоря RGBA8
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorColor(pub [u8; 4]);

impl AnchorColor {
    pub const POINT: AnchorColor = AnchorColor([66, 133, 244, 255]);
    pub const PLANE: AnchorColor = AnchorColor([139, 195, 74, 255]);
    /// Якорь в позиции камеры
    pub const CAMERA: AnchorColor = AnchorColor([209, 91, 23, 255]);
    /// Якорь на краю кадра фотографии
    pub const PHOTO_EDGE: AnchorColor = AnchorColor([14, 57, 230, 255]);

    /// Для шейдера: компоненты в [0, 1]
    pub fn to_unit_rgba(self) -> [f32; 4] {
        let [r, g, b, a] = self.0;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0]
    }
}

/// Ориентация точки облака
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointOrientation {
    InitializedToIdentity,
    EstimatedSurfaceNormal,
}

/// Объект трекинга, в который попал луч
#[derive(Debug, Clone, Copy)]
pub enum Trackable<'a> {
    Plane(&'a TrackedPlane),
    Point { orientation: PointOrientation },
}

impl<'a> Trackable<'a> {
    pub fn anchor_color(&self) -> AnchorColor {
        match self {
            Trackable::Plane(_) => AnchorColor::PLANE,
            Trackable::Point { .. } => AnchorColor::POINT,
        }
    }
}

/// Результат hit-test от трекинга
#[derive(Debug, Clone, Copy)]
pub struct HitResult<'a> {
    pub pose: Pose,
    pub trackable: Trackable<'a>,
}

impl<'a> HitResult<'a> {
    /// Годится ли попадание для якоря:
    /// - плоскость: внутри полигона и лицом к камере
    /// - точка: только с оценённой нормалью поверхности
    pub fn is_placeable(&self, camera_position: Vec3) -> bool {
        match self.trackable {
            Trackable::Plane(plane) => {
                plane.contains_point(self.pose.translation)
                    && signed_distance(&self.pose, camera_position) > 0.0
            }
            Trackable::Point { orientation } => orientation == PointOrientation::EstimatedSurfaceNormal,
        }
    }

    /// Попадание в плоскость внутри полигона (без проверки ориентации)
    pub fn is_inside_plane(&self) -> bool {
        match self.trackable {
            Trackable::Plane(plane) => plane.contains_point(self.pose.translation),
            Trackable::Point { .. } => false,
        }
    }
}

/// Первое пригодное попадание (hits отсортированы по расстоянию)
pub fn select_hit<'h, 'a>(hits: &'h [HitResult<'a>], camera_position: Vec3) -> Option<&'h HitResult<'a>> {
    hits.iter().find(|hit| hit.is_placeable(camera_position))
}
