// ============================================
// Pose - Положение и ориентация в мировых координатах
// ============================================
// Поза приходит от внешнего трекинга; здесь только то,
// что нужно геометрии оверлея.

use ultraviolet::{Isometry3, Mat4, Rotor3, Vec3};

/// Жёсткое преобразование: сначала поворот, потом перенос
#[derive(Debug, Clone, Copy)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Rotor3,
}

impl Pose {
    pub fn new(translation: Vec3, rotation: Rotor3) -> Self {
        Self { translation, rotation }
    }

    pub fn identity() -> Self {
        Self::new(Vec3::zero(), Rotor3::identity())
    }

    /// Поза без поворота (якорь "по ориентации устройства")
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Rotor3::identity())
    }

    /// Та же позиция, поворот отброшен
    pub fn extract_translation(&self) -> Self {
        Self::from_translation(self.translation)
    }

    /// Локальная ось +Y в мировых координатах (нормаль плоскости)
    #[inline]
    pub fn y_axis(&self) -> Vec3 {
        self.rotation * Vec3::unit_y()
    }

    /// Точка из локальных координат в мировые
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.rotation * local + self.translation
    }

    /// Обратное преобразование
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.reversed();
        Self::new(rotation * -self.translation, rotation)
    }

    /// Матрица модели 4x4
    pub fn to_matrix(&self) -> Mat4 {
        Isometry3::new(self.translation, self.rotation).into_homogeneous_matrix()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}
