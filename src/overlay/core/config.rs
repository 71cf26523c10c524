// ============================================
// Overlay Config - Data-Driven настройки из JSON
// ============================================
// Все поля имеют значения по умолчанию, поэтому JSON может
// содержать только то, что нужно переопределить.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::OverlayError;

/// Настройки мешей плоскостей
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    /// Ширина полосы затухания по краю плоскости (метры)
    pub fade_radius: f32,
    /// Начальная ёмкость буферов в вершинах границы
    pub initial_boundary_vertices: usize,
    /// Плотность точек сетки на текстуре плоскости
    pub dots_per_meter: f32,
    /// Шаг угла поворота узора для каждой новой плоскости (радианы)
    pub angle_step: f32,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            fade_radius: 0.25,
            initial_boundary_vertices: 64,
            dots_per_meter: 10.0,
            angle_step: 0.144,
        }
    }
}

/// Настройки облака точек
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PointCloudConfig {
    pub initial_points: usize,
}

impl Default for PointCloudConfig {
    fn default() -> Self {
        Self { initial_points: 1000 }
    }
}

/// Настройки выбора разрешения захвата
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Порог и одновременно желаемое число пикселей
    pub min_pixel_count: u64,
    /// Максимальное соотношение сторон (height / width)
    pub max_aspect_ratio: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            min_pixel_count: 8 * 1000 * 1000,
            max_aspect_ratio: 16.0 / 9.0,
        }
    }
}

/// Настройки якорей
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub max_anchors: usize,
    /// Масштаб модели, рисуемой в якоре
    pub anchor_scale: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            max_anchors: 20,
            anchor_scale: 1.0,
        }
    }
}

/// Полная конфигурация оверлея
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub plane: PlaneConfig,
    pub point_cloud: PointCloudConfig,
    pub capture: CaptureConfig,
    pub tracking: TrackingConfig,
}

impl OverlayConfig {
    /// Загрузить конфиг из JSON строки
    pub fn load_from_json(json: &str) -> Result<Self, OverlayError> {
        let config: OverlayConfig = serde_json::from_str(json)
            .map_err(|e| OverlayError::Config(format!("failed to parse JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Загрузить конфиг из файла
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, OverlayError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::load_from_json(&content)
    }

    /// Проверка значений, которые сломают геометрию или рост буферов
    pub fn validate(&self) -> Result<(), OverlayError> {
        if !(self.plane.fade_radius >= 0.0) {
            return Err(OverlayError::Config(format!(
                "plane.fade_radius must be >= 0, got {}",
                self.plane.fade_radius
            )));
        }
        if self.plane.initial_boundary_vertices == 0 {
            return Err(OverlayError::Config("plane.initial_boundary_vertices must be > 0".into()));
        }
        if self.point_cloud.initial_points == 0 {
            return Err(OverlayError::Config("point_cloud.initial_points must be > 0".into()));
        }
        if !(self.capture.max_aspect_ratio > 0.0) {
            return Err(OverlayError::Config(format!(
                "capture.max_aspect_ratio must be > 0, got {}",
                self.capture.max_aspect_ratio
            )));
        }
        if self.tracking.max_anchors == 0 {
            return Err(OverlayError::Config("tracking.max_anchors must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = OverlayConfig::load_from_json(r#"{ "plane": { "fade_radius": 0.1 } }"#).unwrap();
        assert_eq!(config.plane.fade_radius, 0.1);
        assert_eq!(config.plane.initial_boundary_vertices, 64);
        assert_eq!(config.point_cloud.initial_points, 1000);
        assert_eq!(config.capture.min_pixel_count, 8_000_000);
        assert_eq!(config.tracking.max_anchors, 20);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = OverlayConfig::load_from_json(r#"{ "tracking": { "max_anchors": 0 } }"#);
        assert!(matches!(err, Err(OverlayError::Config(_))));

        let err = OverlayConfig::load_from_json("not json");
        assert!(matches!(err, Err(OverlayError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = OverlayConfig::load_from_file("definitely_missing_overlay_config.json");
        assert!(matches!(err, Err(OverlayError::Io(_))));
    }
}
