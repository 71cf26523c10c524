// ============================================
// Anchors - Ограниченный список цветных якорей
// ============================================
// FIFO: при переполнении отсоединяется самый старый якорь.

use std::collections::VecDeque;

use ultraviolet::{Mat4, Vec3};

use crate::overlay::core::TrackingConfig;

use super::pose::Pose;
use super::state::TrackingState;
use super::trackable::{select_hit, AnchorColor, HitResult};

/// Якорь с цветом модели
#[derive(Debug, Clone, Copy)]
pub struct ColoredAnchor {
    pub pose: Pose,
    pub tracking_state: TrackingState,
    pub color: AnchorColor,
}

impl ColoredAnchor {
    pub fn new(pose: Pose, color: AnchorColor) -> Self {
        Self {
            pose,
            tracking_state: TrackingState::Tracking,
            color,
        }
    }

    /// Матрица модели с равномерным масштабом
    pub fn model_matrix(&self, scale: f32) -> Mat4 {
        self.pose.to_matrix() * Mat4::from_scale(scale)
    }
}

pub struct AnchorList {
    anchors: VecDeque<ColoredAnchor>,
    max_anchors: usize,
}

impl AnchorList {
    pub fn new(max_anchors: usize) -> Self {
        Self {
            anchors: VecDeque::with_capacity(max_anchors),
            max_anchors: max_anchors.max(1),
        }
    }

    pub fn from_config(config: &TrackingConfig) -> Self {
        Self::new(config.max_anchors)
    }

    /// Добавить якорь; возвращает вытесненный, если список был полон
    pub fn push(&mut self, anchor: ColoredAnchor) -> Option<ColoredAnchor> {
        let evicted = if self.anchors.len() >= self.max_anchors {
            self.anchors.pop_front()
        } else {
            None
        };
        if evicted.is_some() {
            log::debug!("Anchor limit {} reached, detaching oldest", self.max_anchors);
        }
        self.anchors.push_back(anchor);
        evicted
    }

    /// Тап: первый пригодный hit становится якорем цвета своего варианта
    pub fn place_from_hits(&mut self, hits: &[HitResult<'_>], camera_position: Vec3) -> bool {
        match select_hit(hits, camera_position) {
            Some(hit) => {
                self.push(ColoredAnchor::new(hit.pose, hit.trackable.anchor_color()));
                true
            }
            None => false,
        }
    }

    /// Якорь в позиции камеры, ориентированный по устройству.
    /// Лимит считается только для тапов: сюда он не применяется.
    pub fn place_at_camera(&mut self, camera_pose: &Pose) {
        self.anchors
            .push_back(ColoredAnchor::new(camera_pose.extract_translation(), AnchorColor::CAMERA));
    }

    /// Якоря на краях кадра: для каждого угла первый hit внутри плоскости.
    /// Как и якорь камеры, в обход лимита.
    pub fn place_photo_edges(&mut self, corner_hits: &[&[HitResult<'_>]]) -> usize {
        let mut placed = 0;
        for hits in corner_hits {
            if let Some(hit) = hits.iter().find(|hit| hit.is_inside_plane()) {
                self.anchors.push_back(ColoredAnchor::new(hit.pose, AnchorColor::PHOTO_EDGE));
                placed += 1;
            }
        }
        placed
    }

    /// Только отслеживаемые якоря - их и рисуем
    pub fn visible(&self) -> impl Iterator<Item = &ColoredAnchor> {
        self.anchors.iter().filter(|a| a.tracking_state.is_tracking())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ColoredAnchor> {
        self.anchors.iter_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}
