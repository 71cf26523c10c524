// ============================================
// Capture Resolution - Выбор разрешения потока камеры
// ============================================
//
// 1. Если хоть один кандидат альбомный - переворачиваем ВСЕ
// 2. Оставляем только с числом пикселей > порога
// 3. Среди них (aspect <= лимита) - ближайший aspect к дисплею,
//    при равенстве - ближайшее число пикселей к желаемому
// 4. Никто не прошёл - максимум пикселей среди всех кандидатов

use crate::overlay::core::CaptureConfig;

/// Разрешение, поддерживаемое камерой
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateResolution {
    pub width: u32,
    pub height: u32,
}

impl CandidateResolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// height / width, 0 для вырожденного размера
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            0.0
        } else {
            self.height as f32 / self.width as f32
        }
    }

    #[inline]
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    #[inline]
    pub fn transposed(&self) -> Self {
        Self::new(self.height, self.width)
    }
}

#[derive(Debug, Clone)]
pub struct CaptureResolutionSelector {
    /// Порог и одновременно желаемое число пикселей
    min_pixel_count: u64,
    max_aspect_ratio: f32,
}

impl CaptureResolutionSelector {
    pub fn new(min_pixel_count: u64, max_aspect_ratio: f32) -> Self {
        Self { min_pixel_count, max_aspect_ratio }
    }

    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new(config.min_pixel_count, config.max_aspect_ratio)
    }

    /// Привести всех кандидатов к одной ориентации
    pub fn normalize(candidates: &[CandidateResolution]) -> Vec<CandidateResolution> {
        let should_flip = candidates.iter().any(|c| c.is_landscape());
        if should_flip {
            candidates.iter().map(|c| c.transposed()).collect()
        } else {
            candidates.to_vec()
        }
    }

    /// Выбрать разрешение. None только для пустого списка.
    pub fn select(
        &self,
        candidates: &[CandidateResolution],
        display_aspect: f32,
    ) -> Option<CandidateResolution> {
        let available = Self::normalize(candidates);

        let mut selected: Option<CandidateResolution> = None;
        for candidate in available.iter().copied() {
            if candidate.pixel_count() <= self.min_pixel_count
                || candidate.aspect_ratio() > self.max_aspect_ratio
            {
                continue;
            }

            let Some(current) = selected else {
                selected = Some(candidate);
                continue;
            };

            let candidate_delta = (display_aspect - candidate.aspect_ratio()).abs();
            let current_delta = (display_aspect - current.aspect_ratio()).abs();

            if candidate_delta < current_delta {
                selected = Some(candidate);
            } else if candidate_delta == current_delta
                && self.pixel_delta(&candidate) < self.pixel_delta(&current)
            {
                selected = Some(candidate);
            }
        }

        if let Some(size) = selected {
            log::info!("Capture resolution: {}x{}", size.width, size.height);
            return Some(size);
        }

        // Fallback: максимум пикселей, первый при равенстве
        let fallback = available.iter().copied().fold(None, |best: Option<CandidateResolution>, c| match best {
            Some(b) if b.pixel_count() >= c.pixel_count() => Some(b),
            _ => Some(c),
        });
        if let Some(size) = fallback {
            log::warn!(
                "No capture resolution above {} px within aspect {:.3}; using largest {}x{}",
                self.min_pixel_count,
                self.max_aspect_ratio,
                size.width,
                size.height
            );
        }
        fallback
    }

    #[inline]
    fn pixel_delta(&self, size: &CandidateResolution) -> u64 {
        self.min_pixel_count.abs_diff(size.pixel_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> CaptureResolutionSelector {
        CaptureResolutionSelector::from_config(&CaptureConfig::default())
    }

    fn r(width: u32, height: u32) -> CandidateResolution {
        CandidateResolution::new(width, height)
    }

    #[test]
    fn test_landscape_list_is_flipped() {
        let flipped = CaptureResolutionSelector::normalize(&[r(4000, 3000), r(1080, 1920)]);
        assert_eq!(flipped, vec![r(3000, 4000), r(1920, 1080)]);

        let portrait = CaptureResolutionSelector::normalize(&[r(3000, 4000)]);
        assert_eq!(portrait, vec![r(3000, 4000)]);
    }

    #[test]
    fn test_closest_aspect_wins() {
        // Дисплей 1080x2340 -> aspect 2.1667, лимит 16:9 -> ближе всего 16:9
        let candidates = [r(4000, 3000), r(4608, 2592), r(4000, 4000)];
        let chosen = selector().select(&candidates, 2340.0 / 1080.0).unwrap();
        assert_eq!(chosen, r(2592, 4608));
    }

    #[test]
    fn test_equal_aspect_prefers_pixel_count_near_target() {
        // Оба 4:3, 12 MP ближе к 8 MP чем 48 MP
        let candidates = [r(8000, 6000), r(4000, 3000)];
        let chosen = selector().select(&candidates, 4.0 / 3.0).unwrap();
        assert_eq!(chosen, r(3000, 4000));
    }

    #[test]
    fn test_exact_tie_keeps_first() {
        let candidates = [r(3000, 4000), r(3000, 4000)];
        assert_eq!(selector().select(&candidates, 1.0), Some(r(3000, 4000)));
    }

    #[test]
    fn test_fallback_to_largest_when_all_filtered() {
        let candidates = [r(640, 480), r(1920, 1080), r(1280, 720)];
        let chosen = selector().select(&candidates, 2.0).unwrap();
        assert_eq!(chosen, r(1080, 1920));
        assert!(chosen.pixel_count() > 0);
    }

    #[test]
    fn test_fallback_ignores_aspect_limit() {
        // Всё выше порога, но слишком вытянуто
        let candidates = [r(9000, 3000), r(10000, 2000)];
        let chosen = selector().select(&candidates, 1.5).unwrap();
        assert_eq!(chosen, r(3000, 9000));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(selector().select(&[], 1.5), None);
    }

    #[test]
    fn test_degenerate_aspect() {
        assert_eq!(r(0, 100).aspect_ratio(), 0.0);
        assert_eq!(r(100, 0).pixel_count(), 0);
    }
}
