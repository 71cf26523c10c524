// ============================================
// Point Cloud Stream - Потоковая загрузка облака точек
// ============================================
// Один и тот же снимок приходит много кадров подряд;
// перезагружаем только при смене timestamp.

use crate::overlay::buffer::GrowableBuffer;
use crate::overlay::core::PointCloudConfig;

use super::vertex::{CloudPoint, FLOATS_PER_POINT};

/// Снимок облака точек от трекинга
#[derive(Debug, Clone, Default)]
pub struct PointCloudSnapshot {
    pub timestamp: i64,
    /// Плоская последовательность x, y, z, confidence
    pub samples: Vec<f32>,
}

impl PointCloudSnapshot {
    pub fn new(timestamp: i64, samples: Vec<f32>) -> Self {
        Self { timestamp, samples }
    }
}

pub struct PointCloudStream {
    points: GrowableBuffer<CloudPoint>,
    /// None до первой загрузки
    last_timestamp: Option<i64>,
    /// Счётчик успешных загрузок
    upload_count: u64,
}

impl PointCloudStream {
    pub fn new(initial_points: usize) -> Self {
        Self {
            points: GrowableBuffer::new(initial_points),
            last_timestamp: None,
            upload_count: 0,
        }
    }

    pub fn from_config(config: &PointCloudConfig) -> Self {
        Self::new(config.initial_points)
    }

    /// Загрузить снимок. false - тот же timestamp, ничего не изменилось.
    pub fn update(&mut self, snapshot: &PointCloudSnapshot) -> bool {
        if self.last_timestamp == Some(snapshot.timestamp) {
            return false;
        }

        // Неполная последняя четвёрка отбрасывается
        let point_count = snapshot.samples.len() / FLOATS_PER_POINT;
        let samples = &snapshot.samples[..point_count * FLOATS_PER_POINT];

        self.points.ensure_capacity(point_count);
        self.points.write(bytemuck::cast_slice(samples));

        self.last_timestamp = Some(snapshot.timestamp);
        self.upload_count += 1;
        true
    }

    /// Точки последней загрузки
    #[inline]
    pub fn points(&self) -> &[CloudPoint] {
        self.points.as_slice()
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn buffer(&self) -> &GrowableBuffer<CloudPoint> {
        &self.points
    }

    #[inline]
    pub fn last_timestamp(&self) -> Option<i64> {
        self.last_timestamp
    }

    #[inline]
    pub fn upload_count(&self) -> u64 {
        self.upload_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(timestamp: i64, points: usize) -> PointCloudSnapshot {
        let samples = (0..points * 4).map(|i| i as f32).collect();
        PointCloudSnapshot::new(timestamp, samples)
    }

    #[test]
    fn test_same_timestamp_is_noop() {
        let mut stream = PointCloudStream::new(2);
        assert!(stream.update(&snapshot(10, 3)));
        let before: Vec<CloudPoint> = stream.points().to_vec();

        // Тот же timestamp, другие данные - игнорируется
        assert!(!stream.update(&snapshot(10, 50)));
        assert_eq!(stream.point_count(), 3);
        assert_eq!(stream.points(), &before[..]);
        assert_eq!(stream.upload_count(), 1);
    }

    #[test]
    fn test_new_timestamp_uploads_and_grows() {
        let mut stream = PointCloudStream::new(2);
        stream.update(&snapshot(1, 1));
        assert!(stream.update(&snapshot(2, 5)));
        assert_eq!(stream.point_count(), 5);
        assert_eq!(stream.buffer().capacity(), 8);
        assert_eq!(stream.points()[1], CloudPoint { x: 4.0, y: 5.0, z: 6.0, confidence: 7.0 });
        assert_eq!(stream.last_timestamp(), Some(2));
    }

    #[test]
    fn test_first_snapshot_with_zero_timestamp_uploads() {
        let mut stream = PointCloudStream::new(4);
        assert!(stream.update(&snapshot(0, 2)));
        assert_eq!(stream.point_count(), 2);
    }

    #[test]
    fn test_partial_tuple_dropped() {
        let mut stream = PointCloudStream::new(4);
        stream.update(&PointCloudSnapshot::new(3, vec![1.0, 2.0, 3.0, 0.5, 9.0, 9.0]));
        assert_eq!(stream.point_count(), 1);
    }

    #[test]
    fn test_empty_snapshot_clears_draw_range() {
        let mut stream = PointCloudStream::new(4);
        stream.update(&snapshot(1, 3));
        stream.update(&PointCloudSnapshot::new(2, Vec::new()));
        assert_eq!(stream.point_count(), 0);
        assert!(stream.points().is_empty());
    }
}
