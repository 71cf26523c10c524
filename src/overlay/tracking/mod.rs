// ============================================
// Tracking Module - Данные внешнего трекинга
// ============================================
//
// Сам трекинг (позы, якоря, hit-test) - внешний сервис.
// Здесь только типы, которые он отдаёт, и логика над ними.

pub mod anchors;
pub mod pose;
pub mod state;
pub mod trackable;

pub use anchors::{AnchorList, ColoredAnchor};
pub use pose::Pose;
pub use state::{KeepAwake, TrackingState, TrackingStateWatcher};
pub use trackable::{select_hit, AnchorColor, HitResult, PointOrientation, Trackable};
