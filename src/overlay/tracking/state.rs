// ============================================
// Tracking State - Состояние трекинга и его смены
// ============================================

/// Состояние трекинга камеры, плоскости или якоря
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingState {
    Tracking,
    Paused,
    Stopped,
}

impl TrackingState {
    #[inline]
    pub fn is_tracking(self) -> bool {
        self == TrackingState::Tracking
    }
}

/// Что делать с "не гасить экран"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepAwake {
    Enable,
    Disable,
}

/// Следит за сменой состояния трекинга камеры.
/// Сообщает только о переходах, повтор того же состояния - None.
#[derive(Debug, Default)]
pub struct TrackingStateWatcher {
    previous: Option<TrackingState>,
}

impl TrackingStateWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, state: TrackingState) -> Option<KeepAwake> {
        if self.previous == Some(state) {
            return None;
        }
        log::debug!("Camera tracking state: {:?} -> {:?}", self.previous, state);
        self.previous = Some(state);

        Some(match state {
            TrackingState::Tracking => KeepAwake::Enable,
            TrackingState::Paused | TrackingState::Stopped => KeepAwake::Disable,
        })
    }

    pub fn current(&self) -> Option<TrackingState> {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_only_transitions() {
        let mut watcher = TrackingStateWatcher::new();
        assert_eq!(watcher.update(TrackingState::Paused), Some(KeepAwake::Disable));
        assert_eq!(watcher.update(TrackingState::Paused), None);
        assert_eq!(watcher.update(TrackingState::Tracking), Some(KeepAwake::Enable));
        assert_eq!(watcher.update(TrackingState::Tracking), None);
        assert_eq!(watcher.update(TrackingState::Stopped), Some(KeepAwake::Disable));
        assert_eq!(watcher.current(), Some(TrackingState::Stopped));
    }
}
