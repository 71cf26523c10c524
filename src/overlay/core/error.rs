// ============================================
// Overlay Error - Ошибки подсистемы оверлея
// ============================================
// Пустой меш, неизменное облако точек и fallback разрешения
// ошибками НЕ являются. Сюда попадает только то, что вызывающий
// код может обработать: конфиг и невалидный кадр камеры.

use std::fmt;

/// Ошибки оверлея
#[derive(Debug)]
pub enum OverlayError {
    Io(std::io::Error),
    /// Не удалось разобрать конфиг
    Config(String),
    /// Метаданные YUV кадра не согласованы (страйды, crop, размер плоскости)
    MalformedImage(String),
}

impl From<std::io::Error> for OverlayError {
    fn from(e: std::io::Error) -> Self {
        OverlayError::Io(e)
    }
}

impl fmt::Display for OverlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayError::Io(e) => write!(f, "io error: {}", e),
            OverlayError::Config(msg) => write!(f, "invalid config: {}", msg),
            OverlayError::MalformedImage(msg) => write!(f, "malformed image: {}", msg),
        }
    }
}

impl std::error::Error for OverlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OverlayError::Io(e) => Some(e),
            _ => None,
        }
    }
}
