// ============================================
// YUV420 Packer - Многоплоскостной кадр -> один буфер
// ============================================
//
// Выход (w*h*12/8 байт):
//   [0 .. w*h)        Y, полное разрешение, подряд
//   [w*h .. )         V U V U ... (V с w*h, U с w*h+1, шаг 2)
//
// Хрома в половинном разрешении по обеим осям (shift = 1).
// Раскладка должна совпадать с эталоном побайтно.

use crate::overlay::core::OverlayError;

/// Бит на пиксель для YUV 4:2:0
pub const YUV420_BITS_PER_PIXEL: usize = 12;

/// Одна плоскость кадра камеры
#[derive(Debug, Clone, Copy)]
pub struct YuvPlane<'a> {
    pub data: &'a [u8],
    pub row_stride: usize,
    pub pixel_stride: usize,
}

/// Прямоугольник валидной части кадра (right/bottom исключительно)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Кроп на весь кадр
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

/// Кадр YUV 4:2:0 (планы: 0 = Y, 1 = U, 2 = V).
/// Кадр принадлежит вызывающему и живёт до конца упаковки.
#[derive(Debug, Clone, Copy)]
pub struct YuvImage<'a> {
    pub planes: [YuvPlane<'a>; 3],
    pub crop: CropRect,
}

/// Упакованный кадр, готовый к конвертации в RGB и кодированию
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Параметры записи одной плоскости
struct PlaneLayout {
    channel_offset: usize,
    output_stride: usize,
    shift: u32,
}

#[inline]
fn plane_layout(plane_index: usize, width: usize, height: usize) -> PlaneLayout {
    match plane_index {
        0 => PlaneLayout { channel_offset: 0, output_stride: 1, shift: 0 },
        1 => PlaneLayout { channel_offset: width * height + 1, output_stride: 2, shift: 1 },
        _ => PlaneLayout { channel_offset: width * height, output_stride: 2, shift: 1 },
    }
}

pub struct Yuv420Packer;

impl Yuv420Packer {
    /// Размер выходного буфера
    #[inline]
    pub fn packed_size(width: usize, height: usize) -> usize {
        width * height * YUV420_BITS_PER_PIXEL / 8
    }

    /// Упаковать кадр.
    ///
    /// # Panics
    /// Если метаданные плоскостей не согласованы с их данными.
    /// Для недоверенного входа использовать `pack_checked`.
    pub fn pack(image: &YuvImage<'_>) -> PackedImage {
        let crop = image.crop;
        let width = crop.width() as usize;
        let height = crop.height() as usize;
        let mut output = vec![0u8; Self::packed_size(width, height)];

        for (plane_index, plane) in image.planes.iter().enumerate() {
            let layout = plane_layout(plane_index, width, height);
            let width_shifted = width >> layout.shift;
            let height_shifted = height >> layout.shift;
            if width_shifted == 0 || height_shifted == 0 {
                continue;
            }

            let mut channel_offset = layout.channel_offset;
            let mut position = plane.row_stride * (crop.top >> layout.shift) as usize
                + plane.pixel_stride * (crop.left >> layout.shift) as usize;

            for row in 0..height_shifted {
                let length;
                if plane.pixel_stride == 1 && layout.output_stride == 1 {
                    length = width_shifted;
                    output[channel_offset..channel_offset + length]
                        .copy_from_slice(&plane.data[position..position + length]);
                    channel_offset += length;
                } else {
                    length = (width_shifted - 1) * plane.pixel_stride + 1;
                    let row_data = &plane.data[position..position + length];
                    for col in 0..width_shifted {
                        // U начинается с w*h+1: при нечётных размерах хвост не влезает
                        if let Some(dst) = output.get_mut(channel_offset) {
                            *dst = row_data[col * plane.pixel_stride];
                        }
                        channel_offset += layout.output_stride;
                    }
                }

                position += length;
                if row < height_shifted - 1 {
                    position = position + plane.row_stride - length;
                }
            }
        }

        PackedImage {
            width: width as u32,
            height: height as u32,
            data: output,
        }
    }

    /// Проверка метаданных кадра на границе вызова
    pub fn validate(image: &YuvImage<'_>) -> Result<(), OverlayError> {
        let crop = image.crop;
        if crop.right < crop.left || crop.bottom < crop.top {
            return Err(OverlayError::MalformedImage(format!("inverted crop rect {:?}", crop)));
        }

        let width = crop.width() as usize;
        let height = crop.height() as usize;

        for (plane_index, plane) in image.planes.iter().enumerate() {
            let layout = plane_layout(plane_index, width, height);
            let width_shifted = width >> layout.shift;
            let height_shifted = height >> layout.shift;
            if width_shifted == 0 || height_shifted == 0 {
                continue;
            }

            if plane.pixel_stride == 0 || plane.row_stride == 0 {
                return Err(OverlayError::MalformedImage(format!(
                    "plane {}: zero stride (row {}, pixel {})",
                    plane_index, plane.row_stride, plane.pixel_stride
                )));
            }

            let overflow = || {
                OverlayError::MalformedImage(format!(
                    "plane {}: strides (row {}, pixel {}) with crop {:?} overflow",
                    plane_index, plane.row_stride, plane.pixel_stride, crop
                ))
            };

            let row_span = (width_shifted - 1)
                .checked_mul(plane.pixel_stride)
                .and_then(|span| span.checked_add(1))
                .ok_or_else(overflow)?;

            // Строка кропа целиком внутри строки плоскости (без заезда на следующую)
            let row_start = plane
                .pixel_stride
                .checked_mul((crop.left >> layout.shift) as usize)
                .ok_or_else(overflow)?;
            let row_end = row_start.checked_add(row_span).ok_or_else(overflow)?;
            if row_end > plane.row_stride {
                return Err(OverlayError::MalformedImage(format!(
                    "plane {}: crop {:?} reads {} bytes per row, row stride is {}",
                    plane_index, crop, row_end, plane.row_stride
                )));
            }

            let end = plane
                .row_stride
                .checked_mul((crop.top >> layout.shift) as usize + height_shifted - 1)
                .and_then(|rows| rows.checked_add(row_end))
                .ok_or_else(overflow)?;
            if end > plane.data.len() {
                return Err(OverlayError::MalformedImage(format!(
                    "plane {}: crop {:?} reads up to byte {}, plane has {}",
                    plane_index, crop, end, plane.data.len()
                )));
            }
        }
        Ok(())
    }

    /// validate + pack
    pub fn pack_checked(image: &YuvImage<'_>) -> Result<PackedImage, OverlayError> {
        Self::validate(image)?;
        Ok(Self::pack(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_size() {
        assert_eq!(Yuv420Packer::packed_size(4, 4), 24);
        assert_eq!(Yuv420Packer::packed_size(1920, 1080), 1920 * 1080 * 3 / 2);
    }

    #[test]
    fn test_contiguous_planar_chroma() {
        // I420: хрома с pixel_stride = 1 всё равно идёт через поэлементный путь
        let y: Vec<u8> = (0..16).collect();
        let u = [50, 51, 52, 53];
        let v = [60, 61, 62, 63];
        let image = YuvImage {
            planes: [
                YuvPlane { data: &y, row_stride: 4, pixel_stride: 1 },
                YuvPlane { data: &u, row_stride: 2, pixel_stride: 1 },
                YuvPlane { data: &v, row_stride: 2, pixel_stride: 1 },
            ],
            crop: CropRect::full(4, 4),
        };

        let packed = Yuv420Packer::pack(&image);
        assert_eq!(&packed.data[16..], &[60, 50, 61, 51, 62, 52, 63, 53]);
    }

    #[test]
    fn test_row_padding_is_skipped() {
        // row_stride 6 при ширине 4: два байта мусора в конце строки
        let y: Vec<u8> = vec![
            1, 2, 3, 4, 99, 99,
            5, 6, 7, 8, 99, 99,
        ];
        let c = [7, 99, 99];
        let image = YuvImage {
            planes: [
                YuvPlane { data: &y, row_stride: 6, pixel_stride: 1 },
                YuvPlane { data: &c, row_stride: 3, pixel_stride: 1 },
                YuvPlane { data: &c, row_stride: 3, pixel_stride: 1 },
            ],
            crop: CropRect::full(4, 2),
        };
        let packed = Yuv420Packer::pack_checked(&image).unwrap();
        assert_eq!(&packed.data[..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(packed.data.len(), 12);
    }

    #[test]
    fn test_validate_rejects_short_plane() {
        let y = [0u8; 8];
        let c = [0u8; 2];
        let image = YuvImage {
            planes: [
                YuvPlane { data: &y, row_stride: 4, pixel_stride: 1 },
                YuvPlane { data: &c, row_stride: 2, pixel_stride: 2 },
                YuvPlane { data: &c, row_stride: 2, pixel_stride: 2 },
            ],
            crop: CropRect::full(4, 4),
        };
        assert!(matches!(Yuv420Packer::validate(&image), Err(OverlayError::MalformedImage(_))));
    }

    #[test]
    fn test_validate_rejects_zero_stride_and_inverted_crop() {
        let y = [0u8; 16];
        let c = [0u8; 4];
        let mut image = YuvImage {
            planes: [
                YuvPlane { data: &y, row_stride: 4, pixel_stride: 0 },
                YuvPlane { data: &c, row_stride: 2, pixel_stride: 1 },
                YuvPlane { data: &c, row_stride: 2, pixel_stride: 1 },
            ],
            crop: CropRect::full(4, 4),
        };
        assert!(Yuv420Packer::pack_checked(&image).is_err());

        image.planes[0].pixel_stride = 1;
        assert!(Yuv420Packer::validate(&image).is_ok());

        image.crop = CropRect::new(3, 0, 1, 4);
        assert!(Yuv420Packer::validate(&image).is_err());
    }

    #[test]
    fn test_empty_crop_gives_empty_image() {
        let y = [0u8; 16];
        let c = [0u8; 4];
        let image = YuvImage {
            planes: [
                YuvPlane { data: &y, row_stride: 4, pixel_stride: 1 },
                YuvPlane { data: &c, row_stride: 2, pixel_stride: 1 },
                YuvPlane { data: &c, row_stride: 2, pixel_stride: 1 },
            ],
            crop: CropRect::new(2, 2, 2, 2),
        };
        let packed = Yuv420Packer::pack_checked(&image).unwrap();
        assert!(packed.data.is_empty());
    }

    #[test]
    fn test_validate_rejects_crop_past_right_edge() {
        // Кроп 4 пикселя шириной со сдвигом 2 при row_stride 4: строка уехала бы в следующую
        let y: Vec<u8> = (0..16).collect();
        let c = [0u8; 8];
        let mut image = YuvImage {
            planes: [
                YuvPlane { data: &y, row_stride: 4, pixel_stride: 1 },
                YuvPlane { data: &c, row_stride: 4, pixel_stride: 2 },
                YuvPlane { data: &c, row_stride: 4, pixel_stride: 2 },
            ],
            crop: CropRect::new(2, 0, 6, 2),
        };
        assert!(matches!(Yuv420Packer::pack_checked(&image), Err(OverlayError::MalformedImage(_))));

        // Тот же сдвиг в пределах строки - допустим
        image.crop = CropRect::new(2, 0, 4, 2);
        let packed = Yuv420Packer::pack_checked(&image).unwrap();
        assert_eq!(&packed.data[..4], &[2, 3, 6, 7]);
    }

    #[test]
    fn test_validate_reports_stride_overflow() {
        let y = [0u8; 16];
        let c = [0u8; 4];
        let mut image = YuvImage {
            planes: [
                YuvPlane { data: &y, row_stride: usize::MAX / 2, pixel_stride: 1 },
                YuvPlane { data: &c, row_stride: 2, pixel_stride: 1 },
                YuvPlane { data: &c, row_stride: 2, pixel_stride: 1 },
            ],
            crop: CropRect::new(0, 4, 4, 8),
        };
        assert!(matches!(Yuv420Packer::validate(&image), Err(OverlayError::MalformedImage(_))));

        image.planes[0].row_stride = 4;
        image.planes[0].pixel_stride = usize::MAX;
        image.crop = CropRect::full(4, 4);
        assert!(matches!(Yuv420Packer::validate(&image), Err(OverlayError::MalformedImage(_))));
    }
}
