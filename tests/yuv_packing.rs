// Побайтная раскладка упакованного YUV кадра

use ar_overlay::overlay::capture::{CropRect, YuvImage, YuvPlane};
use ar_overlay::overlay::OverlayError;
use ar_overlay::Yuv420Packer;

const LUMA: [u8; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

/// 4x4 кадр: хрома 2x2 с pixel_stride 2, как у большинства камер
fn image<'a>(u: &'a [u8], v: &'a [u8], crop: CropRect) -> YuvImage<'a> {
    YuvImage {
        planes: [
            YuvPlane { data: &LUMA, row_stride: 4, pixel_stride: 1 },
            YuvPlane { data: u, row_stride: 4, pixel_stride: 2 },
            YuvPlane { data: v, row_stride: 4, pixel_stride: 2 },
        ],
        crop,
    }
}

#[test]
fn test_golden_4x4_separate_chroma_planes() {
    let u: [u8; 8] = [100, 0, 101, 0, 102, 0, 103, 0];
    let v: [u8; 8] = [200, 0, 201, 0, 202, 0, 203, 0];

    let packed = Yuv420Packer::pack_checked(&image(&u, &v, CropRect::full(4, 4))).expect("valid image");

    assert_eq!(packed.width, 4);
    assert_eq!(packed.height, 4);
    assert_eq!(packed.data.len(), 24);
    assert_eq!(&packed.data[..16], &LUMA[..]);
    assert_eq!(&packed.data[16..], &[200, 100, 201, 101, 202, 102, 203, 103]);
}

#[test]
fn test_golden_4x4_interleaved_vu_buffer() {
    // U и V - окна одного VU буфера со сдвигом в байт
    let vu: [u8; 8] = [200, 100, 201, 101, 202, 102, 203, 103];

    let packed = Yuv420Packer::pack_checked(&image(&vu[1..], &vu, CropRect::full(4, 4))).expect("valid image");

    assert_eq!(&packed.data[16..], &vu[..]);
}

#[test]
fn test_crop_offsets_every_plane() {
    let u: [u8; 8] = [100, 0, 101, 0, 102, 0, 103, 0];
    let v: [u8; 8] = [200, 0, 201, 0, 202, 0, 203, 0];

    let packed = Yuv420Packer::pack(&image(&u, &v, CropRect::new(2, 2, 4, 4)));

    assert_eq!(packed.width, 2);
    assert_eq!(packed.height, 2);
    assert_eq!(packed.data, vec![10, 11, 14, 15, 203, 103]);
}

#[test]
fn test_truncated_chroma_is_rejected() {
    let u: [u8; 3] = [100, 0, 101];
    let v: [u8; 8] = [200, 0, 201, 0, 202, 0, 203, 0];

    let result = Yuv420Packer::pack_checked(&image(&u, &v, CropRect::full(4, 4)));
    assert!(matches!(result, Err(OverlayError::MalformedImage(_))));
}
