// ============================================
// AR Overlay Demo - Синтетическая сессия без камеры
// ============================================
// Запуск: RUST_LOG=info ar-overlay-demo [config.json]
//
// Трекинг и камера подменены сгенерированными данными,
// GPU - headless адаптер, если он есть (кадры рисуются в offscreen текстуру).

mod preview;

use std::env;
use std::f32::consts::{FRAC_PI_2, TAU};

use ultraviolet::{Rotor3, Vec3};

use ar_overlay::overlay::capture::{CandidateResolution, CaptureResolutionSelector, CropRect, Yuv420Packer, YuvImage, YuvPlane};
use ar_overlay::overlay::plane::{PlaneId, TrackedPlane};
use ar_overlay::overlay::points::PointCloudSnapshot;
use ar_overlay::overlay::render::OverlayFrame;
use ar_overlay::overlay::tracking::{
    AnchorList, HitResult, KeepAwake, PointOrientation, Pose, Trackable, TrackingState, TrackingStateWatcher,
};
use ar_overlay::overlay::OverlayConfig;

use preview::OverlayPreview;

const DEMO_FRAMES: usize = 6;

fn main() {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => match OverlayConfig::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => OverlayConfig::default(),
    };

    select_capture_resolution(&config);

    let gpu = init_headless_gpu();
    run_session(&config, gpu.as_ref());

    pack_sample_frame();
}

/// Headless устройство для проверки загрузки буферов
fn init_headless_gpu() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::warn!("No GPU adapter ({}), running CPU-only", e);
                return None;
            }
        };

        match adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Overlay Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
        {
            Ok(pair) => Some(pair),
            Err(e) => {
                log::warn!("GPU device request failed ({}), running CPU-only", e);
                None
            }
        }
    })
}

fn select_capture_resolution(config: &OverlayConfig) {
    // Типичный набор YUV_420_888 размеров телефона (альбомные)
    let candidates = [
        CandidateResolution::new(640, 480),
        CandidateResolution::new(1920, 1080),
        CandidateResolution::new(4000, 3000),
        CandidateResolution::new(4032, 2268),
        CandidateResolution::new(8000, 6000),
    ];
    let display_aspect = 2340.0 / 1080.0;

    let selector = CaptureResolutionSelector::from_config(&config.capture);
    if let Some(size) = selector.select(&candidates, display_aspect) {
        log::info!("Capture stream: {}x{} ({} px)", size.width, size.height, size.pixel_count());
    }
}

/// Правильный многоугольник, растущий с номером кадра
fn polygon(vertices: usize, radius: f32) -> Vec<[f32; 2]> {
    (0..vertices)
        .map(|i| {
            let a = i as f32 / vertices as f32 * TAU;
            [a.cos() * radius, a.sin() * radius]
        })
        .collect()
}

fn synthetic_planes(frame: usize) -> Vec<TrackedPlane> {
    let grow = frame as f32 * 0.1;

    let floor = TrackedPlane {
        id: PlaneId(1),
        center_pose: Pose::from_translation(Vec3::new(0.0, -1.4, -1.0)),
        extent_x: 3.0 + 2.0 * grow,
        extent_z: 3.0 + 2.0 * grow,
        polygon: Some(polygon(8 + frame * 12, 1.5 + grow)),
        tracking_state: TrackingState::Tracking,
        subsumed_by: None,
    };
    let table = TrackedPlane {
        id: PlaneId(2),
        center_pose: Pose::from_translation(Vec3::new(0.3, -0.7, -0.8)),
        extent_x: 0.4,
        extent_z: 0.6,
        polygon: Some(vec![[-0.2, -0.3], [0.2, -0.3], [0.2, 0.3], [-0.2, 0.3]]),
        tracking_state: TrackingState::Tracking,
        subsumed_by: None,
    };
    let wall = TrackedPlane {
        id: PlaneId(3),
        center_pose: Pose::new(Vec3::new(0.0, 0.0, -2.5), Rotor3::from_rotation_yz(FRAC_PI_2)),
        extent_x: 2.0,
        extent_z: 2.0,
        // Полигон появляется не сразу
        polygon: (frame > 1).then(|| polygon(6, 1.0)),
        tracking_state: TrackingState::Tracking,
        subsumed_by: None,
    };
    let merged = TrackedPlane {
        id: PlaneId(4),
        center_pose: Pose::from_translation(Vec3::new(1.0, -1.4, -1.0)),
        extent_x: 1.0,
        extent_z: 1.0,
        polygon: Some(polygon(5, 0.5)),
        tracking_state: TrackingState::Tracking,
        subsumed_by: Some(PlaneId(1)),
    };

    vec![floor, table, wall, merged]
}

fn synthetic_cloud(frame: usize) -> PointCloudSnapshot {
    // Новый снимок раз в два кадра
    let timestamp = (frame / 2) as i64 * 33_000_000;
    let count = 200 + frame * 400;
    let samples = (0..count)
        .flat_map(|i| {
            let t = i as f32 * 0.37;
            [t.sin() * 2.0, -1.4 + (t * 0.5).cos() * 0.05, -1.0 + t.cos() * 2.0, 0.5 + 0.5 * (t * 3.0).sin()]
        })
        .collect();
    PointCloudSnapshot::new(timestamp, samples)
}

fn run_session(config: &OverlayConfig, gpu: Option<&(wgpu::Device, wgpu::Queue)>) {
    let mut frame_state = OverlayFrame::new(config);
    let mut preview = gpu.map(|(device, _)| OverlayPreview::new(device, config));
    let mut anchors = AnchorList::from_config(&config.tracking);
    let mut watcher = TrackingStateWatcher::new();

    for frame in 0..DEMO_FRAMES {
        let camera_state = if frame == 0 { TrackingState::Paused } else { TrackingState::Tracking };
        if let Some(action) = watcher.update(camera_state) {
            log::info!("Keep screen on: {}", action == KeepAwake::Enable);
        }
        if camera_state == TrackingState::Paused {
            continue;
        }

        let camera = Pose::from_translation(Vec3::new(0.05 * frame as f32, 0.0, 0.0));
        let planes = synthetic_planes(frame);
        let cloud = synthetic_cloud(frame);

        let stats = frame_state.update(&planes, &camera, Some(&cloud));
        log::info!(
            "Frame {}: {} visible, {} drawable, cloud {} ({} points)",
            frame,
            stats.visible_planes,
            stats.drawable_planes,
            if stats.cloud_uploaded { "uploaded" } else { "unchanged" },
            stats.point_count
        );

        for draw in frame_state.draws() {
            log::debug!(
                "  plane {:?}: distance {:.2}, {} vertices, {} indices",
                draw.plane,
                draw.distance,
                draw.mesh.vertices().len(),
                draw.mesh.indices().len()
            );
        }

        // Тап на каждом третьем кадре: сначала точка без нормали, потом пол
        if frame % 3 == 2 {
            let hits = [
                HitResult {
                    pose: Pose::from_translation(Vec3::new(0.1, -0.2, -1.0)),
                    trackable: Trackable::Point { orientation: PointOrientation::InitializedToIdentity },
                },
                HitResult {
                    pose: Pose::from_translation(Vec3::new(0.2, -1.4, -1.2)),
                    trackable: Trackable::Plane(&planes[0]),
                },
            ];
            if anchors.place_from_hits(&hits, camera.translation) {
                log::info!("Anchor placed, {} total", anchors.len());
            }
        }

        if let (Some((device, queue)), Some(preview)) = (gpu, preview.as_mut()) {
            let uploaded = preview.render(device, queue, &frame_state, &camera);
            log::info!(
                "  GPU: {} planes drawn ({} held), cloud {}, {} buffers recreated",
                uploaded.planes,
                preview.plane_count(),
                if uploaded.cloud_uploaded { "re-uploaded" } else { "kept" },
                uploaded.recreated
            );
        }
    }

    for anchor in anchors.visible() {
        let model = anchor.model_matrix(config.tracking.anchor_scale);
        log::info!("Anchor {:?} at {:?}", anchor.color, model.cols[3]);
    }
    log::info!("Plane UV table holds {} planes", frame_state.uv_table().len());
}

/// 8x4 кадр с полуплоскостями в виде чередующихся U/V (pixel_stride 2)
fn pack_sample_frame() {
    let width = 8usize;
    let height = 4usize;
    let y: Vec<u8> = (0..(width * height) as u8).collect();
    let chroma: Vec<u8> = (0..width * height / 2).map(|i| 128 + i as u8).collect();

    let image = YuvImage {
        planes: [
            YuvPlane { data: &y, row_stride: width, pixel_stride: 1 },
            YuvPlane { data: &chroma, row_stride: width, pixel_stride: 2 },
            YuvPlane { data: &chroma[1..], row_stride: width, pixel_stride: 2 },
        ],
        crop: CropRect::full(width as u32, height as u32),
    };

    match Yuv420Packer::pack_checked(&image) {
        Ok(packed) => log::info!(
            "Packed {}x{} frame into {} bytes (chroma starts {:?})",
            packed.width,
            packed.height,
            packed.data.len(),
            &packed.data[width * height..width * height + 4]
        ),
        Err(e) => log::error!("Failed to pack frame: {}", e),
    }
}
