// Кадр оверлея целиком: сортировка, меши, облако точек, поворот узора

use ultraviolet::{Rotor3, Vec3};

use ar_overlay::overlay::plane::{rotation_uv_matrix, PlaneId, TrackedPlane};
use ar_overlay::overlay::points::PointCloudSnapshot;
use ar_overlay::overlay::tracking::{Pose, TrackingState};
use ar_overlay::{OverlayConfig, OverlayFrame};

fn square_plane(id: u64, center: Vec3) -> TrackedPlane {
    TrackedPlane {
        id: PlaneId(id),
        center_pose: Pose::from_translation(center),
        extent_x: 2.0,
        extent_z: 2.0,
        polygon: Some(vec![[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]]),
        tracking_state: TrackingState::Tracking,
        subsumed_by: None,
    }
}

/// Камера в начале координат, набор плоскостей на все случаи отбраковки
fn scene() -> Vec<TrackedPlane> {
    let far_floor = square_plane(1, Vec3::new(0.0, -2.0, 0.0));
    let near_floor = square_plane(2, Vec3::new(0.0, -1.0, 0.0));

    let mut merged = square_plane(3, Vec3::new(0.0, -3.0, 0.0));
    merged.subsumed_by = Some(PlaneId(1));

    let mut paused = square_plane(4, Vec3::new(0.0, -4.0, 0.0));
    paused.tracking_state = TrackingState::Paused;

    // Потолок смотрит вверх, камера под ним
    let ceiling = square_plane(5, Vec3::new(0.0, 1.0, 0.0));

    let mut fresh = square_plane(6, Vec3::new(0.0, -0.5, 0.0));
    fresh.polygon = None;

    vec![far_floor, near_floor, merged, paused, ceiling, fresh]
}

fn cloud(timestamp: i64, points: usize) -> PointCloudSnapshot {
    let samples = (0..points).flat_map(|i| [i as f32, 0.0, -1.0, 0.9]).collect();
    PointCloudSnapshot::new(timestamp, samples)
}

#[test]
fn test_frame_culls_and_orders_planes() {
    let mut frame = OverlayFrame::new(&OverlayConfig::default());
    let camera = Pose::identity();

    let stats = frame.update(&scene(), &camera, None);

    // far, near и без полигона; меш есть только у двух
    assert_eq!(stats.visible_planes, 3);
    assert_eq!(stats.drawable_planes, 2);

    let order: Vec<PlaneId> = frame.draws().map(|d| d.plane).collect();
    assert_eq!(order, vec![PlaneId(1), PlaneId(2)]);

    let distances: Vec<f32> = frame.draws().map(|d| d.distance).collect();
    assert_eq!(distances, vec![2.0, 1.0]);
}

#[test]
fn test_frame_meshes_and_draw_parameters() {
    let mut frame = OverlayFrame::new(&OverlayConfig::default());
    frame.update(&scene(), &Pose::identity(), None);

    for draw in frame.draws() {
        assert_eq!(draw.mesh.vertices().len(), 8);
        assert_eq!(draw.mesh.indices().len(), 12);
        assert_eq!(draw.normal, [0.0, 1.0, 0.0]);
    }

    let near = frame.draws().find(|d| d.plane == PlaneId(2)).expect("near floor is drawn");
    assert_eq!(near.model_matrix[3], [0.0, -1.0, 0.0, 1.0]);
}

#[test]
fn test_frame_uv_indices_are_stable() {
    let config = OverlayConfig::default();
    let mut frame = OverlayFrame::new(&config);
    let camera = Pose::identity();
    let planes = scene();

    frame.update(&planes, &camera, None);
    let first = frame.draws().find(|d| d.plane == PlaneId(1)).map(|d| d.uv_matrix);
    assert_eq!(
        first,
        Some(rotation_uv_matrix(0.0, config.plane.dots_per_meter))
    );
    assert_eq!(frame.uv_table().len(), 3);

    // Плоскость пропала и вернулась: индекс узора тот же
    frame.update(&planes[1..2], &camera, None);
    frame.update(&planes, &camera, None);
    let again = frame.draws().find(|d| d.plane == PlaneId(1)).map(|d| d.uv_matrix);
    assert_eq!(again, first);
    assert_eq!(frame.uv_table().len(), 3);
}

#[test]
fn test_frame_drops_slots_of_removed_planes() {
    let mut frame = OverlayFrame::new(&OverlayConfig::default());
    let camera = Pose::identity();
    let planes = scene();

    frame.update(&planes, &camera, None);
    assert_eq!(frame.slot_count(), 3);

    frame.update(&planes[1..2], &camera, None);
    assert_eq!(frame.slot_count(), 1);
    assert_eq!(frame.draws().count(), 1);
}

#[test]
fn test_frame_hides_plane_that_turned_away() {
    let mut frame = OverlayFrame::new(&OverlayConfig::default());
    let mut planes = vec![square_plane(1, Vec3::new(0.0, -1.0, 0.0))];

    frame.update(&planes, &Pose::identity(), None);
    assert_eq!(frame.draws().count(), 1);

    // Перевернули: нормаль вниз, камера сверху
    planes[0].center_pose = Pose::new(Vec3::new(0.0, -1.0, 0.0), Rotor3::from_rotation_xy(std::f32::consts::PI));
    let stats = frame.update(&planes, &Pose::identity(), None);
    assert_eq!(stats.visible_planes, 0);
    assert_eq!(frame.draws().count(), 0);
}

#[test]
fn test_frame_point_cloud_skips_repeated_snapshot() {
    let mut frame = OverlayFrame::new(&OverlayConfig::default());
    let camera = Pose::identity();

    let first = cloud(100, 3);
    let stats = frame.update(&[], &camera, Some(&first));
    assert!(stats.cloud_uploaded);
    assert_eq!(stats.point_count, 3);

    let stats = frame.update(&[], &camera, Some(&first));
    assert!(!stats.cloud_uploaded);
    assert_eq!(frame.point_cloud().upload_count(), 1);

    let stats = frame.update(&[], &camera, None);
    assert!(!stats.cloud_uploaded);
    assert_eq!(stats.point_count, 3);

    let stats = frame.update(&[], &camera, Some(&cloud(133, 5)));
    assert!(stats.cloud_uploaded);
    assert_eq!(stats.point_count, 5);
    assert_eq!(frame.point_cloud().points()[4].x, 4.0);
}
