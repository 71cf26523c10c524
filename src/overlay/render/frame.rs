// ============================================
// Overlay Frame - Обновление геометрии за кадр
// ============================================
//
// Порядок:
// 1. Сортировка плоскостей (отбраковка + дальние -> ближние)
// 2. Слоты мешей для видимых плоскостей + поворот узора
// 3. Параллельная перестройка мешей (у каждого слота свои буферы)
// 4. Облако точек (если пришёл новый снимок)
//
// update() и чтение (draws) разделены &mut / &:
// пока идёт перестройка, рисовать нельзя.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::overlay::core::OverlayConfig;
use crate::overlay::plane::{
    PlaneId, PlaneMesh, PlaneTessellator, PlaneUvTable, PlaneVisibilitySorter, SortablePlane, TrackedPlane,
};
use crate::overlay::points::{PointCloudSnapshot, PointCloudStream};
use crate::overlay::tracking::Pose;

/// Меш и параметры отрисовки одной плоскости
struct PlaneSlot {
    mesh: PlaneMesh,
    model_matrix: [[f32; 4]; 4],
    normal: [f32; 3],
    uv_matrix: [f32; 4],
    distance: f32,
}

impl PlaneSlot {
    fn new(initial_boundary_vertices: usize) -> Self {
        Self {
            mesh: PlaneMesh::new(initial_boundary_vertices),
            model_matrix: [[0.0; 4]; 4],
            normal: [0.0, 1.0, 0.0],
            uv_matrix: [0.0; 4],
            distance: 0.0,
        }
    }

    fn rebuild(&mut self, tessellator: &PlaneTessellator, plane: &TrackedPlane) {
        self.model_matrix = plane.center_pose.to_matrix().into();
        self.normal = plane.normal().into();
        tessellator.rebuild(plane.boundary().as_ref(), &mut self.mesh);
    }
}

/// Всё, что нужно бэкенду для отрисовки одной плоскости
#[derive(Clone, Copy)]
pub struct PlaneDraw<'a> {
    pub plane: PlaneId,
    pub distance: f32,
    pub mesh: &'a PlaneMesh,
    pub model_matrix: [[f32; 4]; 4],
    pub normal: [f32; 3],
    /// 2x2 поворот UV узора (column-major)
    pub uv_matrix: [f32; 4],
}

/// Статистика кадра (для логов)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub visible_planes: usize,
    pub drawable_planes: usize,
    pub cloud_uploaded: bool,
    pub point_count: usize,
}

pub struct OverlayFrame {
    tessellator: PlaneTessellator,
    sorter: PlaneVisibilitySorter,
    uv_table: PlaneUvTable,
    slots: HashMap<PlaneId, PlaneSlot>,
    draw_order: Vec<PlaneId>,
    point_cloud: PointCloudStream,
    initial_boundary_vertices: usize,
}

impl OverlayFrame {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            tessellator: PlaneTessellator::from_config(&config.plane),
            sorter: PlaneVisibilitySorter::new(),
            uv_table: PlaneUvTable::from_config(&config.plane),
            slots: HashMap::new(),
            draw_order: Vec::new(),
            point_cloud: PointCloudStream::from_config(&config.point_cloud),
            initial_boundary_vertices: config.plane.initial_boundary_vertices,
        }
    }

    /// Обновить геометрию по данным трекинга за кадр
    pub fn update(
        &mut self,
        planes: &[TrackedPlane],
        camera: &Pose,
        cloud: Option<&PointCloudSnapshot>,
    ) -> FrameStats {
        let sorted: Vec<SortablePlane> = self.sorter.sort(planes, camera.translation).to_vec();

        // Плоскости, которых трекинг больше не отдаёт, - освобождаем слоты
        let present: HashSet<PlaneId> = planes.iter().map(|p| p.id).collect();
        self.slots.retain(|id, _| present.contains(id));

        let mut visible: HashMap<PlaneId, usize> = HashMap::with_capacity(sorted.len());
        for entry in &sorted {
            let uv_matrix = self.uv_table.uv_matrix(entry.plane);
            let initial = self.initial_boundary_vertices;
            let slot = self.slots.entry(entry.plane).or_insert_with(|| PlaneSlot::new(initial));
            slot.uv_matrix = uv_matrix;
            slot.distance = entry.distance;
            visible.insert(entry.plane, entry.index);
        }

        let tessellator = &self.tessellator;
        self.slots.par_iter_mut().for_each(|(id, slot)| match visible.get(id) {
            Some(&index) => slot.rebuild(tessellator, &planes[index]),
            None => slot.mesh.clear(),
        });

        self.draw_order.clear();
        self.draw_order.extend(sorted.iter().map(|s| s.plane));

        let cloud_uploaded = match cloud {
            Some(snapshot) => self.point_cloud.update(snapshot),
            None => false,
        };

        let stats = FrameStats {
            visible_planes: sorted.len(),
            drawable_planes: self.draws().count(),
            cloud_uploaded,
            point_count: self.point_cloud.point_count(),
        };
        log::trace!("Overlay frame: {:?}", stats);
        stats
    }

    /// Плоскости в порядке отрисовки (дальние первыми), пустые пропущены
    pub fn draws(&self) -> impl Iterator<Item = PlaneDraw<'_>> + '_ {
        self.draw_order.iter().filter_map(move |&plane| {
            let slot = self.slots.get(&plane)?;
            if slot.mesh.is_empty() {
                return None;
            }
            Some(PlaneDraw {
                plane,
                distance: slot.distance,
                mesh: &slot.mesh,
                model_matrix: slot.model_matrix,
                normal: slot.normal,
                uv_matrix: slot.uv_matrix,
            })
        })
    }

    #[inline]
    pub fn point_cloud(&self) -> &PointCloudStream {
        &self.point_cloud
    }

    #[inline]
    pub fn uv_table(&self) -> &PlaneUvTable {
        &self.uv_table
    }

    /// Сколько плоскостей держат меш в памяти
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
