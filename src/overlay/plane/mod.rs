// ============================================
// Plane Module - Меши отслеживаемых плоскостей
// ============================================
//
// - boundary: входные данные трекинга
// - tessellator: граница -> кольца + triangle strip
// - sorter: отбраковка и порядок дальние -> ближние
// - uv: поворот узора по стабильному индексу

pub mod boundary;
pub mod sorter;
pub mod tessellator;
pub mod uv;
pub mod vertex;

pub use boundary::{PlaneBoundary, PlaneId, TrackedPlane};
pub use sorter::{signed_distance, PlaneVisibilitySorter, SortablePlane};
pub use tessellator::{fade_scale, PlaneMesh, PlaneTessellator};
pub use uv::{rotation_uv_matrix, PlaneUvTable};
pub use vertex::PlaneVertex;
