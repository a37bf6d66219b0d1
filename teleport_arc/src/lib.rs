pub mod aim_toggle;
pub mod logging;
pub mod scene_tracer;
pub mod teleport;

pub use aim_toggle::{AimToggle, ObjectId, PointerHit};
pub use scene_tracer::{ColliderDescription, SceneDescription, SceneTracer, ShapeDescription};
pub use teleport::{
    ArcConfig, ArcInput, ArcMode, CollisionResult, SpatialTracer, SurfaceTag, TeleportArc,
    TraceHit, TraceLayers,
};
