// VR Teleport Arc
//
// Predicts the ballistic arc thrown from a pointer, finds where it first meets
// the world, classifies that landing spot and animates the arc as a loop of
// marching segments. Movement toward the chosen spot lives in teleport_system.

pub mod arc_config;
pub mod arc_controller;
pub mod arc_renderer;
pub mod arc_style;
pub mod collision_scan;
pub mod scheduler;
pub mod teleport_system;
pub mod tracer;
pub mod trajectory;

pub use arc_config::{ArcConfig, ArcConfigError, DEFAULT_GRAVITY, TraceLayers};
pub use arc_controller::{ArcState, TeleportArc};
pub use arc_renderer::{ArcLines, SegmentLayout, SegmentRenderer, SegmentVisual};
pub use arc_style::ArcStyle;
pub use collision_scan::{ArcHit, CollisionResult, CollisionScanner};
pub use scheduler::{AnimationScheduler, ArcMode};
pub use teleport_system::{
    Handedness, PointerSource, TeleportConfig, TeleportMover, choose_teleport_target, drive_arc,
};
pub use tracer::{MAX_TRACE_HITS, SpatialTracer, SurfaceTag, TraceHit};
pub use trajectory::{ArcInput, TrajectorySampler, position_at_time};
