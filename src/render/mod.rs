pub mod orbit;
pub mod clock;
pub mod camera;
pub mod scene;
pub mod animator;
pub mod painter;
pub mod panel;
