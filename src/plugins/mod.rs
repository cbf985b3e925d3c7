pub mod camera;
pub mod display;
pub mod input;
pub mod menu;
pub mod round;
pub mod telemetry;
