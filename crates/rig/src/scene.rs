//! Scene-construction primitives.
//!
//! Declarative bodies the task places into every instance's scene at
//! construction time, e.g. the target visualization marker.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Shape {
    Cuboid { half_extents: [f32; 3] },
    Cylinder { radius: f32, height: f32 },
    Sphere { radius: f32 },
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BodySpec {
    pub id: String,
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(default = "zero_vec")]
    pub translation: [f32; 3],
    #[serde(default = "unit_vec")]
    pub scale: [f32; 3],
    #[serde(default = "unit_vec")]
    pub color: [f32; 3],
    /// Dynamic bodies are simulated; static ones are fixed in the world.
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default = "enabled")]
    pub collision: bool,
    #[serde(default = "enabled")]
    pub gravity: bool,
}

fn zero_vec() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn unit_vec() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn enabled() -> bool {
    true
}
