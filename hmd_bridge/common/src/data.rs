use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Eye {
    Left = 0,
    Right = 1,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    pub fn index(self) -> usize {
        self as usize
    }
}

// Tangents of the half angles, all positive for a field of view that contains the view axis.
#[derive(Serialize, Deserialize, Clone, Copy, Default, PartialEq, Debug)]
pub struct Fov {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Copy, Debug)]
pub struct Pose {
    pub position: [f32; 3],
    // w, x, y, z
    pub orientation: [f32; 4],
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: [0_f32; 3],
            orientation: [1_f32, 0_f32, 0_f32, 0_f32],
        }
    }
}

pub const IDENTITY_MATRIX: [[f32; 4]; 4] = [
    [1_f32, 0_f32, 0_f32, 0_f32],
    [0_f32, 1_f32, 0_f32, 0_f32],
    [0_f32, 0_f32, 1_f32, 0_f32],
    [0_f32, 0_f32, 0_f32, 1_f32],
];

/// Per-eye pose derived from one tracking sample. Position is in scene units (already
/// multiplied by the world scale), `view` is row-major (`view[row][column]`).
#[derive(Serialize, Deserialize, PartialEq, Clone, Copy, Debug)]
pub struct EyePose {
    pub orientation: [f32; 4],
    pub position: [f32; 3],
    pub view: [[f32; 4]; 4],
}

impl Default for EyePose {
    fn default() -> Self {
        Self {
            orientation: [1_f32, 0_f32, 0_f32, 0_f32],
            position: [0_f32; 3],
            view: IDENTITY_MATRIX,
        }
    }
}

/// Head-to-tracking-space transform plus the head-to-eye offsets, all in scene units.
#[derive(Serialize, Deserialize, PartialEq, Clone, Copy, Debug)]
pub struct HeadPose {
    pub transform: [[f32; 4]; 4],
    pub eye_offsets: [[f32; 3]; 2],
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum GraphicsApi {
    // depth range [-1, 1], column-major output
    OpenGl,
    // depth range [0, 1], row-major output
    Direct3D,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Handedness {
    Right,
    Left,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct ProjectionRequest {
    pub near: f32,
    pub far: f32,
    pub api: GraphicsApi,
    pub handedness: Handedness,
}

impl ProjectionRequest {
    pub fn opengl(near: f32, far: f32) -> Self {
        Self {
            near,
            far,
            api: GraphicsApi::OpenGl,
            handedness: Handedness::Right,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Backend {
    Oculus,
    Openvr,
}
