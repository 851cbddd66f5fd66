use crate::{math::Matrix34, runtime::RuntimeApi};
use hmd_bridge_common::data::*;

pub const MAX_TRACKED_DEVICE_COUNT: usize = 64;

pub const HMD_DEVICE_INDEX: usize = 0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TrackedDeviceClass {
    Invalid,
    Hmd,
    Controller,
    GenericTracker,
    TrackingReference,
    DisplayRedirect,
}

impl TrackedDeviceClass {
    pub fn code(self) -> char {
        match self {
            Self::Controller => 'C',
            Self::Hmd => 'H',
            Self::Invalid => 'I',
            Self::GenericTracker => 'G',
            Self::TrackingReference => 'T',
            Self::DisplayRedirect => '?',
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct TrackedDevicePose {
    pub device_to_absolute_tracking: Matrix34,
    pub pose_is_valid: bool,
    pub device_is_connected: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TrackingUniverseOrigin {
    Seated,
    Standing,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VrEventType {
    TrackedDeviceActivated,
    TrackedDeviceDeactivated,
    TrackedDeviceUpdated,
    Other(u32),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct VrEvent {
    pub event_type: VrEventType,
    pub tracked_device_index: u32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CompositorError(pub i32);

// Vendor projection extents: tangents of the half angles, left and top are negative.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ProjectionRaw {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl ProjectionRaw {
    pub fn to_fov(self) -> Fov {
        Fov {
            left: -self.left,
            top: -self.top,
            right: self.right,
            bottom: self.bottom,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TextureType {
    OpenGl,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ColorSpace {
    Auto,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Texture {
    pub handle: u32,
    pub texture_type: TextureType,
    pub color_space: ColorSpace,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TextureBounds {
    pub u_min: f32,
    pub v_min: f32,
    pub u_max: f32,
    pub v_max: f32,
}

/// Compositor based runtime (OpenVR). `RuntimeApi::initialize` maps to `VR_Init` with the
/// scene application type, `RuntimeApi::shutdown` to `VR_Shutdown`.
pub trait OpenvrApi: RuntimeApi {
    fn is_hmd_present(&self) -> bool;

    /// Whether the compositor interface could be obtained.
    fn has_compositor(&self) -> bool;

    /// Per eye size.
    fn recommended_render_target_size(&self) -> (u32, u32);

    fn projection_raw(&self, eye: Eye) -> ProjectionRaw;

    fn eye_to_head_transform(&self, eye: Eye) -> Matrix34;

    fn set_tracking_space(&self, origin: TrackingUniverseOrigin);

    /// Blocks until the compositor hands out the poses for the next frame.
    fn wait_get_poses(&self, poses: &mut [TrackedDevicePose]) -> Result<(), CompositorError>;

    fn tracked_device_class(&self, device_index: u32) -> TrackedDeviceClass;

    fn poll_next_event(&self) -> Option<VrEvent>;

    fn compositor_bring_to_front(&self);

    fn can_render_scene(&self) -> bool;

    fn submit(
        &self,
        eye: Eye,
        texture: &Texture,
        bounds: &TextureBounds,
    ) -> Result<(), CompositorError>;

    fn reset_seated_zero_pose(&self);
}
