use crate::runtime::RuntimeApi;
use bitflags::bitflags;
use hmd_bridge_common::data::*;

pub const GL_SRGB8_ALPHA8: u32 = 0x8C43;

bitflags! {
    pub struct HmdCaps: u32 {
        const LOW_PERSISTENCE = 0x0080;
        const DYNAMIC_PREDICTION = 0x0200;
    }
}

bitflags! {
    pub struct TrackingCaps: u32 {
        const ORIENTATION = 0x0010;
        const MAG_YAW_CORRECTION = 0x0020;
        const POSITION = 0x0040;
    }
}

bitflags! {
    pub struct StatusFlags: u32 {
        const ORIENTATION_TRACKED = 0x0001;
        const POSITION_TRACKED = 0x0002;
        const HMD_CONNECTED = 0x0080;
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OvrSession(pub u64);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SwapTextureSet(pub u64);

// Negative vendor result code
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OvrError(pub i32);

#[derive(Clone, Debug)]
pub struct HmdDesc {
    pub product_name: String,
    pub resolution: (u32, u32),
    pub default_eye_fov: [Fov; 2],
    pub available_hmd_caps: HmdCaps,
    pub available_tracking_caps: TrackingCaps,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct EyeRenderDesc {
    pub eye: Eye,
    pub fov: Fov,
    pub hmd_to_eye_view_offset: [f32; 3],
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TrackingState {
    pub head_pose: Pose,
    pub status_flags: StatusFlags,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SessionStatus {
    pub hmd_present: bool,
    pub is_visible: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LayerEyeFov {
    pub color_texture: [SwapTextureSet; 2],
    pub viewport: [Viewport; 2],
    pub fov: [Fov; 2],
    pub render_pose: [Pose; 2],
}

/// First generation Oculus runtime (LibOVR). `RuntimeApi::initialize` maps to
/// `ovr_Initialize`, `RuntimeApi::shutdown` to `ovr_Shutdown`.
pub trait OvrApi: RuntimeApi {
    /// Without a session this describes the first connected HMD, if any.
    fn hmd_desc(&self, session: Option<OvrSession>) -> HmdDesc;

    fn create(&self) -> Result<OvrSession, OvrError>;

    fn destroy(&self, session: OvrSession);

    fn configure_tracking(
        &self,
        session: OvrSession,
        supported: TrackingCaps,
        required: TrackingCaps,
    ) -> Result<(), OvrError>;

    fn fov_texture_size(
        &self,
        session: OvrSession,
        eye: Eye,
        fov: Fov,
        pixels_per_display_pixel: f32,
    ) -> (u32, u32);

    fn render_desc(&self, session: OvrSession, eye: Eye, fov: Fov) -> EyeRenderDesc;

    /// Predicted time in seconds at which the middle of the given frame reaches the display.
    fn display_midpoint_seconds(&self, session: OvrSession, frame_index: u64) -> f64;

    fn tracking_state(&self, session: OvrSession, absolute_time_seconds: f64) -> TrackingState;

    fn session_status(&self, session: OvrSession) -> SessionStatus;

    fn create_swap_texture_set_gl(
        &self,
        session: OvrSession,
        format: u32,
        width: u32,
        height: u32,
    ) -> Result<SwapTextureSet, OvrError>;

    fn destroy_swap_texture_set(&self, session: OvrSession, texture_set: SwapTextureSet);

    /// Advances the set to its next texture and copies the host GL texture into it.
    fn copy_to_swap_texture(
        &self,
        session: OvrSession,
        texture_set: SwapTextureSet,
        color_texture: u32,
    ) -> Result<(), OvrError>;

    fn submit_frame(
        &self,
        session: OvrSession,
        frame_index: u64,
        layer: &LayerEyeFov,
    ) -> Result<(), OvrError>;

    fn recenter_pose(&self, session: OvrSession);
}
