// Recording fakes of the vendor runtimes.

use crate::{math::Matrix34, oculus::*, openvr::*, runtime::RuntimeApi};
use hmd_bridge_common::{data::*, *};
use parking_lot::{Mutex, MutexGuard};
use std::collections::VecDeque;

const TRACE_CONTEXT: &str = "Fake runtime";

pub const LEFT_EYE_FOV: Fov = Fov {
    left: 1.2,
    top: 1.1,
    right: 0.9,
    bottom: 1.3,
};

pub const RIGHT_EYE_FOV: Fov = Fov {
    left: 0.9,
    top: 1.1,
    right: 1.2,
    bottom: 1.3,
};

pub const HALF_IPD: f32 = 0.032;

pub fn translation_matrix34(position: [f32; 3]) -> Matrix34 {
    [
        [1_f32, 0_f32, 0_f32, position[0]],
        [0_f32, 1_f32, 0_f32, position[1]],
        [0_f32, 0_f32, 1_f32, position[2]],
    ]
}

fn count_calls(calls: &[&'static str], name: &str) -> usize {
    calls.iter().filter(|call| **call == name).count()
}

pub struct FakeOvrState {
    pub initialize_ok: bool,
    pub hmd_connected: bool,
    pub create_ok: bool,
    pub configure_tracking_ok: bool,
    pub swap_texture_sets_available: usize,
    pub status_flags: StatusFlags,
    pub head_pose: Pose,
    pub session_status: SessionStatus,
    pub submit_result: Result<(), OvrError>,
    pub next_handle: u64,
    pub calls: Vec<&'static str>,
    pub configured_caps: Option<TrackingCaps>,
    pub timing_requests: Vec<u64>,
    pub copies: Vec<(SwapTextureSet, u32)>,
    pub submitted: Vec<(u64, LayerEyeFov)>,
}

pub struct FakeOvr(Mutex<FakeOvrState>);

impl Default for FakeOvr {
    fn default() -> Self {
        Self(Mutex::new(FakeOvrState {
            initialize_ok: true,
            hmd_connected: true,
            create_ok: true,
            configure_tracking_ok: true,
            swap_texture_sets_available: usize::MAX,
            status_flags: StatusFlags::ORIENTATION_TRACKED
                | StatusFlags::POSITION_TRACKED
                | StatusFlags::HMD_CONNECTED,
            head_pose: Pose {
                position: [0_f32, 1.6, 0_f32],
                orientation: [1_f32, 0_f32, 0_f32, 0_f32],
            },
            session_status: SessionStatus {
                hmd_present: true,
                is_visible: true,
            },
            submit_result: Ok(()),
            next_handle: 1,
            calls: vec![],
            configured_caps: None,
            timing_requests: vec![],
            copies: vec![],
            submitted: vec![],
        }))
    }
}

impl FakeOvr {
    pub fn state(&self) -> MutexGuard<FakeOvrState> {
        self.0.lock()
    }

    pub fn count(&self, call: &str) -> usize {
        count_calls(&self.0.lock().calls, call)
    }

    fn record(&self, call: &'static str) {
        self.0.lock().calls.push(call);
    }

    fn new_handle(&self) -> u64 {
        let mut state = self.0.lock();
        state.next_handle += 1;
        state.next_handle
    }
}

impl RuntimeApi for FakeOvr {
    fn name(&self) -> &'static str {
        "Fake Oculus"
    }

    fn initialize(&self) -> StrResult {
        self.record("initialize");
        if self.0.lock().initialize_ok {
            Ok(())
        } else {
            trace_str!("LibOVR not found")
        }
    }

    fn shutdown(&self) {
        self.record("shutdown");
    }
}

impl OvrApi for FakeOvr {
    fn hmd_desc(&self, session: Option<OvrSession>) -> HmdDesc {
        let connected = session.is_some() || self.0.lock().hmd_connected;
        HmdDesc {
            product_name: "Fake Rift".into(),
            resolution: (2160, 1200),
            default_eye_fov: [LEFT_EYE_FOV, RIGHT_EYE_FOV],
            available_hmd_caps: if connected {
                HmdCaps::LOW_PERSISTENCE | HmdCaps::DYNAMIC_PREDICTION
            } else {
                HmdCaps::empty()
            },
            available_tracking_caps: TrackingCaps::all(),
        }
    }

    fn create(&self) -> Result<OvrSession, OvrError> {
        self.record("create");
        if self.0.lock().create_ok {
            Ok(OvrSession(self.new_handle()))
        } else {
            Err(OvrError(-6000))
        }
    }

    fn destroy(&self, _: OvrSession) {
        self.record("destroy");
    }

    fn configure_tracking(
        &self,
        _: OvrSession,
        supported: TrackingCaps,
        _: TrackingCaps,
    ) -> Result<(), OvrError> {
        self.record("configure_tracking");
        let mut state = self.0.lock();
        state.configured_caps = Some(supported);
        if state.configure_tracking_ok {
            Ok(())
        } else {
            Err(OvrError(-1001))
        }
    }

    fn fov_texture_size(
        &self,
        _: OvrSession,
        _: Eye,
        _: Fov,
        pixels_per_display_pixel: f32,
    ) -> (u32, u32) {
        (
            (1182_f32 * pixels_per_display_pixel) as u32,
            (1464_f32 * pixels_per_display_pixel) as u32,
        )
    }

    fn render_desc(&self, _: OvrSession, eye: Eye, fov: Fov) -> EyeRenderDesc {
        let x = match eye {
            Eye::Left => -HALF_IPD,
            Eye::Right => HALF_IPD,
        };
        EyeRenderDesc {
            eye,
            fov,
            hmd_to_eye_view_offset: [x, 0_f32, 0_f32],
        }
    }

    fn display_midpoint_seconds(&self, _: OvrSession, frame_index: u64) -> f64 {
        self.0.lock().timing_requests.push(frame_index);
        frame_index as f64 / 90_f64
    }

    fn tracking_state(&self, _: OvrSession, _: f64) -> TrackingState {
        let state = self.0.lock();
        TrackingState {
            head_pose: state.head_pose,
            status_flags: state.status_flags,
        }
    }

    fn session_status(&self, _: OvrSession) -> SessionStatus {
        self.0.lock().session_status
    }

    fn create_swap_texture_set_gl(
        &self,
        _: OvrSession,
        format: u32,
        _: u32,
        _: u32,
    ) -> Result<SwapTextureSet, OvrError> {
        assert_eq!(format, GL_SRGB8_ALPHA8);
        self.record("create_swap_texture_set");
        {
            let mut state = self.0.lock();
            if state.swap_texture_sets_available == 0 {
                return Err(OvrError(-1003));
            }
            state.swap_texture_sets_available -= 1;
        }
        Ok(SwapTextureSet(self.new_handle()))
    }

    fn destroy_swap_texture_set(&self, _: OvrSession, _: SwapTextureSet) {
        self.record("destroy_swap_texture_set");
    }

    fn copy_to_swap_texture(
        &self,
        _: OvrSession,
        texture_set: SwapTextureSet,
        color_texture: u32,
    ) -> Result<(), OvrError> {
        self.0.lock().copies.push((texture_set, color_texture));
        Ok(())
    }

    fn submit_frame(
        &self,
        _: OvrSession,
        frame_index: u64,
        layer: &LayerEyeFov,
    ) -> Result<(), OvrError> {
        self.record("submit_frame");
        let mut state = self.0.lock();
        state.submit_result?;
        state.submitted.push((frame_index, *layer));
        Ok(())
    }

    fn recenter_pose(&self, _: OvrSession) {
        self.record("recenter_pose");
    }
}

pub struct FakeOpenvrState {
    pub initialize_ok: bool,
    pub hmd_present: bool,
    pub has_compositor: bool,
    pub can_render_scene: bool,
    pub wait_get_poses_result: Result<(), CompositorError>,
    pub submit_result: Result<(), CompositorError>,
    pub poses: Vec<TrackedDevicePose>,
    pub device_classes: Vec<TrackedDeviceClass>,
    pub events: VecDeque<VrEvent>,
    pub tracking_space: Option<TrackingUniverseOrigin>,
    pub class_queries: Vec<u32>,
    pub calls: Vec<&'static str>,
    pub submitted: Vec<(Eye, Texture, TextureBounds)>,
}

pub struct FakeOpenvr(Mutex<FakeOpenvrState>);

impl Default for FakeOpenvr {
    fn default() -> Self {
        let mut poses = vec![TrackedDevicePose::default(); MAX_TRACKED_DEVICE_COUNT];
        poses[HMD_DEVICE_INDEX] = TrackedDevicePose {
            device_to_absolute_tracking: translation_matrix34([0_f32, 1.6, 0_f32]),
            pose_is_valid: true,
            device_is_connected: true,
        };

        let mut device_classes = vec![TrackedDeviceClass::Invalid; MAX_TRACKED_DEVICE_COUNT];
        device_classes[HMD_DEVICE_INDEX] = TrackedDeviceClass::Hmd;
        device_classes[1] = TrackedDeviceClass::Controller;

        Self(Mutex::new(FakeOpenvrState {
            initialize_ok: true,
            hmd_present: true,
            has_compositor: true,
            can_render_scene: true,
            wait_get_poses_result: Ok(()),
            submit_result: Ok(()),
            poses,
            device_classes,
            events: VecDeque::new(),
            tracking_space: None,
            class_queries: vec![],
            calls: vec![],
            submitted: vec![],
        }))
    }
}

impl FakeOpenvr {
    pub fn state(&self) -> MutexGuard<FakeOpenvrState> {
        self.0.lock()
    }

    pub fn count(&self, call: &str) -> usize {
        count_calls(&self.0.lock().calls, call)
    }

    fn record(&self, call: &'static str) {
        self.0.lock().calls.push(call);
    }
}

impl RuntimeApi for FakeOpenvr {
    fn name(&self) -> &'static str {
        "Fake OpenVR"
    }

    fn initialize(&self) -> StrResult {
        self.record("initialize");
        if self.0.lock().initialize_ok {
            Ok(())
        } else {
            trace_str!("VRInitError_Init_HmdNotFound")
        }
    }

    fn shutdown(&self) {
        self.record("shutdown");
    }
}

impl OpenvrApi for FakeOpenvr {
    fn is_hmd_present(&self) -> bool {
        self.0.lock().hmd_present
    }

    fn has_compositor(&self) -> bool {
        self.0.lock().has_compositor
    }

    fn recommended_render_target_size(&self) -> (u32, u32) {
        (1512, 1680)
    }

    fn projection_raw(&self, eye: Eye) -> ProjectionRaw {
        let fov = match eye {
            Eye::Left => LEFT_EYE_FOV,
            Eye::Right => RIGHT_EYE_FOV,
        };
        ProjectionRaw {
            left: -fov.left,
            right: fov.right,
            top: -fov.top,
            bottom: fov.bottom,
        }
    }

    fn eye_to_head_transform(&self, eye: Eye) -> Matrix34 {
        match eye {
            Eye::Left => translation_matrix34([-HALF_IPD, 0_f32, 0_f32]),
            Eye::Right => translation_matrix34([HALF_IPD, 0_f32, 0_f32]),
        }
    }

    fn set_tracking_space(&self, origin: TrackingUniverseOrigin) {
        self.0.lock().tracking_space = Some(origin);
    }

    fn wait_get_poses(&self, poses: &mut [TrackedDevicePose]) -> Result<(), CompositorError> {
        self.record("wait_get_poses");
        let state = self.0.lock();
        state.wait_get_poses_result?;
        poses.copy_from_slice(&state.poses);
        Ok(())
    }

    fn tracked_device_class(&self, device_index: u32) -> TrackedDeviceClass {
        let mut state = self.0.lock();
        state.class_queries.push(device_index);
        state.device_classes[device_index as usize]
    }

    fn poll_next_event(&self) -> Option<VrEvent> {
        self.0.lock().events.pop_front()
    }

    fn compositor_bring_to_front(&self) {
        self.record("compositor_bring_to_front");
    }

    fn can_render_scene(&self) -> bool {
        self.0.lock().can_render_scene
    }

    fn submit(
        &self,
        eye: Eye,
        texture: &Texture,
        bounds: &TextureBounds,
    ) -> Result<(), CompositorError> {
        self.record("submit");
        let mut state = self.0.lock();
        state.submit_result?;
        state.submitted.push((eye, *texture, *bounds));
        Ok(())
    }

    fn reset_seated_zero_pose(&self) {
        self.record("reset_seated_zero_pose");
    }
}
