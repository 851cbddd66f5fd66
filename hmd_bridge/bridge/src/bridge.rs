use crate::{hmd::Hmd, oculus::*, open_hmd, openvr::*, runtime::RuntimeContext};
use hmd_bridge_common::{data::*, settings::*, *};
use log::*;
use std::sync::Arc;

fn report<T>(result: BridgeResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.kind.is_transient() => {
            debug!("{}", e);
            None
        }
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

/// Boolean interface for hosts that poll the HMD once per frame. Failures are logged and
/// reported as `false`; the last accepted poses stay readable.
pub struct HmdBridge {
    hmd: Box<dyn Hmd>,
    eye_poses: [EyePose; 2],
    head_pose: Option<HeadPose>,
}

impl HmdBridge {
    pub fn new(hmd: Box<dyn Hmd>) -> Self {
        Self {
            hmd,
            eye_poses: [EyePose::default(); 2],
            head_pose: None,
        }
    }

    /// Opens the configured backend. Construction errors go through the error display callback.
    pub fn open<O: OvrApi + 'static, V: OpenvrApi + 'static>(
        oculus: &Arc<RuntimeContext<O>>,
        openvr: &Arc<RuntimeContext<V>>,
        settings: &Settings,
    ) -> Option<Self> {
        show_err!(open_hmd(oculus, openvr, settings))
            .ok()
            .map(Self::new)
    }

    pub fn is_connected<O: OvrApi, V: OpenvrApi>(
        oculus: &RuntimeContext<O>,
        openvr: &RuntimeContext<V>,
        backend: BackendSelection,
    ) -> bool {
        match backend {
            BackendSelection::Oculus => OculusHmd::is_connected(oculus),
            BackendSelection::Openvr => OpenvrHmd::is_connected(openvr),
            BackendSelection::Auto => {
                OculusHmd::is_connected(oculus) || OpenvrHmd::is_connected(openvr)
            }
        }
    }

    pub fn backend(&self) -> Backend {
        self.hmd.backend()
    }

    pub fn setup(&mut self, color_texture_left: u32, color_texture_right: u32) -> bool {
        report(self.hmd.setup(color_texture_left, color_texture_right)).is_some()
    }

    pub fn update(&mut self) -> bool {
        match report(self.hmd.update()) {
            Some(eye_poses) => {
                self.eye_poses = eye_poses;
                true
            }
            None => false,
        }
    }

    pub fn update_head(&mut self) -> bool {
        match report(self.hmd.update_head()) {
            Some(head_pose) => {
                self.head_pose = Some(head_pose);
                true
            }
            None => false,
        }
    }

    pub fn frame_ready(&mut self) -> bool {
        report(self.hmd.frame_ready()).is_some()
    }

    pub fn re_center(&mut self) -> bool {
        report(self.hmd.re_center()).is_some()
    }

    pub fn eye_pose(&self, eye: Eye) -> &EyePose {
        &self.eye_poses[eye.index()]
    }

    pub fn orientation(&self, eye: Eye) -> [f32; 4] {
        self.eye_poses[eye.index()].orientation
    }

    pub fn position(&self, eye: Eye) -> [f32; 3] {
        self.eye_poses[eye.index()].position
    }

    pub fn view_matrix(&self, eye: Eye) -> [[f32; 4]; 4] {
        self.eye_poses[eye.index()].view
    }

    /// `None` until the first successful `update_head`.
    pub fn head_pose(&self) -> Option<&HeadPose> {
        self.head_pose.as_ref()
    }

    pub fn projection_matrix_left(
        &mut self,
        near: f32,
        far: f32,
        api: GraphicsApi,
        handedness: Handedness,
    ) -> [f32; 16] {
        self.hmd.projection_matrix_left(&ProjectionRequest {
            near,
            far,
            api,
            handedness,
        })
    }

    pub fn projection_matrix_right(
        &mut self,
        near: f32,
        far: f32,
        api: GraphicsApi,
        handedness: Handedness,
    ) -> [f32; 16] {
        self.hmd.projection_matrix_right(&ProjectionRequest {
            near,
            far,
            api,
            handedness,
        })
    }

    pub fn width(&self, eye: Eye) -> u32 {
        self.hmd.recommended_render_target_size(eye).0
    }

    pub fn height(&self, eye: Eye) -> u32 {
        self.hmd.recommended_render_target_size(eye).1
    }

    pub fn frame_index(&self) -> Option<u64> {
        self.hmd.frame_index()
    }

    pub fn hmd_mut(&mut self) -> &mut dyn Hmd {
        self.hmd.as_mut()
    }
}
