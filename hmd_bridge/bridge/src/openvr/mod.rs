mod api;
mod events;

pub use api::*;
pub use events::*;

use crate::{hmd::*, math::*, projection::*, runtime::*};
use hmd_bridge_common::{data::*, settings::*, *};
use log::*;
use nalgebra::Matrix4;
use std::sync::Arc;

const TRACE_CONTEXT: &str = "OpenVR";

const FULL_TEXTURE_BOUNDS: TextureBounds = TextureBounds {
    u_min: 0_f32,
    v_min: 0_f32,
    u_max: 1_f32,
    v_max: 1_f32,
};

pub struct OpenvrHmd<A: OpenvrApi> {
    lease: SessionLease<A>,
    target_size: (u32, u32),
    fov: [Fov; 2],
    eye_to_head: [Matrix4<f32>; 2],
    poses: Vec<TrackedDevicePose>,
    events: EventMonitor,
    color_textures: Option<[u32; 2]>,
    frame_index: Option<u64>,
    last_submitted: Option<u64>,
    world_scale: f32,
    clip_planes: (f32, f32),
}

impl<A: OpenvrApi> OpenvrHmd<A> {
    pub fn is_connected(context: &RuntimeContext<A>) -> bool {
        context.initialize_library() && context.api().is_hmd_present()
    }

    pub fn new(context: &Arc<RuntimeContext<A>>, config: &SessionConfig) -> BridgeResult<Self> {
        let lease = SessionLease::acquire(context)?;
        let api = lease.api();

        if !api.has_compositor() {
            return trace_kind!(RuntimeUnavailable, "Compositor interface not found");
        }
        if !api.is_hmd_present() {
            return trace_kind!(DeviceUnavailable, "No HMD detected");
        }

        api.set_tracking_space(match config.tracking_space {
            TrackingSpace::Seated => TrackingUniverseOrigin::Seated,
            TrackingSpace::Standing => TrackingUniverseOrigin::Standing,
        });

        let target_size = api.recommended_render_target_size();
        let fov = [
            api.projection_raw(Eye::Left).to_fov(),
            api.projection_raw(Eye::Right).to_fov(),
        ];
        let eye_to_head = [
            matrix4_from_matrix34(&api.eye_to_head_transform(Eye::Left)),
            matrix4_from_matrix34(&api.eye_to_head_transform(Eye::Right)),
        ];

        info!(
            "OpenVR session created ({}x{} per eye, {:?} tracking space)",
            target_size.0, target_size.1, config.tracking_space
        );

        Ok(Self {
            lease,
            target_size,
            fov,
            eye_to_head,
            poses: vec![TrackedDevicePose::default(); MAX_TRACKED_DEVICE_COUNT],
            events: EventMonitor::default(),
            color_textures: None,
            frame_index: None,
            last_submitted: None,
            world_scale: config.world_scale,
            clip_planes: (config.near_clip, config.far_clip),
        })
    }

    pub fn status(&self) -> &str {
        self.events.status()
    }

    pub fn events(&self) -> &EventMonitor {
        &self.events
    }

    // One letter per valid device, in device index order
    fn device_class_string(&mut self) -> String {
        let api = self.lease.api();
        let events = &mut self.events;
        self.poses
            .iter()
            .enumerate()
            .filter(|(_, pose)| pose.pose_is_valid)
            .map(|(index, _)| events.device_class(api, index).code())
            .collect()
    }

    fn sample_hmd_pose(&mut self) -> BridgeResult<Matrix4<f32>> {
        self.events.poll(self.lease.api());

        let frame_index = next_frame_index(&mut self.frame_index);

        trace_err_as!(
            self.lease.api().wait_get_poses(&mut self.poses),
            TrackingInvalid,
            "Pose wait failed for frame {}",
            frame_index
        )?;

        let device_classes = self.device_class_string();
        trace!("Frame {} devices: {}", frame_index, device_classes);

        let hmd_pose = &self.poses[HMD_DEVICE_INDEX];
        if !hmd_pose.pose_is_valid {
            return trace_kind!(
                TrackingInvalid,
                "HMD pose invalid for frame {} (connected: {})",
                frame_index,
                hmd_pose.device_is_connected
            );
        }

        Ok(matrix4_from_matrix34(&hmd_pose.device_to_absolute_tracking))
    }
}

impl<A: OpenvrApi> Hmd for OpenvrHmd<A> {
    fn backend(&self) -> Backend {
        Backend::Openvr
    }

    fn setup(&mut self, color_texture_left: u32, color_texture_right: u32) -> BridgeResult {
        self.color_textures = Some([color_texture_left, color_texture_right]);
        self.lease.api().compositor_bring_to_front();

        info!(
            "OpenVR setup complete (textures {}, {})",
            color_texture_left, color_texture_right
        );
        Ok(())
    }

    fn update(&mut self) -> BridgeResult<[EyePose; 2]> {
        let hmd_to_tracking = self.sample_hmd_pose()?;

        Ok([
            eye_pose_from_matrix4(&(hmd_to_tracking * self.eye_to_head[0]), self.world_scale),
            eye_pose_from_matrix4(&(hmd_to_tracking * self.eye_to_head[1]), self.world_scale),
        ])
    }

    fn update_head(&mut self) -> BridgeResult<HeadPose> {
        let hmd_to_tracking = self.sample_hmd_pose()?;

        let eye_offset = |m: &Matrix4<f32>| [m[(0, 3)], m[(1, 3)], m[(2, 3)]];

        Ok(head_pose_from_pose(
            &pose_from_matrix4(&hmd_to_tracking),
            &[
                eye_offset(&self.eye_to_head[0]),
                eye_offset(&self.eye_to_head[1]),
            ],
            self.world_scale,
        ))
    }

    fn frame_ready(&mut self) -> BridgeResult {
        let frame_index = frame_to_submit(self.frame_index, self.last_submitted)?;
        let color_textures = match self.color_textures {
            Some(textures) => textures,
            None => return trace_kind!(InvalidCall, "Frame submitted before setup"),
        };
        let api = self.lease.api();

        if !api.can_render_scene() {
            return trace_kind!(
                CompositorNotReady,
                "Compositor cannot render frame {}",
                frame_index
            );
        }

        for &eye in Eye::BOTH.iter() {
            let texture = Texture {
                handle: color_textures[eye.index()],
                texture_type: TextureType::OpenGl,
                color_space: ColorSpace::Auto,
            };
            trace_err_as!(
                api.submit(eye, &texture, &FULL_TEXTURE_BOUNDS),
                SubmissionRejected,
                "{:?} eye of frame {} rejected",
                eye,
                frame_index
            )?;
        }

        self.last_submitted = Some(frame_index);
        Ok(())
    }

    fn re_center(&mut self) -> BridgeResult {
        self.lease.api().reset_seated_zero_pose();
        Ok(())
    }

    fn projection_matrix(&mut self, eye: Eye, request: &ProjectionRequest) -> [f32; 16] {
        self.clip_planes = (request.near, request.far);
        projection_matrix(&self.fov[eye.index()], request)
    }

    fn frame_index(&self) -> Option<u64> {
        self.frame_index
    }

    fn recommended_render_target_size(&self, _: Eye) -> (u32, u32) {
        self.target_size
    }

    fn clip_planes(&self) -> (f32, f32) {
        self.clip_planes
    }
}
