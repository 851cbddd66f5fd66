mod api;

pub use api::*;

use crate::{hmd::*, math::*, projection::*, runtime::*};
use hmd_bridge_common::{data::*, settings::*, *};
use log::*;
use std::sync::Arc;

const TRACE_CONTEXT: &str = "Oculus";

// Field order matters: the device handle is destroyed before the lease can shut down LibOVR.
struct Device<A: OvrApi> {
    session: OvrSession,
    lease: SessionLease<A>,
}

impl<A: OvrApi> Device<A> {
    fn api(&self) -> &A {
        self.lease.api()
    }
}

impl<A: OvrApi> Drop for Device<A> {
    fn drop(&mut self) {
        self.lease.api().destroy(self.session);
    }
}

struct SwapChain {
    texture_sets: [SwapTextureSet; 2],
    color_textures: [u32; 2],
    viewport: [Viewport; 2],
}

pub struct OculusHmd<A: OvrApi> {
    device: Device<A>,
    desc: HmdDesc,
    eye_render_desc: [EyeRenderDesc; 2],
    hmd_to_eye_offset: [[f32; 3]; 2],
    target_sizes: [(u32, u32); 2],
    swap_chain: Option<SwapChain>,
    // eye poses of the last valid tracking sample, sent along with each submitted frame
    render_pose: [Pose; 2],
    frame_index: Option<u64>,
    last_submitted: Option<u64>,
    world_scale: f32,
    clip_planes: (f32, f32),
}

impl<A: OvrApi> OculusHmd<A> {
    pub fn is_connected(context: &RuntimeContext<A>) -> bool {
        context.initialize_library() && !context.api().hmd_desc(None).available_hmd_caps.is_empty()
    }

    pub fn new(context: &Arc<RuntimeContext<A>>, config: &SessionConfig) -> BridgeResult<Self> {
        let lease = SessionLease::acquire(context)?;
        let session = trace_err_as!(
            lease.api().create(),
            DeviceUnavailable,
            "Oculus could not initialize"
        )?;
        let device = Device { session, lease };
        let api = device.api();

        let desc = api.hmd_desc(Some(session));

        trace_err_as!(
            api.configure_tracking(
                session,
                TrackingCaps::ORIENTATION
                    | TrackingCaps::MAG_YAW_CORRECTION
                    | TrackingCaps::POSITION,
                TrackingCaps::empty(),
            ),
            DeviceUnavailable,
            "Tracking configuration failed"
        )?;
        if !desc.available_tracking_caps.contains(TrackingCaps::POSITION) {
            warn!("{} has no positional tracking", desc.product_name);
        }

        let eye_render_desc = [
            api.render_desc(session, Eye::Left, desc.default_eye_fov[0]),
            api.render_desc(session, Eye::Right, desc.default_eye_fov[1]),
        ];
        let target_sizes = [
            api.fov_texture_size(
                session,
                Eye::Left,
                desc.default_eye_fov[0],
                config.pixels_per_display_pixel,
            ),
            api.fov_texture_size(
                session,
                Eye::Right,
                desc.default_eye_fov[1],
                config.pixels_per_display_pixel,
            ),
        ];

        info!(
            "{} initialized ({}x{}, {}x{})",
            desc.product_name,
            target_sizes[0].0,
            target_sizes[0].1,
            target_sizes[1].0,
            target_sizes[1].1
        );

        Ok(Self {
            device,
            desc,
            hmd_to_eye_offset: [
                eye_render_desc[0].hmd_to_eye_view_offset,
                eye_render_desc[1].hmd_to_eye_view_offset,
            ],
            eye_render_desc,
            target_sizes,
            swap_chain: None,
            render_pose: [Pose::default(); 2],
            frame_index: None,
            last_submitted: None,
            world_scale: config.world_scale,
            clip_planes: (config.near_clip, config.far_clip),
        })
    }

    pub fn desc(&self) -> &HmdDesc {
        &self.desc
    }

    fn release_swap_chain(&mut self) {
        if let Some(swap_chain) = self.swap_chain.take() {
            for texture_set in swap_chain.texture_sets.iter() {
                self.device
                    .api()
                    .destroy_swap_texture_set(self.device.session, *texture_set);
            }
        }
    }

    // Both eye poses come from the same head sample, with the eye offsets already applied.
    fn sample_head_pose(&mut self) -> BridgeResult<Pose> {
        let frame_index = next_frame_index(&mut self.frame_index);
        let session = self.device.session;
        let api = self.device.api();

        let display_time = api.display_midpoint_seconds(session, frame_index);
        let state = api.tracking_state(session, display_time);

        if !state
            .status_flags
            .intersects(StatusFlags::ORIENTATION_TRACKED | StatusFlags::POSITION_TRACKED)
        {
            return trace_kind!(
                TrackingInvalid,
                "No tracked head pose for frame {} (status {:?})",
                frame_index,
                state.status_flags
            );
        }

        self.render_pose = calc_eye_poses(&state.head_pose, &self.hmd_to_eye_offset);

        Ok(state.head_pose)
    }
}

impl<A: OvrApi> Hmd for OculusHmd<A> {
    fn backend(&self) -> Backend {
        Backend::Oculus
    }

    fn setup(&mut self, color_texture_left: u32, color_texture_right: u32) -> BridgeResult {
        self.release_swap_chain();

        let session = self.device.session;
        let api = self.device.api();

        let mut texture_sets = Vec::with_capacity(2);
        for &eye in Eye::BOTH.iter() {
            let (width, height) = self.target_sizes[eye.index()];
            match api.create_swap_texture_set_gl(session, GL_SRGB8_ALPHA8, width, height) {
                Ok(texture_set) => texture_sets.push(texture_set),
                Err(e) => {
                    for texture_set in texture_sets {
                        api.destroy_swap_texture_set(session, texture_set);
                    }
                    return trace_err_as!(
                        Err(e),
                        DeviceUnavailable,
                        "Swap texture set creation failed for {:?} eye",
                        eye
                    );
                }
            }
        }

        let target_sizes = self.target_sizes;
        let viewport = |eye: Eye| {
            let (width, height) = target_sizes[eye.index()];
            Viewport {
                x: 0,
                y: 0,
                width,
                height,
            }
        };

        self.swap_chain = Some(SwapChain {
            texture_sets: [texture_sets[0], texture_sets[1]],
            color_textures: [color_texture_left, color_texture_right],
            viewport: [viewport(Eye::Left), viewport(Eye::Right)],
        });

        info!(
            "Oculus setup complete (textures {}, {})",
            color_texture_left, color_texture_right
        );
        Ok(())
    }

    fn update(&mut self) -> BridgeResult<[EyePose; 2]> {
        self.sample_head_pose()?;

        Ok([
            eye_pose_from_pose(&self.render_pose[0], self.world_scale),
            eye_pose_from_pose(&self.render_pose[1], self.world_scale),
        ])
    }

    fn update_head(&mut self) -> BridgeResult<HeadPose> {
        let head_pose = self.sample_head_pose()?;

        Ok(head_pose_from_pose(
            &head_pose,
            &self.hmd_to_eye_offset,
            self.world_scale,
        ))
    }

    fn frame_ready(&mut self) -> BridgeResult {
        let frame_index = frame_to_submit(self.frame_index, self.last_submitted)?;
        let swap_chain = match &self.swap_chain {
            Some(swap_chain) => swap_chain,
            None => return trace_kind!(InvalidCall, "Frame submitted before setup"),
        };
        let session = self.device.session;
        let api = self.device.api();

        let status = api.session_status(session);
        if !status.hmd_present || !status.is_visible {
            return trace_kind!(
                CompositorNotReady,
                "Frame {} skipped (HMD present: {}, visible: {})",
                frame_index,
                status.hmd_present,
                status.is_visible
            );
        }

        for &eye in Eye::BOTH.iter() {
            trace_err_as!(
                api.copy_to_swap_texture(
                    session,
                    swap_chain.texture_sets[eye.index()],
                    swap_chain.color_textures[eye.index()],
                ),
                SubmissionRejected,
                "Texture copy failed for {:?} eye",
                eye
            )?;
        }

        let layer = LayerEyeFov {
            color_texture: swap_chain.texture_sets,
            viewport: swap_chain.viewport,
            fov: [self.eye_render_desc[0].fov, self.eye_render_desc[1].fov],
            render_pose: self.render_pose,
        };

        trace_err_as!(
            api.submit_frame(session, frame_index, &layer),
            SubmissionRejected,
            "Frame {} rejected",
            frame_index
        )?;

        self.last_submitted = Some(frame_index);
        Ok(())
    }

    fn re_center(&mut self) -> BridgeResult {
        self.device.api().recenter_pose(self.device.session);
        Ok(())
    }

    fn projection_matrix(&mut self, eye: Eye, request: &ProjectionRequest) -> [f32; 16] {
        self.clip_planes = (request.near, request.far);
        projection_matrix(&self.eye_render_desc[eye.index()].fov, request)
    }

    fn frame_index(&self) -> Option<u64> {
        self.frame_index
    }

    fn recommended_render_target_size(&self, eye: Eye) -> (u32, u32) {
        self.target_sizes[eye.index()]
    }

    fn clip_planes(&self) -> (f32, f32) {
        self.clip_planes
    }
}

impl<A: OvrApi> Drop for OculusHmd<A> {
    fn drop(&mut self) {
        self.release_swap_chain();
    }
}
