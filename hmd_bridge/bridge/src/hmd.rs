use hmd_bridge_common::{data::*, *};

const TRACE_CONTEXT: &str = "HMD";

/// Operations shared by every vendor backend. All calls come from the host render thread,
/// once per frame, in the order: `update` -> render -> `frame_ready`.
pub trait Hmd {
    fn backend(&self) -> Backend;

    /// Registers the host owned color textures that `frame_ready` will hand to the runtime.
    fn setup(&mut self, color_texture_left: u32, color_texture_right: u32) -> BridgeResult;

    /// Advances the frame index and samples the tracking state for it. Fails with
    /// `TrackingInvalid` when no valid pose is available; the caller keeps the last pose.
    fn update(&mut self) -> BridgeResult<[EyePose; 2]>;

    /// Same sampling as `update`, reported as head transform plus eye offsets.
    fn update_head(&mut self) -> BridgeResult<HeadPose>;

    fn update_yaw_pitch_roll(&mut self) -> BridgeResult<[[f32; 3]; 2]> {
        trace_kind!(
            Unsupported,
            "yaw/pitch/roll output is not supported by the {:?} backend",
            self.backend()
        )
    }

    /// Submits the registered textures for the current frame index. Each index is accepted at
    /// most once: a second call without an `update` in between fails with `InvalidCall`, as do
    /// calls before the first `update` or before `setup`. A failed `update` still assigns an
    /// index, so the frame goes out with the last valid eye poses. If no update has succeeded
    /// yet, those are the identity poses.
    fn frame_ready(&mut self) -> BridgeResult;

    fn re_center(&mut self) -> BridgeResult;

    fn projection_matrix(&mut self, eye: Eye, request: &ProjectionRequest) -> [f32; 16];

    fn projection_matrix_left(&mut self, request: &ProjectionRequest) -> [f32; 16] {
        self.projection_matrix(Eye::Left, request)
    }

    fn projection_matrix_right(&mut self, request: &ProjectionRequest) -> [f32; 16] {
        self.projection_matrix(Eye::Right, request)
    }

    /// `None` until the first `update` call.
    fn frame_index(&self) -> Option<u64>;

    fn recommended_render_target_size(&self, eye: Eye) -> (u32, u32);

    /// Near and far planes of the last projection request.
    fn clip_planes(&self) -> (f32, f32);
}

pub(crate) fn next_frame_index(frame_index: &mut Option<u64>) -> u64 {
    let next = frame_index.map_or(0, |index| index + 1);
    *frame_index = Some(next);
    next
}

// The most recently assigned index, unless the runtime already accepted it.
pub(crate) fn frame_to_submit(
    frame_index: Option<u64>,
    last_submitted: Option<u64>,
) -> BridgeResult<u64> {
    match frame_index {
        None => trace_kind!(InvalidCall, "Frame submitted before the first update"),
        Some(index) if last_submitted == Some(index) => {
            trace_kind!(InvalidCall, "Frame {} already submitted", index)
        }
        Some(index) => Ok(index),
    }
}
