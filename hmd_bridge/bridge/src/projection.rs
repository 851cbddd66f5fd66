use hmd_bridge_common::data::*;
use nalgebra::Matrix4;

struct ScaleAndOffset {
    scale: [f32; 2],
    offset: [f32; 2],
}

// Maps the tangent space of the field of view to normalized device coordinates.
fn ndc_scale_and_offset(fov: &Fov) -> ScaleAndOffset {
    let x_scale = 2_f32 / (fov.left + fov.right);
    let x_offset = (fov.left - fov.right) * x_scale * 0.5;
    let y_scale = 2_f32 / (fov.top + fov.bottom);
    let y_offset = (fov.top - fov.bottom) * y_scale * 0.5;

    ScaleAndOffset {
        scale: [x_scale, y_scale],
        offset: [x_offset, y_offset],
    }
}

/// Off-axis perspective projection for one eye. Only the third row depends on the clip planes.
pub fn projection(fov: &Fov, request: &ProjectionRequest) -> Matrix4<f32> {
    let ndc = ndc_scale_and_offset(fov);
    let handedness_scale = match request.handedness {
        Handedness::Left => 1_f32,
        Handedness::Right => -1_f32,
    };

    let (near, far) = (request.near, request.far);
    let (depth_scale, depth_offset) = match request.api {
        GraphicsApi::OpenGl => (
            -handedness_scale * (far + near) / (near - far),
            2_f32 * far * near / (near - far),
        ),
        GraphicsApi::Direct3D => (
            -handedness_scale * far / (near - far),
            far * near / (near - far),
        ),
    };

    Matrix4::new(
        ndc.scale[0], 0_f32, handedness_scale * ndc.offset[0], 0_f32, //
        0_f32, ndc.scale[1], handedness_scale * -ndc.offset[1], 0_f32, //
        0_f32, 0_f32, depth_scale, depth_offset, //
        0_f32, 0_f32, handedness_scale, 0_f32,
    )
}

/// Flattened projection: column-major for OpenGL, row-major for Direct3D.
pub fn projection_matrix(fov: &Fov, request: &ProjectionRequest) -> [f32; 16] {
    let matrix = projection(fov, request);
    let matrix = match request.api {
        GraphicsApi::OpenGl => matrix,
        GraphicsApi::Direct3D => matrix.transpose(),
    };

    let mut flat = [0_f32; 16];
    flat.copy_from_slice(matrix.as_slice());
    flat
}
