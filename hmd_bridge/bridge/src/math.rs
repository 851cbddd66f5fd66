use hmd_bridge_common::data::*;
use nalgebra::{
    Isometry3, Matrix3, Matrix4, Quaternion, Rotation3, Translation3, UnitQuaternion, Vector3,
};

// 3x4 row-major rigid transform as returned by the compositor runtime
pub type Matrix34 = [[f32; 4]; 3];

pub fn matrix4_from_matrix34(m: &Matrix34) -> Matrix4<f32> {
    Matrix4::new(
        m[0][0], m[0][1], m[0][2], m[0][3], //
        m[1][0], m[1][1], m[1][2], m[1][3], //
        m[2][0], m[2][1], m[2][2], m[2][3], //
        0_f32, 0_f32, 0_f32, 1_f32,
    )
}

pub fn rows_from_matrix4(m: &Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut rows = [[0_f32; 4]; 4];
    for (r, row) in rows.iter_mut().enumerate() {
        for (c, value) in row.iter_mut().enumerate() {
            *value = m[(r, c)];
        }
    }
    rows
}

pub fn unit_quaternion(orientation: &[f32; 4]) -> UnitQuaternion<f32> {
    let [w, x, y, z] = *orientation;
    UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z))
}

pub fn orientation_from_quaternion(quat: &UnitQuaternion<f32>) -> [f32; 4] {
    // coords are stored as i, j, k, w
    let coords = quat.quaternion().coords;
    [coords[3], coords[0], coords[1], coords[2]]
}

pub fn pose_from_matrix4(m: &Matrix4<f32>) -> Pose {
    let rotation = Matrix3::new(
        m[(0, 0)], m[(0, 1)], m[(0, 2)], //
        m[(1, 0)], m[(1, 1)], m[(1, 2)], //
        m[(2, 0)], m[(2, 1)], m[(2, 2)],
    );
    let quat = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation));

    Pose {
        position: [m[(0, 3)], m[(1, 3)], m[(2, 3)]],
        orientation: orientation_from_quaternion(&quat),
    }
}

pub fn isometry_from_pose(pose: &Pose) -> Isometry3<f32> {
    let [x, y, z] = pose.position;
    Isometry3::from_parts(
        Translation3::new(x, y, z),
        unit_quaternion(&pose.orientation),
    )
}

pub fn scale_position(position: &[f32; 3], world_scale: f32) -> [f32; 3] {
    [
        position[0] * world_scale,
        position[1] * world_scale,
        position[2] * world_scale,
    ]
}

/// Eye poses from a head pose and the head-to-eye offsets (head space, meters). Both eyes keep
/// the head orientation.
pub fn calc_eye_poses(head: &Pose, hmd_to_eye_offset: &[[f32; 3]; 2]) -> [Pose; 2] {
    let rotation = unit_quaternion(&head.orientation);
    let head_position = Vector3::from(head.position);

    let eye_pose = |offset: &[f32; 3]| {
        let position = head_position + rotation * Vector3::from(*offset);
        Pose {
            position: [position.x, position.y, position.z],
            orientation: head.orientation,
        }
    };

    [
        eye_pose(&hmd_to_eye_offset[0]),
        eye_pose(&hmd_to_eye_offset[1]),
    ]
}

pub fn eye_pose_from_pose(pose: &Pose, world_scale: f32) -> EyePose {
    let scaled_pose = Pose {
        position: scale_position(&pose.position, world_scale),
        orientation: orientation_from_quaternion(&unit_quaternion(&pose.orientation)),
    };
    let view = isometry_from_pose(&scaled_pose).inverse().to_homogeneous();

    EyePose {
        orientation: scaled_pose.orientation,
        position: scaled_pose.position,
        view: rows_from_matrix4(&view),
    }
}

pub fn eye_pose_from_matrix4(eye_to_tracking: &Matrix4<f32>, world_scale: f32) -> EyePose {
    eye_pose_from_pose(&pose_from_matrix4(eye_to_tracking), world_scale)
}

pub fn head_pose_from_pose(head: &Pose, eye_offsets: &[[f32; 3]; 2], world_scale: f32) -> HeadPose {
    let scaled_head = Pose {
        position: scale_position(&head.position, world_scale),
        orientation: head.orientation,
    };

    HeadPose {
        transform: rows_from_matrix4(&isometry_from_pose(&scaled_head).to_homogeneous()),
        eye_offsets: [
            scale_position(&eye_offsets[0], world_scale),
            scale_position(&eye_offsets[1], world_scale),
        ],
    }
}
