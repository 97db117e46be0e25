//! Stick-figure view of the pose world landmarks.
//!
//! Landmarks arrive in MediaPipe world space; the view flips every axis so
//! the figure stands upright facing the viewer.

use crate::stats::Landmark;

/// Bones between MediaPipe pose landmarks: arms, torso, legs.
pub const POSE_CONNECTIONS: [(usize, usize); 16] = [
    (11, 12),
    (11, 13),
    (13, 15),
    (12, 14),
    (14, 16),
    (11, 23),
    (12, 24),
    (23, 24),
    (23, 25),
    (24, 26),
    (25, 27),
    (26, 28),
    (27, 29),
    (28, 30),
    (29, 31),
    (30, 32),
];

const LAST_BODY_LANDMARK: usize = 32;
const FIRST_BODY_JOINT: usize = 11;
pub const FACE_COLOR: &str = "hotpink";
pub const BODY_COLOR: &str = "orange";
pub const BONE_COLOR: &str = "white";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Joint {
    pub index: usize,
    pub position: [f64; 3],
    pub color: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkeletonView {
    pub joints: Vec<Joint>,
    pub bones: Vec<(usize, usize)>,
}

impl SkeletonView {
    pub fn build(landmarks: &[Landmark]) -> Self {
        let joints = landmarks
            .iter()
            .enumerate()
            .take(LAST_BODY_LANDMARK + 1)
            .map(|(index, landmark)| Joint {
                index,
                position: [-landmark.x, -landmark.y, -landmark.z],
                color: if index < FIRST_BODY_JOINT {
                    FACE_COLOR
                } else {
                    BODY_COLOR
                },
            })
            .collect();
        let bones = POSE_CONNECTIONS
            .iter()
            .copied()
            .filter(|(start, end)| *start < landmarks.len() && *end < landmarks.len())
            .collect();
        Self { joints, bones }
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Front orthographic projection into a `width`×`height` viewport with
    /// `scale` pixels per metre; screen y grows downwards.
    pub fn project(&self, width: f64, height: f64, scale: f64) -> Vec<(usize, f64, f64)> {
        self.joints
            .iter()
            .map(|joint| {
                let [x, y, _] = joint.position;
                (joint.index, width / 2.0 + x * scale, height / 2.0 - y * scale)
            })
            .collect()
    }
}
