//! Head orientation and position recovered from a face's landmarks.
//!
//! Rotation is an axis-angle vector (radians) taking face-model
//! coordinates into camera coordinates; translation is the model origin
//! (nose tip) in camera space, in model millimetres. Euler angles are
//! derived once at construction.

pub type Matrix3 = [[f64; 3]; 3];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadPose {
    pub rotation: [f64; 3],
    pub translation: [f64; 3],
    /// Degrees, about the camera x axis.
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl HeadPose {
    pub fn new(rotation: [f64; 3], translation: [f64; 3]) -> Self {
        let (pitch, yaw, roll) = euler_degrees(&rotation_matrix(rotation));
        Self {
            rotation,
            translation,
            pitch,
            yaw,
            roll,
        }
    }

    /// Largest per-axis change in orientation since `earlier`, in degrees.
    pub fn max_angle_change(&self, earlier: &HeadPose) -> f64 {
        [
            wrap_degrees(self.pitch - earlier.pitch),
            wrap_degrees(self.yaw - earlier.yaw),
            wrap_degrees(self.roll - earlier.roll),
        ]
        .into_iter()
        .map(f64::abs)
        .fold(0.0, f64::max)
    }

    /// Straight-line distance moved since `earlier`, in model millimetres.
    pub fn distance_moved(&self, earlier: &HeadPose) -> f64 {
        self.translation
            .iter()
            .zip(earlier.translation.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

/// Which way a face is turned, judged by yaw alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadTurn {
    Forward,
    Left,
    Right,
}

impl HeadTurn {
    pub fn from_yaw(yaw: f64, side_threshold: f64) -> Self {
        if yaw.abs() <= side_threshold {
            HeadTurn::Forward
        } else if yaw < 0.0 {
            HeadTurn::Right
        } else {
            HeadTurn::Left
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            HeadTurn::Forward => None,
            HeadTurn::Left => Some("Turned Left"),
            HeadTurn::Right => Some("Turned Right"),
        }
    }
}

/// Rodrigues' formula.
pub fn rotation_matrix(r: [f64; 3]) -> Matrix3 {
    let theta = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt();
    if theta < 1e-12 {
        return [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
    }
    let (kx, ky, kz) = (r[0] / theta, r[1] / theta, r[2] / theta);
    let (s, c) = theta.sin_cos();
    let v = 1.0 - c;
    [
        [c + kx * kx * v, kx * ky * v - kz * s, kx * kz * v + ky * s],
        [ky * kx * v + kz * s, c + ky * ky * v, ky * kz * v - kx * s],
        [kz * kx * v - ky * s, kz * ky * v + kx * s, c + kz * kz * v],
    ]
}

/// (pitch, yaw, roll) in degrees, x-y-z decomposition.
pub fn euler_degrees(m: &Matrix3) -> (f64, f64, f64) {
    let sy = (m[0][0] * m[0][0] + m[1][0] * m[1][0]).sqrt();
    let (x, y, z) = if sy >= 1e-6 {
        (m[2][1].atan2(m[2][2]), (-m[2][0]).atan2(sy), m[1][0].atan2(m[0][0]))
    } else {
        ((-m[1][2]).atan2(m[1][1]), (-m[2][0]).atan2(sy), 0.0)
    };
    (x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Maps an angle difference onto `[-180, 180)`.
pub fn wrap_degrees(d: f64) -> f64 {
    (d + 180.0).rem_euclid(360.0) - 180.0
}
