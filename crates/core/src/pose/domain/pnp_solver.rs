use ndarray::{Array1, Array2};

use crate::detection::domain::face_landmarks::FaceObservation;
use crate::pose::domain::head_pose::{rotation_matrix, HeadPose};

/// Generic face model in millimetres, nose tip at the origin, y up.
pub const MODEL_POINTS: [[f64; 3]; 6] = [
    [0.0, 0.0, 0.0],        // nose tip
    [0.0, -63.6, -12.5],    // chin
    [-43.3, 32.7, -26.0],   // left eye outer corner
    [43.3, 32.7, -26.0],    // right eye outer corner
    [-28.9, -28.9, -24.1],  // left mouth corner
    [28.9, -28.9, -24.1],   // right mouth corner
];

/// Face-mesh landmark index for each entry of [`MODEL_POINTS`].
pub const MODEL_LANDMARK_INDICES: [usize; 6] = [1, 152, 33, 263, 61, 291];

const EYE_SPAN_MM: f64 = 86.6;
const MAX_ITERATIONS: usize = 100;
const MAX_DAMPING: f64 = 1e10;

/// Perspective-n-point solver for the six-point face model.
///
/// The camera is an ideal pinhole with focal length equal to the frame
/// width and the principal point at the frame centre. Pose is refined
/// with Levenberg-Marquardt on the reprojection error, starting from a
/// frontal face at the depth implied by the eye span.
pub struct PnpSolver {
    focal: f64,
    cx: f64,
    cy: f64,
}

impl PnpSolver {
    pub fn new(frame_w: u32, frame_h: u32) -> Self {
        Self {
            focal: frame_w as f64,
            cx: frame_w as f64 / 2.0,
            cy: frame_h as f64 / 2.0,
        }
    }

    /// Pixel positions of the model landmarks, or `None` when the face
    /// does not carry a full mesh.
    pub fn image_points(
        face: &FaceObservation,
        frame_w: u32,
        frame_h: u32,
    ) -> Option<[(f64, f64); 6]> {
        let points = face.points();
        let mut out = [(0.0, 0.0); 6];
        for (slot, &idx) in out.iter_mut().zip(MODEL_LANDMARK_INDICES.iter()) {
            *slot = points.get(idx)?.to_pixels(frame_w, frame_h);
        }
        Some(out)
    }

    /// Projects a model point. `None` if it lands behind the camera.
    pub fn project(
        &self,
        rotation: [f64; 3],
        translation: [f64; 3],
        point: [f64; 3],
    ) -> Option<(f64, f64)> {
        let m = rotation_matrix(rotation);
        let mut cam = [0.0; 3];
        for (i, row) in m.iter().enumerate() {
            cam[i] = row[0] * point[0] + row[1] * point[1] + row[2] * point[2] + translation[i];
        }
        if cam[2] <= 1e-9 {
            return None;
        }
        Some((
            self.focal * cam[0] / cam[2] + self.cx,
            self.focal * cam[1] / cam[2] + self.cy,
        ))
    }

    pub fn solve(&self, image_points: &[(f64, f64); 6]) -> Option<HeadPose> {
        let mut params = self.initial_guess(image_points)?;
        let mut residuals = self.residuals(&params, image_points)?;
        let mut cost = residuals.dot(&residuals);
        let mut damping = 1e-3;

        'outer: for _ in 0..MAX_ITERATIONS {
            let jacobian = self.jacobian(&params, image_points)?;
            let jtj = jacobian.t().dot(&jacobian);
            let descent = jacobian.t().dot(&residuals).mapv(|g| -g);

            loop {
                if damping > MAX_DAMPING {
                    break 'outer;
                }
                let mut damped = jtj.clone();
                for i in 0..6 {
                    damped[[i, i]] += damping * jtj[[i, i]].max(1e-12);
                }
                let Some(step) = solve_linear(damped, descent.clone()) else {
                    damping *= 10.0;
                    continue;
                };
                let candidate = &params + &step;
                let trial = self
                    .residuals(&candidate, image_points)
                    .map(|r| (r.dot(&r), r))
                    .filter(|(c, _)| *c < cost);
                let Some((new_cost, new_residuals)) = trial else {
                    damping *= 10.0;
                    continue;
                };

                let converged = cost - new_cost <= 1e-12 * cost
                    || step.dot(&step).sqrt() <= 1e-12 * (1.0 + params.dot(&params).sqrt());
                params = candidate;
                residuals = new_residuals;
                cost = new_cost;
                damping = (damping / 10.0).max(1e-12);
                if converged {
                    break 'outer;
                }
                break;
            }
        }

        if !params.iter().all(|p| p.is_finite()) || params[5] <= 0.0 {
            return None;
        }
        let rms = (cost / residuals.len() as f64).sqrt();
        log::trace!("PnP converged with reprojection rms {rms:.3}px");
        Some(HeadPose::new(
            [params[0], params[1], params[2]],
            [params[3], params[4], params[5]],
        ))
    }

    fn initial_guess(&self, image_points: &[(f64, f64); 6]) -> Option<Array1<f64>> {
        let (lx, ly) = image_points[2];
        let (rx, ry) = image_points[3];
        let eye_span = ((rx - lx).powi(2) + (ry - ly).powi(2)).sqrt();
        if !(eye_span.is_finite() && eye_span > 1e-6) {
            return None;
        }
        let tz = self.focal * EYE_SPAN_MM / eye_span;
        let (nx, ny) = image_points[0];
        // Model y points up and the image's y points down: half a turn about x.
        Some(Array1::from(vec![
            std::f64::consts::PI,
            0.0,
            0.0,
            (nx - self.cx) * tz / self.focal,
            (ny - self.cy) * tz / self.focal,
            tz,
        ]))
    }

    fn residuals(
        &self,
        params: &Array1<f64>,
        image_points: &[(f64, f64); 6],
    ) -> Option<Array1<f64>> {
        let rotation = [params[0], params[1], params[2]];
        let translation = [params[3], params[4], params[5]];
        let mut r = Array1::zeros(2 * MODEL_POINTS.len());
        for (i, (model, observed)) in MODEL_POINTS.iter().zip(image_points.iter()).enumerate() {
            let (u, v) = self.project(rotation, translation, *model)?;
            r[2 * i] = u - observed.0;
            r[2 * i + 1] = v - observed.1;
        }
        Some(r)
    }

    /// Central differences, one column per pose parameter.
    fn jacobian(
        &self,
        params: &Array1<f64>,
        image_points: &[(f64, f64); 6],
    ) -> Option<Array2<f64>> {
        let mut jacobian = Array2::zeros((2 * MODEL_POINTS.len(), params.len()));
        for j in 0..params.len() {
            let h = 1e-6 * params[j].abs().max(1.0);
            let mut plus = params.clone();
            plus[j] += h;
            let mut minus = params.clone();
            minus[j] -= h;
            let forward = self.residuals(&plus, image_points)?;
            let backward = self.residuals(&minus, image_points)?;
            let diff = (forward - backward) / (2.0 * h);
            jacobian.column_mut(j).assign(&diff);
        }
        Some(jacobian)
    }
}

/// Gaussian elimination with partial pivoting. `None` if singular.
fn solve_linear(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot =
            (col..n).max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))?;
        if a[[pivot, col]].abs() < 1e-15 {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                a.swap([pivot, k], [col, k]);
            }
            b.swap(pivot, col);
        }
        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = Array1::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[[row, k]] * x[k]).sum();
        x[row] = (b[row] - tail) / a[[row, row]];
    }
    Some(x)
}
