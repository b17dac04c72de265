//! Small vector operations over the agent dimension.

use glam::{EulerRot, Quat, Vec3};

/// All ordered pairwise relative positions, self excluded:
/// `rpos[i][k] = pos[i] - pos[j]` where `j` runs over the other vehicles in
/// simulator order. The outer difference is built and its diagonal dropped in
/// one pass.
#[must_use]
pub fn pairwise_rpos(pos: &[Vec3]) -> Vec<Vec<Vec3>> {
    (0..pos.len())
        .map(|i| {
            (0..pos.len())
                .filter(|&j| j != i)
                .map(|j| pos[i] - pos[j])
                .collect()
        })
        .collect()
}

/// Pairwise distances matching [`pairwise_rpos`] element-for-element.
#[must_use]
pub fn pairwise_dist(rpos: &[Vec<Vec3>]) -> Vec<Vec<f32>> {
    rpos.iter()
        .map(|row| row.iter().map(|v| v.length()).collect())
        .collect()
}

/// For each index, the values of all other indices in order.
#[must_use]
pub fn others<T: Copy>(values: &[T]) -> Vec<Vec<T>> {
    (0..values.len())
        .map(|i| {
            values
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, v)| *v)
                .collect()
        })
        .collect()
}

/// One-hot identity vector for the agent at `index` among `count` agents.
#[must_use]
pub fn one_hot(index: usize, count: usize) -> Vec<f32> {
    let mut v = vec![0.0; count];
    v[index] = 1.0;
    v
}

/// Quaternion from roll/pitch/yaw (intrinsic yaw-pitch-roll composition).
#[must_use]
pub fn euler_to_quat(rpy: Vec3) -> Quat {
    Quat::from_euler(EulerRot::ZYX, rpy.z, rpy.y, rpy.x)
}

/// The rotated local axis (0 = X, 1 = Y, 2 = Z) of an orientation.
///
/// # Panics
/// Panics on an axis index above 2.
#[must_use]
pub fn quat_axis(rot: Quat, axis: usize) -> Vec3 {
    let local = match axis {
        0 => Vec3::X,
        1 => Vec3::Y,
        2 => Vec3::Z,
        _ => panic!("axis index out of range: {axis}"),
    };
    rot * local
}

/// Minimum pairwise distance across a [`pairwise_dist`] table.
#[must_use]
pub fn min_separation(pdist: &[Vec<f32>]) -> f32 {
    pdist
        .iter()
        .flatten()
        .copied()
        .fold(f32::INFINITY, f32::min)
}

#[cfg(test)]
mod tests {
    use super::{euler_to_quat, min_separation, one_hot, others, pairwise_dist, pairwise_rpos, quat_axis};
    use glam::Vec3;

    #[test]
    fn rpos_skips_self_and_keeps_order() {
        let pos = [Vec3::ZERO, Vec3::X, Vec3::new(0.0, 2.0, 0.0)];
        let rpos = pairwise_rpos(&pos);
        assert_eq!(rpos.len(), 3);
        assert_eq!(rpos[0].len(), 2);
        assert_eq!(rpos[0][0], -Vec3::X);
        assert_eq!(rpos[1][0], Vec3::X);
        assert_eq!(rpos[2][1], Vec3::new(0.0, 2.0, 0.0) - Vec3::X);
    }

    #[test]
    fn separation_is_the_smallest_distance() {
        let pos = [Vec3::ZERO, Vec3::X * 3.0, Vec3::X * 3.5];
        let pdist = pairwise_dist(&pairwise_rpos(&pos));
        let sep = min_separation(&pdist);
        assert!((sep - 0.5).abs() < 1e-6);
    }

    #[test]
    fn one_hot_marks_only_the_own_index() {
        assert_eq!(one_hot(1, 3), vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn others_drops_exactly_self() {
        let o = others(&[10, 20, 30]);
        assert_eq!(o[0], vec![20, 30]);
        assert_eq!(o[1], vec![10, 30]);
        assert_eq!(o[2], vec![10, 20]);
    }

    #[test]
    fn identity_orientation_heads_along_x() {
        let rot = euler_to_quat(Vec3::ZERO);
        assert!(quat_axis(rot, 0).abs_diff_eq(Vec3::X, 1e-6));
        assert!(quat_axis(rot, 2).abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn quarter_yaw_turns_heading_to_y() {
        let rot = euler_to_quat(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2));
        assert!(quat_axis(rot, 0).abs_diff_eq(Vec3::Y, 1e-5));
    }
}
