//! View factors of a cube enclosure.
//!
//! Three sources are provided: fixed adjacent/opposite values, the exact
//! closed-form results for square plates, and a Monte Carlo estimate by
//! cosine-weighted ray casting.

use std::f64::consts::PI;

use anyhow::Result;
use rand::Rng;

use super::{N_FACES, ViewFactorMatrix};

/// Opposite face pairs.
pub const OPPOSITE_PAIRS: [(usize, usize); 3] = [(0, 5), (1, 2), (3, 4)];

/// Face labels, matching [`FACE_GEOMETRY`].
pub const FACE_NAMES: [&str; N_FACES] = ["bottom", "west", "east", "south", "north", "top"];

/// `(axis, plane coordinate)` of each face of the unit cube `[0, 1]^3`.
const FACE_GEOMETRY: [(usize, f64); N_FACES] =
    [(2, 0.0), (0, 0.0), (0, 1.0), (1, 0.0), (1, 1.0), (2, 1.0)];

pub fn are_opposite(i: usize, j: usize) -> bool {
    OPPOSITE_PAIRS
        .iter()
        .any(|&(a, b)| (i == a && j == b) || (i == b && j == a))
}

/// View factor matrix from one value for adjacent and one for opposite faces.
pub fn cube_view_factors(f_adjacent: f64, f_opposite: f64) -> ViewFactorMatrix {
    let mut f = [[0.0; N_FACES]; N_FACES];
    for (i, row) in f.iter_mut().enumerate() {
        for (j, fij) in row.iter_mut().enumerate() {
            if i == j {
                continue;
            }
            *fij = if are_opposite(i, j) {
                f_opposite
            } else {
                f_adjacent
            };
        }
    }
    f
}

/// View factor between two directly opposed parallel rectangles `a × b`
/// separated by `c`.
pub fn parallel_rectangles(a: f64, b: f64, c: f64) -> f64 {
    let x = a / c;
    let y = b / c;
    let x2 = 1.0 + x * x;
    let y2 = 1.0 + y * y;
    2.0 / (PI * x * y)
        * ((x2 * y2 / (x2 + y2 - 1.0)).sqrt().ln() + x * y2.sqrt() * (x / y2.sqrt()).atan()
            + y * x2.sqrt() * (y / x2.sqrt()).atan()
            - x * x.atan()
            - y * y.atan())
}

/// View factor from a rectangle `l × w` to a perpendicular rectangle
/// `l × h` sharing the common edge of length `l`.
pub fn perpendicular_rectangles(w: f64, h: f64, l: f64) -> f64 {
    let w = w / l;
    let h = h / l;
    let w2 = w * w;
    let h2 = h * h;
    let hw = (h2 + w2).sqrt();
    let log_term = ((1.0 + w2) * (1.0 + h2) / (1.0 + w2 + h2)).ln()
        + w2 * (w2 * (1.0 + w2 + h2) / ((1.0 + w2) * (w2 + h2))).ln()
        + h2 * (h2 * (1.0 + h2 + w2) / ((1.0 + h2) * (h2 + w2))).ln();
    1.0 / (PI * w) * (w * (1.0 / w).atan() + h * (1.0 / h).atan() - hw * (1.0 / hw).atan()
        + 0.25 * log_term)
}

/// Exact view factors of a cube from the plate formulas.
pub fn analytic_cube_view_factors() -> ViewFactorMatrix {
    cube_view_factors(
        perpendicular_rectangles(1.0, 1.0, 1.0),
        parallel_rectangles(1.0, 1.0, 1.0),
    )
}

/// Monte Carlo view factors of the unit cube.
///
/// For each face, `rays_per_face` cosine-weighted rays leave uniformly
/// sampled points and the face where each ray exits the cube is counted.
/// The counts are then symmetrized (all faces have equal area) and the
/// rows normalized.
pub fn monte_carlo_cube_view_factors<R: Rng + ?Sized>(
    rays_per_face: usize,
    rng: &mut R,
) -> Result<ViewFactorMatrix> {
    anyhow::ensure!(
        rays_per_face > 0,
        "Monte Carlo view factors need at least one ray per face"
    );
    let mut f = [[0.0; N_FACES]; N_FACES];

    for (i, &(axis, plane)) in FACE_GEOMETRY.iter().enumerate() {
        // Inward normal
        let mut normal = [0.0; 3];
        normal[axis] = if plane == 0.0 { 1.0 } else { -1.0 };

        let mut hit_count = [0_u64; N_FACES];
        for _ in 0..rays_per_face {
            let mut origin = [rng.r#gen::<f64>(), rng.r#gen::<f64>(), rng.r#gen::<f64>()];
            origin[axis] = plane;
            let dir = cosine_weighted_hemisphere_dir(normal, rng);
            if let Some(j) = exit_face(origin, dir, i) {
                hit_count[j] += 1;
            }
        }
        for j in 0..N_FACES {
            f[i][j] = hit_count[j] as f64 / rays_per_face as f64;
        }
    }

    enforce_reciprocity_and_normalize(&mut f);
    Ok(f)
}

/// Cosine-weighted direction around the unit vector `n` (Malley's method).
fn cosine_weighted_hemisphere_dir<R: Rng + ?Sized>(n: [f64; 3], rng: &mut R) -> [f64; 3] {
    // Orthonormal basis around the normal.
    let arbitrary = if n[0].abs() < 0.9 {
        [1.0, 0.0, 0.0]
    } else {
        [0.0, 1.0, 0.0]
    };
    let tangent = normalize(cross(n, arbitrary));
    let bitangent = cross(n, tangent);

    let u1: f64 = rng.r#gen();
    let u2: f64 = rng.r#gen();
    let r = u1.sqrt();
    let phi = 2.0 * PI * u2;
    let x = r * phi.cos();
    let y = r * phi.sin();
    let z = (1.0 - u1).sqrt();

    [
        tangent[0] * x + bitangent[0] * y + n[0] * z,
        tangent[1] * x + bitangent[1] * y + n[1] * z,
        tangent[2] * x + bitangent[2] * y + n[2] * z,
    ]
}

/// Face through which a ray from `origin` leaves the unit cube, skipping
/// the face it starts on.
fn exit_face(origin: [f64; 3], dir: [f64; 3], from: usize) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (j, &(axis, plane)) in FACE_GEOMETRY.iter().enumerate() {
        if j == from || dir[axis].abs() < 1e-15 {
            continue;
        }
        let t = (plane - origin[axis]) / dir[axis];
        if t <= 0.0 {
            continue;
        }
        if best.is_none_or(|(_, bt)| t < bt) {
            best = Some((j, t));
        }
    }
    best.map(|(j, _)| j)
}

/// Enforce reciprocity for equal areas (`F_ij = F_ji`) and normalize rows.
fn enforce_reciprocity_and_normalize(f: &mut ViewFactorMatrix) {
    for i in 0..N_FACES {
        for j in (i + 1)..N_FACES {
            let avg = 0.5 * (f[i][j] + f[j][i]);
            f[i][j] = avg;
            f[j][i] = avg;
        }
        f[i][i] = 0.0;
    }
    for row in f.iter_mut() {
        let sum: f64 = row.iter().sum();
        if sum > 0.0 {
            for v in row.iter_mut() {
                *v /= sum;
            }
        }
    }
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / len, v[1] / len, v[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_fixed_matrix_structure() {
        let f = cube_view_factors(0.200044, 0.199824);
        for i in 0..N_FACES {
            assert_eq!(f[i][i], 0.0);
            let row_sum: f64 = f[i].iter().sum();
            assert!((row_sum - 1.0).abs() < 1e-5, "Row {i} sum = {row_sum}");
            for j in 0..N_FACES {
                assert_eq!(f[i][j], f[j][i], "F not symmetric at ({i}, {j})");
            }
        }
        assert_eq!(f[0][5], 0.199824);
        assert_eq!(f[2][1], 0.199824);
        assert_eq!(f[3][4], 0.199824);
        assert_eq!(f[0][1], 0.200044);
        assert_eq!(f[4][5], 0.200044);
    }

    #[test]
    fn test_analytic_plate_values() {
        let f_opp = parallel_rectangles(1.0, 1.0, 1.0);
        let f_adj = perpendicular_rectangles(1.0, 1.0, 1.0);
        assert!((f_opp - 0.199824).abs() < 1e-5, "F_opp = {f_opp}");
        assert!((f_adj - 0.200044).abs() < 1e-5, "F_adj = {f_adj}");
        assert!((f_opp + 4.0 * f_adj - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_monte_carlo_close_to_analytic() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mc = monte_carlo_cube_view_factors(20_000, &mut rng).unwrap();
        let exact = analytic_cube_view_factors();
        for i in 0..N_FACES {
            let row_sum: f64 = mc[i].iter().sum();
            assert!((row_sum - 1.0).abs() < 1e-9);
            for j in 0..N_FACES {
                assert!(
                    (mc[i][j] - exact[i][j]).abs() < 0.02,
                    "MC F[{i},{j}] = {:.4}, exact {:.4}",
                    mc[i][j],
                    exact[i][j]
                );
            }
        }
    }

    #[test]
    fn test_monte_carlo_without_rays_is_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(monte_carlo_cube_view_factors(0, &mut rng).is_err());
    }

    #[test]
    fn test_exit_face() {
        // From the bottom center straight up hits the top.
        assert_eq!(exit_face([0.5, 0.5, 0.0], [0.0, 0.0, 1.0], 0), Some(5));
        // Towards +x from the bottom hits the east face.
        assert_eq!(exit_face([0.5, 0.5, 0.0], [1.0, 0.0, 0.1], 0), Some(2));
    }

    #[test]
    fn test_opposite_pairs() {
        assert!(are_opposite(5, 0));
        assert!(are_opposite(1, 2));
        assert!(!are_opposite(0, 1));
    }
}
