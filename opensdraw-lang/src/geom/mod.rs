// MIT License
//
// Copyright (c) 2024 OpenSDraw contributors
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//

//! The geometry kernel: cubic-spline curves and analytic springs, both
//! exposing a distance -> (position, orientation) mapping.

pub mod curve;
pub mod spring;

/// Euler-angle extraction shared by curve and spring: given the local
/// tangent (`z`), perpendicular (`x`) and their cross product (`y`),
/// recover XYZ Euler angles in degrees using the same convention as the
/// original lcad curve/spring builders.
pub fn euler_from_frame(x: opensdraw_math::Pt3, y: opensdraw_math::Pt3, z: opensdraw_math::Pt3) -> (f64, f64, f64) {
    use opensdraw_math::datan2;

    let ry = datan2(-z.x, (z.y * z.y + z.z * z.z).sqrt());
    let (rx, rz) = if ry.to_radians().cos().abs() < 1.0e-3 {
        (0.0, datan2(x.y, y.y))
    } else {
        (datan2(-z.y, z.z), datan2(-y.x, x.x))
    };
    (rx, ry, rz)
}

/// A bounded 2-parameter Nelder-Mead simplex search. Small, fixed
/// iteration budget; used only to auto-scale curve tangent magnitudes, a
/// heuristic optimization that is allowed to fail per spec.
///
/// Returns the best point found and its objective value. Points are
/// clamped into `bounds` before every evaluation so the search never
/// leaves the feasible box.
pub fn nelder_mead_2d(
    mut f: impl FnMut([f64; 2]) -> f64,
    initial: [f64; 2],
    bounds: [[f64; 2]; 2],
) -> ([f64; 2], f64) {
    let clamp = |p: [f64; 2]| -> [f64; 2] {
        [p[0].clamp(bounds[0][0], bounds[0][1]), p[1].clamp(bounds[1][0], bounds[1][1])]
    };

    let step0 = (bounds[0][1] - bounds[0][0]).max(1.0e-6) * 0.1;
    let step1 = (bounds[1][1] - bounds[1][0]).max(1.0e-6) * 0.1;

    let mut simplex = [
        clamp(initial),
        clamp([initial[0] + step0, initial[1]]),
        clamp([initial[0], initial[1] + step1]),
    ];
    let mut values: Vec<f64> = simplex.iter().map(|&p| f(clamp(p))).collect();

    const MAX_ITERS: usize = 200;
    const TOL: f64 = 1.0e-8;

    for _ in 0..MAX_ITERS {
        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(std::cmp::Ordering::Equal));
        let (best, mid, worst) = (order[0], order[1], order[2]);

        if (values[worst] - values[best]).abs() < TOL {
            break;
        }

        let centroid = [
            (simplex[best][0] + simplex[mid][0]) / 2.0,
            (simplex[best][1] + simplex[mid][1]) / 2.0,
        ];

        let reflected = clamp([
            centroid[0] + (centroid[0] - simplex[worst][0]),
            centroid[1] + (centroid[1] - simplex[worst][1]),
        ]);
        let f_reflected = f(reflected);

        if f_reflected < values[best] {
            let expanded = clamp([
                centroid[0] + 2.0 * (centroid[0] - simplex[worst][0]),
                centroid[1] + 2.0 * (centroid[1] - simplex[worst][1]),
            ]);
            let f_expanded = f(expanded);
            if f_expanded < f_reflected {
                simplex[worst] = expanded;
                values[worst] = f_expanded;
            } else {
                simplex[worst] = reflected;
                values[worst] = f_reflected;
            }
        } else if f_reflected < values[mid] {
            simplex[worst] = reflected;
            values[worst] = f_reflected;
        } else {
            let contracted = clamp([
                centroid[0] + 0.5 * (simplex[worst][0] - centroid[0]),
                centroid[1] + 0.5 * (simplex[worst][1] - centroid[1]),
            ]);
            let f_contracted = f(contracted);
            if f_contracted < values[worst] {
                simplex[worst] = contracted;
                values[worst] = f_contracted;
            } else {
                for i in [mid, worst] {
                    simplex[i] = clamp([
                        simplex[best][0] + 0.5 * (simplex[i][0] - simplex[best][0]),
                        simplex[best][1] + 0.5 * (simplex[i][1] - simplex[best][1]),
                    ]);
                    values[i] = f(simplex[i]);
                }
            }
        }
    }

    let best_idx = (0..3)
        .min_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap();
    (simplex[best_idx], values[best_idx])
}
