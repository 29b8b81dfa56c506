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

use crate::{dcos, dsin, Pt3};

/// A 4x4 affine transform, stored column-major: `m[col * 4 + row]`.
///
/// Column `3` (indices 12..16) is always `(0, 0, 0, 1)` for every matrix
/// this crate constructs, since opensdraw only ever composes rotations,
/// translations and axis scales (all affine).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mt4 {
    cols: [f64; 16],
}

impl std::ops::Index<usize> for Mt4 {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cols[index]
    }
}

impl std::ops::IndexMut<usize> for Mt4 {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.cols[index]
    }
}

impl std::ops::Mul for Mt4 {
    type Output = Mt4;

    /// Matrix product `self * rhs`, applied to column vectors as
    /// `self * (rhs * v)` -- i.e. `rhs` is the inner transform.
    fn mul(self, rhs: Mt4) -> Mt4 {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += self.cols[k * 4 + row] * rhs.cols[col * 4 + k];
                }
                out[col * 4 + row] = acc;
            }
        }
        Mt4 { cols: out }
    }
}

impl Default for Mt4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mt4 {
    pub fn identity() -> Self {
        let mut cols = [0.0; 16];
        cols[0] = 1.0;
        cols[5] = 1.0;
        cols[10] = 1.0;
        cols[15] = 1.0;
        Mt4 { cols }
    }

    pub fn translation(t: Pt3) -> Self {
        let mut m = Mt4::identity();
        m.cols[12] = t.x;
        m.cols[13] = t.y;
        m.cols[14] = t.z;
        m
    }

    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut m = Mt4::identity();
        m.cols[0] = sx;
        m.cols[5] = sy;
        m.cols[10] = sz;
        m
    }

    /// Rotation about X, in degrees.
    pub fn rot_x(degrees: f64) -> Self {
        let c = dcos(degrees);
        let s = dsin(degrees);
        let mut m = Mt4::identity();
        m.cols[5] = c;
        m.cols[6] = s;
        m.cols[9] = -s;
        m.cols[10] = c;
        m
    }

    /// Rotation about Y, in degrees.
    pub fn rot_y(degrees: f64) -> Self {
        let c = dcos(degrees);
        let s = dsin(degrees);
        let mut m = Mt4::identity();
        m.cols[0] = c;
        m.cols[2] = -s;
        m.cols[8] = s;
        m.cols[10] = c;
        m
    }

    /// Rotation about Z, in degrees.
    pub fn rot_z(degrees: f64) -> Self {
        let c = dcos(degrees);
        let s = dsin(degrees);
        let mut m = Mt4::identity();
        m.cols[0] = c;
        m.cols[1] = s;
        m.cols[4] = -s;
        m.cols[5] = c;
        m
    }

    /// Euler rotation matrix applying Z first, then Y, then X: `Rx * Ry * Rz`.
    /// This matches `spec.md` §4.5's `(rotate (ax ay az) ...)` contract.
    pub fn rotation_xyz(ax: f64, ay: f64, az: f64) -> Self {
        Mt4::rot_x(ax) * Mt4::rot_y(ay) * Mt4::rot_z(az)
    }

    /// Build a matrix from 16 numbers in row-major reading order
    /// (the order a flattened nested-list `(transform M ...)` argument
    /// would naturally produce).
    pub fn from_row_major(values: &[f64; 16]) -> Self {
        let mut cols = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                cols[col * 4 + row] = values[row * 4 + col];
            }
        }
        Mt4 { cols }
    }

    pub fn transform_point(&self, p: Pt3) -> Pt3 {
        Pt3::new(
            self.cols[0] * p.x + self.cols[4] * p.y + self.cols[8] * p.z + self.cols[12],
            self.cols[1] * p.x + self.cols[5] * p.y + self.cols[9] * p.z + self.cols[13],
            self.cols[2] * p.x + self.cols[6] * p.y + self.cols[10] * p.z + self.cols[14],
        )
    }

    /// Direction transform: like `transform_point` but ignores translation.
    pub fn transform_dir(&self, p: Pt3) -> Pt3 {
        Pt3::new(
            self.cols[0] * p.x + self.cols[4] * p.y + self.cols[8] * p.z,
            self.cols[1] * p.x + self.cols[5] * p.y + self.cols[9] * p.z,
            self.cols[2] * p.x + self.cols[6] * p.y + self.cols[10] * p.z,
        )
    }

    pub fn translation_part(&self) -> Pt3 {
        Pt3::new(self.cols[12], self.cols[13], self.cols[14])
    }

    /// The 3x3 rotation/scale block, row-major, as used by LDraw type-1 lines:
    /// `a b c d e f g h i` corresponding to the matrix
    /// `[[a b c] [d e f] [g h i]]`.
    pub fn rotation_part_row_major(&self) -> [f64; 9] {
        [
            self.cols[0],
            self.cols[4],
            self.cols[8],
            self.cols[1],
            self.cols[5],
            self.cols[9],
            self.cols[2],
            self.cols[6],
            self.cols[10],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx_eq;

    #[test]
    fn identity_is_noop() {
        let p = Pt3::new(1.0, 2.0, 3.0);
        let q = Mt4::identity().transform_point(p);
        assert!(approx_eq(p.x, q.x) && approx_eq(p.y, q.y) && approx_eq(p.z, q.z));
    }

    #[test]
    fn translation_adds_offset() {
        let m = Mt4::translation(Pt3::new(1.0, 2.0, 3.0));
        let q = m.transform_point(Pt3::ZERO);
        assert!(approx_eq(q.x, 1.0) && approx_eq(q.y, 2.0) && approx_eq(q.z, 3.0));
    }

    #[test]
    fn rot_z_90_matches_point_rotation() {
        let m = Mt4::rot_z(90.0);
        let q = m.transform_point(Pt3::new(1.0, 0.0, 0.0));
        assert!(approx_eq(q.x, 0.0));
        assert!(approx_eq(q.y, 1.0));
    }

    #[test]
    fn composition_order_matches_translate_then_rotate() {
        // A part placed at (0,0,1) inside (rotate (90 0 0) ...) should land
        // where Rx(90) maps (0,0,1), per spec.md §8's rotation-order property.
        let m = Mt4::rotation_xyz(90.0, 0.0, 0.0);
        let q = m.transform_point(Pt3::new(0.0, 0.0, 1.0));
        let direct = Mt4::rot_x(90.0).transform_point(Pt3::new(0.0, 0.0, 1.0));
        assert!(approx_eq(q.x, direct.x) && approx_eq(q.y, direct.y) && approx_eq(q.z, direct.z));
    }
}
