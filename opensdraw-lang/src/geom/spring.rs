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

//! Analytic helical spring builder.
//!
//! Three pieces along +z: flat starting end-turns (zero pitch), the
//! pitched middle turns that carry the whole axial rise, and flat ending
//! end-turns -- the same three-piece decomposition as the original lcad
//! `spring.py`, but computed in closed form (a uniform helix has
//! constant `ds/dt`, so no LUT or optimization is needed here).

use std::f64::consts::PI;

use opensdraw_math::Pt3;

use crate::error::{ErrorKind, LResult, LcadError};
use crate::geom::euler_from_frame;

pub struct SpringOptions {
    pub length: f64,
    pub diameter: f64,
    #[allow(dead_code)]
    pub gauge: f64,
    pub turns: f64,
    pub end_turns: f64,
}

pub struct SpringFn {
    radius: f64,
    length_start: f64,
    length_mid: f64,
    length_end: f64,
    total_length: f64,
    theta_start_rate: f64,
    mid_turns: f64,
    axial_length: f64,
}

pub fn build(opts: SpringOptions) -> LResult<SpringFn> {
    if opts.diameter <= 0.0 {
        return Err(LcadError::new(ErrorKind::ControlPoint("spring diameter must be positive".into())));
    }
    if opts.turns <= 2.0 * opts.end_turns {
        return Err(LcadError::new(ErrorKind::NumberControlPoints(
            "spring turns must exceed twice the end-turn count".into(),
        )));
    }

    let radius = opts.diameter / 2.0;
    let mid_turns = opts.turns - 2.0 * opts.end_turns;

    let length_start = PI * opts.diameter * opts.end_turns;
    let length_mid = ((PI * opts.diameter * mid_turns).powi(2) + opts.length * opts.length).sqrt();
    let length_end = length_start;
    let total_length = length_start + length_mid + length_end;

    Ok(SpringFn {
        radius,
        length_start,
        length_mid,
        length_end,
        total_length,
        theta_start_rate: 1.0 / radius,
        mid_turns,
        axial_length: opts.length,
    })
}

pub struct SpringSample {
    pub pos: Pt3,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl SpringFn {
    pub fn length(&self) -> f64 {
        self.total_length
    }

    pub fn eval(&self, s: f64) -> SpringSample {
        let s = s.clamp(0.0, self.total_length);

        if s <= self.length_start {
            self.sample_flat(s, 0.0, 0.0)
        } else if s <= self.length_start + self.length_mid {
            let u = s - self.length_start;
            let theta0 = self.length_start * self.theta_start_rate;
            self.sample_mid(u, theta0)
        } else {
            let v = s - self.length_start - self.length_mid;
            let theta0 = self.length_start * self.theta_start_rate + 2.0 * PI * self.mid_turns;
            self.sample_flat(v, theta0, self.axial_length)
        }
    }

    fn sample_flat(&self, local: f64, theta0: f64, z: f64) -> SpringSample {
        let theta = theta0 + local * self.theta_start_rate;
        let pos = Pt3::new(self.radius * theta.cos(), self.radius * theta.sin(), z);
        let radial = Pt3::new(theta.cos(), theta.sin(), 0.0);
        let tangent = Pt3::new(-theta.sin(), theta.cos(), 0.0);
        self.sample_from_frame(pos, radial, tangent)
    }

    fn sample_mid(&self, u: f64, theta0: f64) -> SpringSample {
        if self.length_mid < 1.0e-12 {
            return self.sample_flat(0.0, theta0, 0.0);
        }
        let t = u / self.length_mid;
        let theta = theta0 + 2.0 * PI * self.mid_turns * t;
        let z = self.axial_length * t;
        let pos = Pt3::new(self.radius * theta.cos(), self.radius * theta.sin(), z);

        let dtheta = 2.0 * PI * self.mid_turns / self.length_mid;
        let dz = self.axial_length / self.length_mid;
        let tangent = Pt3::new(-self.radius * theta.sin() * dtheta, self.radius * theta.cos() * dtheta, dz).normalized();
        let radial = Pt3::new(theta.cos(), theta.sin(), 0.0);
        self.sample_from_frame(pos, radial, tangent)
    }

    fn sample_from_frame(&self, pos: Pt3, radial: Pt3, tangent: Pt3) -> SpringSample {
        let binormal = tangent.cross(radial);
        let (rx, ry, rz) = euler_from_frame(radial, binormal, tangent);
        SpringSample { pos, rx, ry, rz }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spring() -> SpringFn {
        build(SpringOptions { length: 20.0, diameter: 10.0, gauge: 1.0, turns: 8.0, end_turns: 1.0 }).unwrap()
    }

    #[test]
    fn length_matches_accumulated_piece_lengths() {
        let s = sample_spring();
        assert!(s.length() > 0.0);
        let at_end = s.eval(s.length());
        assert!((at_end.pos.z - 20.0).abs() < 1.0e-6);
    }

    #[test]
    fn start_is_at_z_zero() {
        let s = sample_spring();
        let at_start = s.eval(0.0);
        assert!(at_start.pos.z.abs() < 1.0e-9);
    }

    #[test]
    fn distance_is_clamped_to_valid_range() {
        let s = sample_spring();
        let beyond = s.eval(s.length() + 100.0);
        let at_end = s.eval(s.length());
        assert!((beyond.pos.x - at_end.pos.x).abs() < 1.0e-9);
    }

    #[test]
    fn rejects_too_few_turns_for_end_turns() {
        assert!(build(SpringOptions { length: 10.0, diameter: 5.0, gauge: 1.0, turns: 2.0, end_turns: 1.0 }).is_err());
    }
}
