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

//! Cubic Hermite spline curve builder.
//!
//! Ported from the arc-length-LUT / parallel-transport design of the
//! original lcad `curve.py`: each adjacent pair of control points becomes
//! a Hermite segment, tangent magnitudes are optionally auto-scaled to
//! minimize the segment's worst-case curvature, and a 100-sample LUT
//! maps parameter to cumulative arc length for fast distance lookups.

use opensdraw_math::Pt3;

use crate::error::{ErrorKind, LResult, LcadError};
use crate::geom::{euler_from_frame, nelder_mead_2d};

const LUT_SAMPLES: usize = 100;

#[derive(Clone, Copy, Debug)]
pub struct ControlPoint {
    pub loc: Pt3,
    pub dir: Pt3,
    /// Only present (and only meaningful) on the first control point.
    pub perp: Option<Pt3>,
}

struct LutPoint {
    arc: f64,
    pos: Pt3,
    tangent: Pt3,
    perp: Pt3,
}

struct Segment {
    lut: Vec<LutPoint>,
    length: f64,
}

pub struct CurveFn {
    segments: Vec<Segment>,
    /// Cumulative length at the *start* of each segment, same length as
    /// `segments`.
    segment_starts: Vec<f64>,
    total_length: f64,
    extrapolate: bool,
    twist: f64,
}

fn hermite_basis(t: f64) -> (f64, f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    (2.0 * t3 - 3.0 * t2 + 1.0, t3 - 2.0 * t2 + t, -2.0 * t3 + 3.0 * t2, t3 - t2)
}

fn hermite_basis_d1(t: f64) -> (f64, f64, f64, f64) {
    let t2 = t * t;
    (6.0 * t2 - 6.0 * t, 3.0 * t2 - 4.0 * t + 1.0, -6.0 * t2 + 6.0 * t, 3.0 * t2 - 2.0 * t)
}

fn hermite_basis_d2(t: f64) -> (f64, f64, f64, f64) {
    (12.0 * t - 6.0, 6.0 * t - 4.0, -12.0 * t + 6.0, 6.0 * t - 2.0)
}

fn hermite_point(p0: Pt3, t0: Pt3, p1: Pt3, t1: Pt3, u: f64) -> Pt3 {
    let (h00, h10, h01, h11) = hermite_basis(u);
    p0 * h00 + t0 * h10 + p1 * h01 + t1 * h11
}

fn hermite_d1(p0: Pt3, t0: Pt3, p1: Pt3, t1: Pt3, u: f64) -> Pt3 {
    let (h00, h10, h01, h11) = hermite_basis_d1(u);
    p0 * h00 + t0 * h10 + p1 * h01 + t1 * h11
}

fn hermite_d2(p0: Pt3, t0: Pt3, p1: Pt3, t1: Pt3, u: f64) -> Pt3 {
    let (h00, h10, h01, h11) = hermite_basis_d2(u);
    p0 * h00 + t0 * h10 + p1 * h01 + t1 * h11
}

fn curvature_at(p0: Pt3, t0: Pt3, p1: Pt3, t1: Pt3, u: f64) -> f64 {
    let d1 = hermite_d1(p0, t0, p1, t1, u);
    let d2 = hermite_d2(p0, t0, p1, t1, u);
    let speed = d1.length();
    if speed < 1.0e-9 {
        return 0.0;
    }
    d1.cross(d2).length() / speed.powi(3)
}

fn max_curvature(p0: Pt3, dir0: Pt3, p1: Pt3, dir1: Pt3, mag0: f64, mag1: f64) -> f64 {
    let t0 = dir0 * mag0;
    let t1 = dir1 * mag1;
    let mut worst: f64 = 0.0;
    for i in 0..LUT_SAMPLES {
        let u = i as f64 / (LUT_SAMPLES - 1) as f64;
        worst = worst.max(curvature_at(p0, t0, p1, t1, u));
    }
    worst
}

/// Build a segment's LUT and propagate the perpendicular vector that
/// started it; returns the segment plus the perpendicular at its end
/// (the start perpendicular for the following segment).
fn build_segment(p0: Pt3, t0: Pt3, p1: Pt3, t1: Pt3, start_perp: Pt3) -> (Segment, Pt3) {
    let mut lut = Vec::with_capacity(LUT_SAMPLES);
    let mut prev_pos = p0;
    let mut cumulative = 0.0;
    let mut perp = start_perp;

    for i in 0..LUT_SAMPLES {
        let u = i as f64 / (LUT_SAMPLES - 1) as f64;
        let pos = hermite_point(p0, t0, p1, t1, u);
        let tangent = hermite_d1(p0, t0, p1, t1, u).normalized();

        if i > 0 {
            cumulative += (pos - prev_pos).length();
            perp = (perp - tangent * perp.dot(tangent)).normalized();
        } else {
            perp = (perp - tangent * perp.dot(tangent)).normalized();
        }

        lut.push(LutPoint { arc: cumulative, pos, tangent, perp });
        prev_pos = pos;
    }

    let length = lut.last().unwrap().arc;
    let end_perp = lut.last().unwrap().perp;
    (Segment { lut, length }, end_perp)
}

pub struct CurveOptions {
    pub auto_scale: bool,
    pub extrapolate: bool,
    pub scale: f64,
    pub twist: f64,
}

pub fn build(points: &[ControlPoint], opts: CurveOptions) -> LResult<CurveFn> {
    if points.len() < 2 {
        return Err(LcadError::new(ErrorKind::NumberControlPoints(
            "curve needs at least 2 control points".into(),
        )));
    }
    let Some(start_perp) = points[0].perp else {
        return Err(LcadError::new(ErrorKind::ControlPoint(
            "the first control point must supply a perpendicular vector".into(),
        )));
    };
    for cp in points {
        if cp.dir.length() < 1.0e-9 {
            return Err(LcadError::new(ErrorKind::Tangent("control point direction has zero length".into())));
        }
    }

    let mut segments = Vec::with_capacity(points.len() - 1);
    let mut segment_starts = Vec::with_capacity(points.len() - 1);
    let mut total_length = 0.0;
    let mut carried_perp = start_perp.normalized();

    for i in 0..points.len() - 1 {
        let p0 = points[i].loc;
        let p1 = points[i + 1].loc;
        let dir0 = points[i].dir.normalized();
        let dir1 = points[i + 1].dir.normalized();
        let chord = (p1 - p0).length();
        let d = 2.0 * chord;

        let (mag0, mag1) = if opts.auto_scale {
            let bounds = [[0.1 * d, opts.scale * d], [0.1 * d, opts.scale * d]];
            let initial = [d.max(1.0e-6), d.max(1.0e-6)];
            let (best, _) = nelder_mead_2d(
                |m| max_curvature(p0, dir0, p1, dir1, m[0], m[1]),
                initial,
                bounds,
            );
            (best[0], best[1])
        } else {
            (opts.scale * chord, opts.scale * chord)
        };

        let t0 = dir0 * mag0;
        let t1 = dir1 * mag1;

        let (segment, end_perp) = build_segment(p0, t0, p1, t1, carried_perp);
        carried_perp = end_perp;
        segment_starts.push(total_length);
        total_length += segment.length;
        segments.push(segment);
    }

    Ok(CurveFn { segments, segment_starts, total_length, extrapolate: opts.extrapolate, twist: opts.twist })
}

/// `(position, rx, ry, rz)` for distance `s` along the curve.
pub struct CurveSample {
    pub pos: Pt3,
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
}

impl CurveFn {
    pub fn length(&self) -> f64 {
        self.total_length
    }

    pub fn eval(&self, s: f64) -> CurveSample {
        let len = self.total_length;

        if !self.extrapolate {
            let wrapped = s.rem_euclid(len.max(1.0e-12));
            return self.eval_in_range(wrapped);
        }

        if s < 0.0 {
            return self.extrapolate_from(0.0, s);
        }
        if s > len {
            return self.extrapolate_from(len, s);
        }
        self.eval_in_range(s)
    }

    fn extrapolate_from(&self, boundary: f64, s: f64) -> CurveSample {
        let at_boundary = self.eval_in_range(boundary);
        let (_, tangent, _) = self.frame_at(boundary);
        let pos = at_boundary.pos + tangent * (s - boundary);
        CurveSample { pos, ..at_boundary }
    }

    /// Tangent, perpendicular and binormal at an in-range arc length.
    fn frame_at(&self, s: f64) -> (Pt3, Pt3, Pt3) {
        let (seg_idx, local) = self.locate(s);
        let segment = &self.segments[seg_idx];
        let (i, frac) = bisect(&segment.lut, local);
        let a = &segment.lut[i];
        let b = &segment.lut[(i + 1).min(segment.lut.len() - 1)];
        let tangent = lerp_pt3(a.tangent, b.tangent, frac).normalized();
        let mut perp = lerp_pt3(a.perp, b.perp, frac);
        perp = (perp - tangent * perp.dot(tangent)).normalized();
        let binormal = tangent.cross(perp);
        (perp, tangent, binormal)
    }

    fn locate(&self, s: f64) -> (usize, f64) {
        let mut idx = self.segments.len() - 1;
        for (i, start) in self.segment_starts.iter().enumerate() {
            let end = start + self.segments[i].length;
            if s <= end || i == self.segments.len() - 1 {
                idx = i;
                break;
            }
            let _ = end;
        }
        let local = (s - self.segment_starts[idx]).clamp(0.0, self.segments[idx].length);
        (idx, local)
    }

    fn eval_in_range(&self, s: f64) -> CurveSample {
        let (seg_idx, local) = self.locate(s);
        let segment = &self.segments[seg_idx];
        let (i, frac) = bisect(&segment.lut, local);
        let a = &segment.lut[i];
        let b = &segment.lut[(i + 1).min(segment.lut.len() - 1)];
        let pos = lerp_pt3(a.pos, b.pos, frac);
        let tangent = lerp_pt3(a.tangent, b.tangent, frac).normalized();
        let mut perp = lerp_pt3(a.perp, b.perp, frac);
        perp = (perp - tangent * perp.dot(tangent)).normalized();
        let binormal = tangent.cross(perp);

        let (rx, ry, mut rz) = euler_from_frame(perp, binormal, tangent);
        if self.total_length > 1.0e-12 {
            rz += self.twist * (s / self.total_length);
        }
        CurveSample { pos, rx, ry, rz }
    }
}

fn lerp_pt3(a: Pt3, b: Pt3, t: f64) -> Pt3 {
    a + (b - a) * t
}

/// Finds the LUT bracket `[i, i+1]` such that `lut[i].arc <= target <=
/// lut[i+1].arc`, and the fractional position within it.
fn bisect(lut: &[LutPoint], target: f64) -> (usize, f64) {
    if lut.len() < 2 {
        return (0, 0.0);
    }
    let mut lo = 0usize;
    let mut hi = lut.len() - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if lut[mid].arc <= target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    let span = lut[hi].arc - lut[lo].arc;
    let frac = if span > 1.0e-12 { (target - lut[lo].arc) / span } else { 0.0 };
    (lo, frac.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_line_curve() -> CurveFn {
        let points = vec![
            ControlPoint { loc: Pt3::new(0.0, 0.0, 0.0), dir: Pt3::new(1.0, 0.0, 0.0), perp: Some(Pt3::new(0.0, 1.0, 0.0)) },
            ControlPoint { loc: Pt3::new(10.0, 0.0, 0.0), dir: Pt3::new(1.0, 0.0, 0.0), perp: None },
        ];
        build(&points, CurveOptions { auto_scale: true, extrapolate: true, scale: 1.0, twist: 0.0 }).unwrap()
    }

    #[test]
    fn length_is_nonnegative_and_reaches_endpoints() {
        let c = straight_line_curve();
        assert!(c.length() > 0.0);
        let start = c.eval(0.0);
        assert!((start.pos.x).abs() < 1.0e-6);
        let end = c.eval(c.length());
        assert!((end.pos.x - 10.0).abs() < 0.5);
    }

    #[test]
    fn midpoint_is_approximately_halfway() {
        let c = straight_line_curve();
        let mid = c.eval(c.length() / 2.0);
        assert!((mid.pos.x - 5.0).abs() < 0.5);
    }

    #[test]
    fn rejects_fewer_than_two_points() {
        let points = vec![ControlPoint { loc: Pt3::ZERO, dir: Pt3::new(1.0, 0.0, 0.0), perp: Some(Pt3::new(0.0, 1.0, 0.0)) }];
        assert!(build(&points, CurveOptions { auto_scale: true, extrapolate: true, scale: 1.0, twist: 0.0 }).is_err());
    }
}
