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

//! Vector/matrix primitives and degree-based trigonometry for opensdraw.
//!
//! LDraw and the lcad DSL both work in degrees, not radians, so the trig
//! helpers here convert at the boundary rather than scattering
//! `.to_radians()` calls through the evaluator.

mod mt4;
mod pt3;
mod rng;

pub use mt4::Mt4;
pub use pt3::Pt3;
pub use rng::MersenneTwister;

/// Two floats are equal within a small absolute tolerance.
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1.0e-6
}

pub fn dsin(degrees: f64) -> f64 {
    degrees.to_radians().sin()
}

pub fn dcos(degrees: f64) -> f64 {
    degrees.to_radians().cos()
}

pub fn dtan(degrees: f64) -> f64 {
    degrees.to_radians().tan()
}

pub fn dasin(x: f64) -> f64 {
    x.asin().to_degrees()
}

pub fn dacos(x: f64) -> f64 {
    x.acos().to_degrees()
}

pub fn datan2(y: f64, x: f64) -> f64 {
    y.atan2(x).to_degrees()
}
