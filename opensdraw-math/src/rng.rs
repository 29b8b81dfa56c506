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

//! Mersenne Twister (MT19937) random number generator.
//!
//! A straightforward Rust port of the classic `mtwister` reference
//! implementation, the same one the original lcad interpreter's random
//! number functions sit on top of via Python's `random` module.

const STATE_VECTOR_LENGTH: usize = 624;
const STATE_VECTOR_M: usize = 397;

const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;
const TEMPERING_MASK_B: u32 = 0x9d2c_5680;
const TEMPERING_MASK_C: u32 = 0xefc6_0000;

#[derive(Clone)]
pub struct MersenneTwister {
    buffer: Vec<u32>,
    index: usize,
}

impl MersenneTwister {
    pub fn new() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u32) -> Self {
        let mut buffer = vec![0u32; STATE_VECTOR_LENGTH];
        buffer[0] = seed;
        for i in 1..STATE_VECTOR_LENGTH {
            buffer[i] = (6069u64 * buffer[i - 1] as u64 & 0xffff_ffff) as u32;
        }
        MersenneTwister { buffer, index: 1 }
    }

    fn next_u32(&mut self) -> u32 {
        let mag: [u32; 2] = [0x0, 0x9908_b0df];

        if self.index >= STATE_VECTOR_LENGTH {
            let mut kk = 0;
            while kk < STATE_VECTOR_LENGTH - STATE_VECTOR_M {
                let y = (self.buffer[kk] & UPPER_MASK) | (self.buffer[kk + 1] & LOWER_MASK);
                self.buffer[kk] = self.buffer[kk + STATE_VECTOR_M] ^ (y >> 1) ^ mag[(y & 0x1) as usize];
                kk += 1;
            }
            while kk < STATE_VECTOR_LENGTH - 1 {
                let y = (self.buffer[kk] & UPPER_MASK) | (self.buffer[kk + 1] & LOWER_MASK);
                let src = kk + STATE_VECTOR_M - STATE_VECTOR_LENGTH;
                self.buffer[kk] = self.buffer[src] ^ (y >> 1) ^ mag[(y & 0x1) as usize];
                kk += 1;
            }
            let y = (self.buffer[STATE_VECTOR_LENGTH - 1] & UPPER_MASK) | (self.buffer[0] & LOWER_MASK);
            self.buffer[STATE_VECTOR_LENGTH - 1] =
                self.buffer[STATE_VECTOR_M - 1] ^ (y >> 1) ^ mag[(y & 0x1) as usize];
            self.index = 0;
        }

        let mut y = self.buffer[self.index];
        self.index += 1;
        y ^= y >> 11;
        y ^= (y << 7) & TEMPERING_MASK_B;
        y ^= (y << 15) & TEMPERING_MASK_C;
        y ^= y >> 18;
        y
    }

    /// A uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let mut u = self.next_u32();
        if u == u32::MAX {
            u -= 1;
        }
        u as f64 / u32::MAX as f64
    }

    /// A uniform float in `[min, max)`.
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_f64()
    }
}

impl Default for MersenneTwister {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_is_deterministic() {
        let mut a = MersenneTwister::with_seed(42);
        let mut b = MersenneTwister::with_seed(42);
        for _ in 0..10 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn range_f64_stays_in_bounds() {
        let mut rng = MersenneTwister::with_seed(1);
        for _ in 0..1000 {
            let v = rng.range_f64(2.0, 5.0);
            assert!((2.0..5.0).contains(&v));
        }
    }
}
