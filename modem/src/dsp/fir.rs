//! q15 polyphase interpolating FIR filter.
//!
//! Upsamples by an integer factor L while pulse shaping: each input sample
//! produces L output samples, one per polyphase branch. The delay line is
//! owned state carried across calls, so a burst may be filtered in arbitrary
//! block sizes without seams. Accumulation is wide with a single >>15
//! rescale and saturation, matching q15 filter arithmetic.

/// Polyphase interpolating FIR over q15 samples.
pub struct FirInterpolator {
    factor: usize,
    coeffs: &'static [i16],
    /// Delay line, newest sample first. Length = coeffs.len() / factor.
    state: Vec<i16>,
}

impl FirInterpolator {
    /// Build an interpolator with upsample `factor` and a coefficient table
    /// whose length is a multiple of `factor`.
    pub fn new(factor: usize, coeffs: &'static [i16]) -> Self {
        assert!(factor > 0);
        assert!(!coeffs.is_empty() && coeffs.len() % factor == 0);
        Self {
            factor,
            coeffs,
            state: vec![0; coeffs.len() / factor],
        }
    }

    /// Upsample factor L.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Filter `input`, writing `input.len() * L` samples to `output`.
    pub fn process(&mut self, input: &[i16], output: &mut [i16]) {
        assert_eq!(output.len(), input.len() * self.factor);

        for (n, &sample) in input.iter().enumerate() {
            self.state.rotate_right(1);
            self.state[0] = sample;

            for phase in 0..self.factor {
                let mut acc: i64 = 0;
                for (k, &x) in self.state.iter().enumerate() {
                    acc += x as i64 * self.coeffs[phase + k * self.factor] as i64;
                }
                output[n * self.factor + phase] = saturate_q15(acc >> 15);
            }
        }
    }

    /// Zero the delay line.
    pub fn reset(&mut self) {
        self.state.fill(0);
    }
}

#[inline]
fn saturate_q15(value: i64) -> i16 {
    value.clamp(i16::MIN as i64, i16::MAX as i64) as i16
}
