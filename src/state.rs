//! Corrector state carried between samples.

/// Algorithm constants and the per-sample bookkeeping.
///
/// `coeff_a`, `coeff_b` and `algo_bias` are fixed at init and not yet used by
/// the formula. `not_good_cnt` is reset on every correction and
/// `prev_light_corrected` records the last output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectorState {
    /// Fixed algorithm constant (1.43).
    pub coeff_a: f32,
    /// Fixed algorithm constant (2.0).
    pub coeff_b: f32,
    /// Fixed algorithm bias (0.0).
    pub algo_bias: f32,
    /// Count of consecutive unstable samples.
    pub not_good_cnt: u32,
    /// The last corrected reading.
    pub prev_light_corrected: f32,
}

impl CorrectorState {
    /// The state right after init.
    pub fn new() -> Self {
        Self {
            coeff_a: 1.43,
            coeff_b: 2.0,
            algo_bias: 0.0,
            not_good_cnt: 0,
            prev_light_corrected: 0.0,
        }
    }

    pub(crate) fn record(&mut self, corrected: f32) {
        self.not_good_cnt = 0;
        self.prev_light_corrected = corrected;
    }
}

impl Default for CorrectorState {
    fn default() -> Self {
        Self::new()
    }
}
