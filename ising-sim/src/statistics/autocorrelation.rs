/// Streaming autocorrelation accumulator using a ring buffer.
///
/// Computes the normalized autocorrelation function Γ(δ) of a scalar time
/// series without storing the full history. Memory is O(max_lag).
pub struct AutocorrAccum {
    max_lag: usize,
    /// Ring buffer of the most recent `max_lag` values.
    ring: Vec<f64>,
    sum_o: f64,
    sum_o2: f64,
    /// Running sum of o(t)·o(t−δ), length `max_lag + 1`.
    sum_prod: Vec<f64>,
    n_recorded: usize,
    ring_pos: usize,
}

impl AutocorrAccum {
    pub fn new(max_lag: usize) -> Self {
        let max_lag = max_lag.max(1);
        Self {
            max_lag,
            ring: vec![0.0; max_lag],
            sum_o: 0.0,
            sum_o2: 0.0,
            sum_prod: vec![0.0; max_lag + 1],
            n_recorded: 0,
            ring_pos: 0,
        }
    }

    pub fn push(&mut self, o: f64) {
        let pos = self.ring_pos;
        let ml = self.max_lag;

        self.sum_o += o;
        self.sum_o2 += o * o;
        self.sum_prod[0] += o * o;

        // Lags 1..=n_back look at values pushed before this one.
        let n_back = self.n_recorded.min(ml);
        for delta in 1..=n_back {
            let idx = (pos + ml - delta) % ml;
            self.sum_prod[delta] += o * self.ring[idx];
        }

        self.ring[pos] = o;
        self.n_recorded += 1;
        self.ring_pos = (pos + 1) % ml;
    }

    pub fn len(&self) -> usize {
        self.n_recorded
    }

    pub fn is_empty(&self) -> bool {
        self.n_recorded == 0
    }

    /// Γ(δ) for δ = 0..=max_lag, with Γ(0) = 1. A constant series yields
    /// Γ = [1, 0, 0, ...].
    pub fn finish(&self) -> Vec<f64> {
        let m = self.n_recorded as f64;
        let mean = if self.n_recorded > 0 { self.sum_o / m } else { 0.0 };
        let var = if self.n_recorded > 0 {
            self.sum_o2 / m - mean * mean
        } else {
            0.0
        };
        (0..=self.max_lag)
            .map(|delta| {
                let count = self.n_recorded.saturating_sub(delta) as f64;
                if count <= 0.0 || var <= 1e-12 * mean.abs().max(1.0) {
                    return if delta == 0 { 1.0 } else { 0.0 };
                }
                (self.sum_prod[delta] / count - mean * mean) / var
            })
            .collect()
    }
}

/// Integrated autocorrelation time with Sokal's automatic window
/// (stop at the first W >= 5 τ).
pub fn sokal_tau(gamma: &[f64]) -> f64 {
    let mut tau = 0.5;
    for (w, &g) in gamma.iter().enumerate().skip(1) {
        tau += g;
        if w as f64 >= 5.0 * tau {
            return tau;
        }
    }
    tau
}
