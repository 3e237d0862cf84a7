use super::autocorrelation::{sokal_tau, AutocorrAccum};
use super::onsager::onsager_magnetization;
use crate::simulation::MagnetizationSeries;

/// Running sum of `value^power` over a stream.
#[derive(Debug, Clone)]
pub struct Statistics {
    pub count: usize,
    pub aggregate: f64,
    pub power: i32,
}

impl Statistics {
    pub fn new(power: i32) -> Self {
        Self {
            count: 0,
            aggregate: 0.0,
            power,
        }
    }

    pub fn update(&mut self, value: f64) {
        self.count += 1;
        self.aggregate += if self.power == 1 {
            value
        } else {
            value.powi(self.power)
        };
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.aggregate / self.count as f64
    }
}

/// `U = 1 - <M^4> / (3 <M^2>^2)`; 0 when `<M^2>` vanishes.
pub fn binder_cumulant(m2: f64, m4: f64) -> f64 {
    if m2 <= 0.0 {
        return 0.0;
    }
    1.0 - m4 / (3.0 * m2 * m2)
}

/// Post-hoc observables of one temperature's magnetization series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSummary {
    pub temperature: f64,
    pub n_samples: usize,
    /// ⟨M⟩ / N.
    pub mean_magnetization: f64,
    /// ⟨|M|⟩ / N.
    pub mean_abs_magnetization: f64,
    /// Standard deviation (ddof = 0) of |M| / N.
    pub std_abs_magnetization: f64,
    /// ⟨M²⟩ of the total magnetization.
    pub m2: f64,
    /// ⟨M⁴⟩ of the total magnetization.
    pub m4: f64,
    pub binder_cumulant: f64,
    /// Integrated autocorrelation time of |M|, in samples.
    pub tau_int: f64,
    /// Infinite-lattice reference value at this temperature.
    pub onsager: f64,
}

impl SeriesSummary {
    /// Summarize `series` for a lattice of `n_spins` sites. `None` for an
    /// empty series.
    pub fn from_series(series: &MagnetizationSeries, n_spins: usize) -> Option<Self> {
        if series.is_empty() || n_spins == 0 {
            return None;
        }
        let n = n_spins as f64;

        let mut m1 = Statistics::new(1);
        let mut abs1 = Statistics::new(1);
        let mut abs2 = Statistics::new(2);
        let mut m2 = Statistics::new(2);
        let mut m4 = Statistics::new(4);
        let mut autocorr = AutocorrAccum::new((series.len() / 4).clamp(1, 1000));

        for &m in &series.values {
            let m = m as f64;
            m1.update(m);
            abs1.update(m.abs());
            abs2.update(m.abs());
            m2.update(m);
            m4.update(m);
            autocorr.push(m.abs());
        }

        let mean_abs = abs1.average();
        let var_abs = (abs2.average() - mean_abs * mean_abs).max(0.0);

        Some(Self {
            temperature: series.temperature,
            n_samples: series.len(),
            mean_magnetization: m1.average() / n,
            mean_abs_magnetization: mean_abs / n,
            std_abs_magnetization: var_abs.sqrt() / n,
            m2: m2.average(),
            m4: m4.average(),
            binder_cumulant: binder_cumulant(m2.average(), m4.average()),
            tau_int: sokal_tau(&autocorr.finish()),
            onsager: onsager_magnetization(series.temperature),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(temperature: f64, values: Vec<i64>) -> MagnetizationSeries {
        MagnetizationSeries {
            temperature,
            values,
        }
    }

    #[test]
    fn test_ordered_series() {
        let s = SeriesSummary::from_series(&series(1.0, vec![16, -16, 16, 16]), 16).unwrap();
        assert_eq!(s.n_samples, 4);
        assert_eq!(s.mean_abs_magnetization, 1.0);
        assert_eq!(s.std_abs_magnetization, 0.0);
        assert_eq!(s.mean_magnetization, 0.5);
        assert!((s.binder_cumulant - 2.0 / 3.0).abs() < 1e-12);
        assert!(s.onsager > 0.99);
    }

    #[test]
    fn test_disordered_series() {
        let s = SeriesSummary::from_series(&series(3.0, vec![0, 0, 0]), 16).unwrap();
        assert_eq!(s.mean_abs_magnetization, 0.0);
        assert_eq!(s.binder_cumulant, 0.0);
        assert_eq!(s.onsager, 0.0);
    }

    #[test]
    fn test_std_uses_population_convention() {
        // |M| = 2, 6 -> mean 4, std 2 (ddof = 0), per spin / 4
        let s = SeriesSummary::from_series(&series(2.0, vec![-2, 6]), 4).unwrap();
        assert_eq!(s.mean_abs_magnetization, 1.0);
        assert!((s.std_abs_magnetization - 0.5).abs() < 1e-12);
        assert_eq!(s.m2, 20.0);
        assert_eq!(s.m4, (16.0 + 1296.0) / 2.0);
    }

    #[test]
    fn test_empty_series_has_no_summary() {
        assert!(SeriesSummary::from_series(&series(1.0, vec![]), 16).is_none());
    }

    #[test]
    fn test_statistics_accumulator() {
        let mut st = Statistics::new(2);
        assert_eq!(st.average(), 0.0);
        for v in [1.0, 2.0, 3.0] {
            st.update(v);
        }
        assert!((st.average() - 14.0 / 3.0).abs() < 1e-12);
    }
}
