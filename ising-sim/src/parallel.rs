use rayon::prelude::*;

/// Map `body` over temperatures, optionally in parallel.
///
/// The closure receives `(index, temperature)` and must own everything it
/// mutates (lattice, field, RNG), so no state is shared between tasks.
/// Results come back in input order either way.
///
/// When `sequential` is true the temperatures are processed on the current
/// thread (no rayon overhead, best when an outer level of parallelism
/// already saturates all cores).
pub fn par_over_temperatures<T, F>(temperatures: &[f64], sequential: bool, body: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, f64) -> T + Send + Sync,
{
    if sequential {
        temperatures
            .iter()
            .copied()
            .enumerate()
            .map(|(idx, temp)| body(idx, temp))
            .collect()
    } else {
        temperatures
            .par_iter()
            .copied()
            .enumerate()
            .map(|(idx, temp)| body(idx, temp))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_preserved() {
        let temps: Vec<f64> = (0..64).map(|k| k as f64 * 0.5).collect();
        for sequential in [true, false] {
            let out = par_over_temperatures(&temps, sequential, |i, t| (i, t * 2.0));
            for (k, &(i, t)) in out.iter().enumerate() {
                assert_eq!(i, k);
                assert_eq!(t, temps[k] * 2.0);
            }
        }
    }
}
