/// Exact critical temperature of the square-lattice Ising model with
/// `J = k_B = 1`: `T_c = 2 / ln(1 + sqrt(2))`.
pub const CRITICAL_TEMPERATURE: f64 = 2.269_185_314_213_022;

/// Onsager–Yang spontaneous magnetization per spin of the infinite lattice,
/// `(1 - sinh(2/T)^-4)^(1/8)` below `T_c` and 0 at or above it.
///
/// Non-positive temperatures return the `T -> 0+` limit, 1.
pub fn onsager_magnetization(temperature: f64) -> f64 {
    if temperature <= 0.0 {
        return 1.0;
    }
    if temperature >= CRITICAL_TEMPERATURE {
        return 0.0;
    }
    let s = (2.0 / temperature).sinh();
    (1.0 - s.powi(-4)).max(0.0).powf(0.125)
}
