use super::lattice::SpinSystem;

/// Local interaction energy of site `idx` against its four periodic
/// neighbors: `-s_idx * (s_up + s_down + s_left + s_right)` with `J = 1`.
#[inline]
pub fn site_energy<S: SpinSystem + ?Sized>(system: &S, idx: usize) -> i32 {
    let h: i32 = system
        .neighbors_of(idx)
        .iter()
        .map(|&n| system.spin_at(n) as i32)
        .sum();
    -(system.spin_at(idx) as i32) * h
}

/// Same-shaped grid of per-site energies derived from a spin configuration.
///
/// The field is a projection of the lattice, never authoritative: after a
/// flip it must either be recomputed or patched with
/// [`EnergyField::refresh_site`]. All values are exact integers in
/// `[-4, 4]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnergyField {
    side: usize,
    values: Vec<i32>,
}

impl EnergyField {
    pub fn new<S: SpinSystem + ?Sized>(system: &S) -> Self {
        let mut field = Self {
            side: system.side(),
            values: vec![0; system.n_sites()],
        };
        field.recompute(system);
        field
    }

    /// Recompute every site from scratch.
    pub fn recompute<S: SpinSystem + ?Sized>(&mut self, system: &S) {
        let n_sites = system.n_sites();
        if self.values.len() != n_sites {
            self.side = system.side();
            self.values.resize(n_sites, 0);
        }
        for (idx, v) in self.values.iter_mut().enumerate() {
            *v = site_energy(system, idx);
        }
    }

    /// Patch the field after the spin at `idx` was flipped: the site itself
    /// and its four neighbors are the only entries that change.
    pub fn refresh_site<S: SpinSystem + ?Sized>(&mut self, system: &S, idx: usize) {
        self.values[idx] = site_energy(system, idx);
        for n in system.neighbors_of(idx) {
            self.values[n] = site_energy(system, n);
        }
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn local_energy(&self, i: usize, j: usize) -> i32 {
        self.values[i * self.side + j]
    }

    #[inline]
    pub fn local_energy_at(&self, idx: usize) -> i32 {
        self.values[idx]
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Sum of all local energies. Every bond is counted from both ends.
    pub fn total(&self) -> i64 {
        self.values.iter().map(|&v| v as i64).sum()
    }

    /// Hamiltonian `-sum_<ij> s_i s_j`, each bond counted once.
    pub fn bond_energy(&self) -> i64 {
        self.total() / 2
    }

    pub fn is_consistent_with<S: SpinSystem + ?Sized>(&self, system: &S) -> bool {
        self.values.len() == system.n_sites()
            && self
                .values
                .iter()
                .enumerate()
                .all(|(idx, &v)| v == site_energy(system, idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spins::Lattice;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_aligned_lattice_energy() {
        for size in 1..=6i64 {
            for up in [true, false] {
                let lat = Lattice::aligned(size, up).unwrap();
                let field = EnergyField::new(&lat);
                assert!(field.values().iter().all(|&e| e == -4));
                assert_eq!(field.total(), -4 * size * size);
                assert_eq!(field.bond_energy(), -2 * size * size);
            }
        }
    }

    #[test]
    fn test_edges_and_corners_use_wrapped_neighbors() {
        // Single down spin in the corner of a 4x4 up lattice. Its wrapped
        // neighbors (3,0) and (0,3) must see it too.
        let mut lat = Lattice::create(4).unwrap();
        lat.flip(0, 0);
        let field = EnergyField::new(&lat);

        assert_eq!(field.local_energy(0, 0), 4);
        for (i, j) in [(1, 0), (3, 0), (0, 1), (0, 3)] {
            assert_eq!(field.local_energy(i, j), -2, "site ({i}, {j})");
        }
        assert_eq!(field.local_energy(2, 2), -4);
        assert_eq!(field.local_energy(3, 3), -4);
        assert_eq!(field.total(), -4 * 16 + 16);
    }

    #[test]
    fn test_all_two_by_two_configurations() {
        // On a 2x2 torus the up/down neighbors are the same site, as are
        // left/right, so E(i,j) = -2 s(i,j) (s(i+1,j) + s(i,j+1)).
        for mask in 0u8..16 {
            let spins: Vec<i8> = (0..4)
                .map(|b| if mask & (1 << b) != 0 { -1 } else { 1 })
                .collect();
            let lat = Lattice::from_spins(2, spins.clone()).unwrap();
            let field = EnergyField::new(&lat);

            let s = |i: usize, j: usize| spins[(i % 2) * 2 + (j % 2)] as i32;
            for i in 0..2 {
                for j in 0..2 {
                    let expected = -2 * s(i, j) * (s(i + 1, j) + s(i, j + 1));
                    assert_eq!(field.local_energy(i, j), expected, "mask {mask:04b}");
                }
            }
        }
    }

    #[test]
    fn test_two_by_two_named_configurations() {
        let total = |spins: Vec<i8>| EnergyField::new(&Lattice::from_spins(2, spins).unwrap());

        let checkerboard = total(vec![1, -1, -1, 1]);
        assert_eq!(checkerboard.values(), &[4, 4, 4, 4]);
        assert_eq!(checkerboard.total(), 16);

        let stripes = total(vec![1, 1, -1, -1]);
        assert_eq!(stripes.values(), &[0, 0, 0, 0]);

        let one_down = total(vec![-1, 1, 1, 1]);
        assert_eq!(one_down.values(), &[4, 0, 0, -4]);
        assert_eq!(one_down.total(), 0);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let lat = Lattice::randomized(9, &mut rng).unwrap();
        let mut field = EnergyField::new(&lat);
        let first = field.clone();
        field.recompute(&lat);
        assert_eq!(field, first);
        field.recompute(&lat);
        assert_eq!(field, first);
    }

    #[test]
    fn test_refresh_site_matches_recompute() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let mut lat = Lattice::randomized(7, &mut rng).unwrap();
        let mut field = EnergyField::new(&lat);

        for idx in [0, 6, 24, 42, 48, 13] {
            lat.flip_at(idx);
            field.refresh_site(&lat, idx);
            assert!(field.is_consistent_with(&lat));
        }
        assert_eq!(field, EnergyField::new(&lat));
    }

    #[test]
    fn test_stale_field_is_detected() {
        let mut lat = Lattice::create(3).unwrap();
        let field = EnergyField::new(&lat);
        lat.flip(1, 1);
        assert!(!field.is_consistent_with(&lat));
    }
}
