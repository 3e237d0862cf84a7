use super::offsets::Direction;

/// Largest side length whose flat site indices fit the `u32` neighbor table.
pub const MAX_SIDE: usize = 1 << 16;

/// Periodic `side x side` square lattice with precomputed neighbor table.
///
/// Sites are indexed in row-major order, `(i, j) -> i * side + j`. Every
/// neighbor, including those of edge and corner sites, is obtained from the
/// same wrap rule (`rem_euclid`), so the topology is a discrete torus with no
/// special-cased boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Torus {
    /// Number of sites along each axis.
    pub side: usize,
    /// Total number of sites (`side * side`).
    pub n_sites: usize,
    /// Layout: `neighbors[i * 4 + dir as usize]`.
    neighbors: Vec<u32>,
}

impl Torus {
    pub fn new(side: usize) -> Self {
        assert!(side <= MAX_SIDE, "side {side} exceeds MAX_SIDE");
        let n_sites = side * side;
        let mut neighbors = vec![0u32; n_sites * 4];

        for idx in 0..n_sites {
            let (row, col) = (idx / side, idx % side);
            for dir in Direction::ALL {
                let (d_row, d_col) = dir.offset();
                let r = (row as isize + d_row).rem_euclid(side as isize) as usize;
                let c = (col as isize + d_col).rem_euclid(side as isize) as usize;
                neighbors[idx * 4 + dir as usize] = (r * side + c) as u32;
            }
        }

        Self {
            side,
            n_sites,
            neighbors,
        }
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.side && j < self.side, "site ({i}, {j}) out of range");
        i * self.side + j
    }

    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        (idx / self.side, idx % self.side)
    }

    /// Flat index of the neighbor of `idx` in direction `dir`.
    #[inline]
    pub fn neighbor(&self, idx: usize, dir: Direction) -> usize {
        self.neighbors[idx * 4 + dir as usize] as usize
    }

    /// Flat indices of the four neighbors, ordered as [`Direction::ALL`].
    #[inline]
    pub fn neighbors_flat(&self, idx: usize) -> [usize; 4] {
        let base = idx * 4;
        [
            self.neighbors[base] as usize,
            self.neighbors[base + 1] as usize,
            self.neighbors[base + 2] as usize,
            self.neighbors[base + 3] as usize,
        ]
    }

    /// Coordinates of the four periodic neighbors of `(i, j)`, ordered
    /// up, down, left, right.
    pub fn neighbors(&self, i: usize, j: usize) -> [(usize, usize); 4] {
        self.neighbors_flat(self.index(i, j)).map(|n| self.coords(n))
    }
}
