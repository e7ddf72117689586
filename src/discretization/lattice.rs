use glam::IVec3;

/// The 26 non-zero offsets of the 3×3×3 stencil.
///
/// Each axis is traversed in the order `[0, 1, -1]`. Assembly assigns matrix
/// entries in this order, so when two offsets land on the same neighbour the
/// last one wins.
pub const STENCIL: [IVec3; 26] = build_stencil();

const AXIS_ORDER: [i32; 3] = [0, 1, -1];

const fn build_stencil() -> [IVec3; 26] {
    let mut out = [IVec3::ZERO; 26];
    let mut n = 0;
    let mut a = 0;
    while a < 3 {
        let mut b = 0;
        while b < 3 {
            let mut c = 0;
            while c < 3 {
                let (dx, dy, dz) = (AXIS_ORDER[a], AXIS_ORDER[b], AXIS_ORDER[c]);
                if dx != 0 || dy != 0 || dz != 0 {
                    out[n] = IVec3::new(dx, dy, dz);
                    n += 1;
                }
                c += 1;
            }
            b += 1;
        }
        a += 1;
    }
    out
}

/// Bucket of an offset in the per-site 27-entry property table.
#[inline]
pub fn offset_bucket(offset: IVec3) -> usize {
    ((offset.x + 1) * 9 + (offset.y + 1) * 3 + (offset.z + 1)) as usize
}

/// Euclidean length of a stencil offset: 1, √2 or √3.
#[inline]
pub fn offset_distance(offset: IVec3) -> f64 {
    (offset.length_squared() as f64).sqrt()
}

/// An `n × m × w` lattice of pore sites.
///
/// `i` runs along the flow direction (inflow face at `i = 0`, outflow face at
/// `i = n - 1`); `j` and `k` span the periodic lateral faces. This is the only
/// place where a coordinate is turned into a flat equation index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lattice {
    pub n: usize,
    pub m: usize,
    pub w: usize,
}

impl Lattice {
    pub fn new(n: usize, m: usize, w: usize) -> Self {
        Self { n, m, w }
    }

    /// Number of sites, which is also the number of unknowns.
    pub fn num_sites(&self) -> usize {
        self.n * self.m * self.w
    }

    #[inline]
    pub fn linear_index(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(i < self.n && j < self.m && k < self.w);
        i * (self.m * self.w) + j * self.w + k
    }

    #[inline]
    pub fn lattice_coord(&self, idx: usize) -> (usize, usize, usize) {
        let k = idx % self.w;
        let rest = idx / self.w;
        let j = rest % self.m;
        let i = rest / self.m;
        (i, j, k)
    }

    /// Bounds check on signed coordinates, so stencil neighbours can be
    /// tested before they are converted.
    #[inline]
    pub fn is_valid(&self, i: i64, j: i64, k: i64) -> bool {
        i >= 0
            && j >= 0
            && k >= 0
            && (i as usize) < self.n
            && (j as usize) < self.m
            && (k as usize) < self.w
    }

    #[inline]
    pub fn contains(&self, p: IVec3) -> bool {
        self.is_valid(p.x as i64, p.y as i64, p.z as i64)
    }

    /// Flat index of a lattice point, or `None` if it lies outside.
    #[inline]
    pub fn index_of(&self, p: IVec3) -> Option<usize> {
        self.contains(p)
            .then(|| self.linear_index(p.x as usize, p.y as usize, p.z as usize))
    }

    #[inline]
    pub fn point(&self, idx: usize) -> IVec3 {
        let (i, j, k) = self.lattice_coord(idx);
        IVec3::new(i as i32, j as i32, k as i32)
    }

    #[inline]
    pub fn is_inflow(&self, i: usize) -> bool {
        i == 0
    }

    #[inline]
    pub fn is_outflow(&self, i: usize) -> bool {
        i + 1 == self.n
    }

    /// Sites on the inflow or outflow face carry Dirichlet pressures.
    #[inline]
    pub fn is_boundary_site(&self, idx: usize) -> bool {
        let (i, _, _) = self.lattice_coord(idx);
        self.is_inflow(i) || self.is_outflow(i)
    }

    /// Indices of all sites of the layer `i`, in flat order.
    pub fn layer(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        let start = i * self.m * self.w;
        start..start + self.m * self.w
    }
}
