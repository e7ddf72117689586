use crate::discretization::lattice::Lattice;
use crate::models::pore::params::BoundaryPressures;
use glam::IVec3;

/// How a stencil neighbour that leaves the lattice through a lateral face
/// (`j` or `k`) is mapped back inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PeriodicWrap {
    /// `-1` wraps to `extent - 1`; every other coordinate is kept, so a
    /// high-side overflow stays outside and the coupling is dropped.
    #[default]
    OneSided,
    /// Both faces wrap (`-1 -> extent - 1`, `extent -> 0`).
    Modular,
    /// Reference arithmetic: each lateral coordinate becomes `extent - 1`
    /// if it was `-1` and `0` otherwise, including coordinates that were in
    /// range.
    Legacy,
}

impl PeriodicWrap {
    fn wrap_axis(self, c: i32, extent: usize) -> i32 {
        let last = extent as i32 - 1;
        match self {
            PeriodicWrap::OneSided => {
                if c == -1 {
                    last
                } else {
                    c
                }
            }
            PeriodicWrap::Modular => c.rem_euclid(extent as i32),
            PeriodicWrap::Legacy => {
                if c == -1 {
                    last
                } else {
                    0
                }
            }
        }
    }

    /// Map an out-of-bounds neighbour back onto the lattice.
    ///
    /// Returns `None` if the point is still outside after wrapping, which
    /// happens for the flow axis and for `OneSided` high-side overflow.
    pub fn wrap(self, lattice: &Lattice, p: IVec3) -> Option<IVec3> {
        let wrapped = IVec3::new(
            p.x,
            self.wrap_axis(p.y, lattice.m),
            self.wrap_axis(p.z, lattice.w),
        );
        lattice.contains(wrapped).then_some(wrapped)
    }
}

/// Dirichlet pins on the flow faces plus the lateral wrap policy.
#[derive(Clone, Copy, Debug)]
pub struct BoundaryConditions {
    pub pressures: BoundaryPressures,
    pub wrap: PeriodicWrap,
}

impl BoundaryConditions {
    pub fn new(pressures: BoundaryPressures, wrap: PeriodicWrap) -> Self {
        Self { pressures, wrap }
    }

    /// Pinned pressure of a site, `None` for interior sites.
    #[inline]
    pub fn pinned(&self, lattice: &Lattice, idx: usize) -> Option<f64> {
        let (i, _, _) = lattice.lattice_coord(idx);
        if lattice.is_inflow(i) {
            Some(self.pressures.inflow)
        } else if lattice.is_outflow(i) {
            Some(self.pressures.outflow)
        } else {
            None
        }
    }

    /// Overwrite the flow faces of `field` with their pinned values.
    pub fn pin(&self, lattice: &Lattice, field: &mut [f64]) {
        for idx in lattice.layer(0) {
            field[idx] = self.pressures.inflow;
        }
        for idx in lattice.layer(lattice.n - 1) {
            field[idx] = self.pressures.outflow;
        }
    }
}
