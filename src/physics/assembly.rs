use crate::discretization::generator::{Throat, ThroatField};
use crate::discretization::lattice::{Lattice, STENCIL};
use crate::physics::bc::BoundaryConditions;
use crate::physics::conductance::ConductanceModel;
use nalgebra::{DMatrix, DVector};

/// Dense system `A p = b` over one unknown pressure per site.
#[derive(Clone, Debug)]
pub struct LinearSystem {
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
}

impl LinearSystem {
    pub fn zeros(n: usize) -> Self {
        Self {
            a: DMatrix::zeros(n, n),
            b: DVector::zeros(n),
        }
    }

    pub fn dim(&self) -> usize {
        self.b.len()
    }

    /// `‖A x − b‖₂`.
    pub fn residual_norm(&self, x: &DVector<f64>) -> f64 {
        (&self.a * x - &self.b).norm()
    }
}

/// Bookkeeping of one assembly pass.
#[derive(Clone, Debug, Default)]
pub struct AssemblyStats {
    /// Rows replaced by an identity equation because they were all zero.
    pub degenerate_rows: Vec<usize>,
    /// Couplings through a lateral face that used the fixed periodic throat.
    pub periodic_couplings: usize,
    /// Lateral neighbours the wrap policy left outside the lattice.
    pub unwrapped_couplings: usize,
}

/// True if every entry of row `i` is exactly zero.
pub fn is_degenerate_row(a: &DMatrix<f64>, i: usize) -> bool {
    a.row(i).iter().all(|&v| v == 0.0)
}

/// Replace all-zero rows by `p_i = 0` so the system stays regular.
/// Returns the repaired row indices.
pub fn repair_degenerate_rows(system: &mut LinearSystem) -> Vec<usize> {
    let mut repaired = Vec::new();
    for i in 0..system.dim() {
        if is_degenerate_row(&system.a, i) {
            system.a[(i, i)] = 1.0;
            system.b[i] = 0.0;
            repaired.push(i);
        }
    }
    repaired
}

/// Builds the conservation system for the current pressure field.
pub struct SystemAssembler<'a> {
    pub throats: &'a ThroatField,
    pub model: ConductanceModel,
    pub bc: BoundaryConditions,
    /// Geometry of every throat that crosses a periodic face. Always open.
    pub periodic_throat: Throat,
}

impl<'a> SystemAssembler<'a> {
    pub fn new(
        throats: &'a ThroatField,
        model: ConductanceModel,
        bc: BoundaryConditions,
        r_avg: f64,
        l_avg: f64,
    ) -> Self {
        Self {
            throats,
            model,
            bc,
            periodic_throat: Throat {
                radius: r_avg,
                length: l_avg,
                weight: 1.0,
            },
        }
    }

    fn lattice(&self) -> &Lattice {
        &self.throats.lattice
    }

    /// Assemble `A` and `b` from scratch, then repair degenerate rows.
    pub fn assemble(&self, field: &[f64]) -> (LinearSystem, AssemblyStats) {
        let lattice = *self.lattice();
        let mut system = LinearSystem::zeros(lattice.num_sites());
        let mut stats = AssemblyStats::default();

        for site in 0..lattice.num_sites() {
            match self.bc.pinned(&lattice, site) {
                Some(pressure) => {
                    system.a[(site, site)] = 1.0;
                    system.b[site] = pressure;
                }
                None => self.fill_interior_row(&mut system.a, site, field, &mut stats),
            }
        }

        self.renormalize_diagonals(&mut system.a);
        stats.degenerate_rows = repair_degenerate_rows(&mut system);
        (system, stats)
    }

    fn fill_interior_row(
        &self,
        a: &mut DMatrix<f64>,
        site: usize,
        field: &[f64],
        stats: &mut AssemblyStats,
    ) {
        let lattice = self.lattice();
        let p = lattice.point(site);

        for offset in STENCIL {
            let q = p + offset;
            let (nb, throat) = match lattice.index_of(q) {
                Some(nb) => (nb, self.throats.scaled_between(site, nb)),
                None => match self.bc.wrap.wrap(lattice, q).and_then(|w| lattice.index_of(w)) {
                    Some(nb) => {
                        stats.periodic_couplings += 1;
                        (nb, self.periodic_throat)
                    }
                    None => {
                        stats.unwrapped_couplings += 1;
                        continue;
                    }
                },
            };
            // A 1-wide lateral axis wraps onto the site itself.
            if nb == site {
                continue;
            }
            let p_avg = 0.5 * (field[site] + field[nb]);
            a[(site, nb)] = -self.model.conductance(&throat, p_avg);
        }
    }

    /// Set the diagonal of every interior row to minus the sum of its
    /// off-diagonal entries, so each conservation row sums to zero.
    fn renormalize_diagonals(&self, a: &mut DMatrix<f64>) {
        let lattice = self.lattice();
        for i in 0..a.nrows() {
            if lattice.is_boundary_site(i) {
                continue;
            }
            a[(i, i)] = 0.0;
            let off_diagonal: f64 = a.row(i).sum();
            a[(i, i)] = -off_diagonal;
        }
    }
}
