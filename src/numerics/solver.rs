use super::sor::SorSolver;
use super::{relative_change, Tolerance};
#[allow(unused)]
use crate::numerics::timing::{finalize_and_print, reset_timing};
use crate::numerics::timing::{record_assembly, record_linear_solve};
use crate::physics::assembly::{AssemblyStats, LinearSystem, SystemAssembler};
use nalgebra::DVector;
use std::io::{self, Write};
use thiserror::Error;

#[cfg(feature = "timing")]
use std::time::Instant;

/// Metric the outer loop starts from, so that at least one pass runs.
const INITIAL_METRIC: f64 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    #[error("coefficient matrix is singular")]
    SingularSystem,
}

/// Dense LU solve of `A p = b`. A solution with non-finite entries counts as
/// singular.
pub fn solve_direct(system: &LinearSystem) -> Result<DVector<f64>, SolverError> {
    let solution = system
        .a
        .clone()
        .lu()
        .solve(&system.b)
        .ok_or(SolverError::SingularSystem)?;
    if solution.iter().all(|x| x.is_finite()) {
        Ok(solution)
    } else {
        Err(SolverError::SingularSystem)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    Converged,
    BudgetExhausted,
    /// A pass produced non-finite pressures, even after the SOR fallback.
    /// The field of the previous pass is kept.
    Diverged,
}

pub struct SolverResult {
    pub solution: DVector<f64>,
    pub iterations: u32,
    /// Relative field change of the last pass.
    pub final_metric: f64,
    pub status: SolveStatus,
    /// Passes in which the direct solve failed and SOR was used.
    pub sor_fallbacks: u32,
    /// Residual of the most recent SOR fallback, if any.
    pub last_sor_residual: Option<f64>,
    pub last_assembly: AssemblyStats,
}

/// Outer fixed-point loop: re-assemble with the latest pressures, solve,
/// repeat until the field stops changing.
pub struct PressureSolver {
    pub tolerance: f64,
    pub max_iterations: u32,
    pub fallback: SorSolver,
}

impl Default for PressureSolver {
    fn default() -> Self {
        Self {
            tolerance: 1.0,
            max_iterations: 20,
            fallback: SorSolver::default(),
        }
    }
}

impl PressureSolver {
    /// Never fails: a singular pass falls back to SOR and an exhausted budget
    /// returns the latest field with `SolveStatus::BudgetExhausted`. A pass
    /// that leaves non-finite pressures stops the loop with
    /// `SolveStatus::Diverged`.
    pub fn solve(
        &self,
        assembler: &SystemAssembler,
        initial_field: DVector<f64>,
        logging: bool,
    ) -> SolverResult {
        #[cfg(feature = "timing")]
        {
            reset_timing();
        }

        #[cfg(feature = "timing")]
        let solve_start = Instant::now();

        let lattice = assembler.throats.lattice;
        let tolerance = Tolerance::Absolute(self.tolerance);
        let mut diverged = false;
        let mut field = initial_field;
        let mut metric = INITIAL_METRIC;
        let mut iteration = 0;
        let mut sor_fallbacks = 0;
        let mut last_sor_residual = None;
        let mut last_assembly = AssemblyStats::default();

        if logging {
            println!("{} unknowns \n", field.len());
            println!("  Iter |  Change  | Solver | Degenerate");
        }

        // A NaN metric never meets the tolerance and runs to the budget.
        while !tolerance.is_met(metric) && iteration < self.max_iterations {
            iteration += 1;

            let (system, stats) = record_assembly(|| assembler.assemble(field.as_slice()));

            let (mut next, method) = match record_linear_solve(|| solve_direct(&system)) {
                Ok(p) => (p, "LU"),
                Err(e) => {
                    if logging {
                        eprintln!("Direct solve failed ({e}), falling back to SOR");
                    }
                    sor_fallbacks += 1;
                    let sor = self.fallback.solve(&system, field.clone(), logging);
                    last_sor_residual = Some(sor.residual);
                    (sor.solution, "SOR")
                }
            };

            assembler.bc.pin(&lattice, next.as_mut_slice());
            metric = relative_change(&next, &field);
            last_assembly = stats;

            if next.iter().any(|p| !p.is_finite()) {
                if logging {
                    eprintln!("Iteration {iteration} produced non-finite pressures, stopping");
                }
                diverged = true;
                break;
            }
            field = next;

            log_iteration(
                iteration,
                self.max_iterations,
                metric,
                method,
                last_assembly.degenerate_rows.len(),
                logging,
            );
        }

        #[cfg(feature = "timing")]
        finalize_and_print(solve_start.elapsed());

        let status = if diverged {
            SolveStatus::Diverged
        } else if tolerance.is_met(metric) {
            SolveStatus::Converged
        } else {
            SolveStatus::BudgetExhausted
        };

        SolverResult {
            solution: field,
            iterations: iteration,
            final_metric: metric,
            status,
            sor_fallbacks,
            last_sor_residual,
            last_assembly,
        }
    }
}

fn log_iteration(
    i: u32,
    max_iter: u32,
    metric: f64,
    method: &str,
    degenerate: usize,
    logging: bool,
) {
    if !logging {
        return;
    }
    println!("{i:>3}/{max_iter} | {metric:>8.3e} | {method:>6} | {degenerate:>6}");
    io::stdout().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    #[test]
    fn direct_solve_of_regular_system() {
        let system = LinearSystem {
            a: DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]),
            b: DVector::from_vec(vec![3.0, 5.0]),
        };
        let p = solve_direct(&system).unwrap();
        assert!((p[0] - 0.8).abs() < 1e-12);
        assert!((p[1] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn singular_system_is_reported() {
        let system = LinearSystem {
            a: DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]),
            b: DVector::from_vec(vec![1.0, 1.0]),
        };
        assert_eq!(solve_direct(&system), Err(SolverError::SingularSystem));
    }

    #[test]
    fn non_finite_solution_counts_as_singular() {
        let system = LinearSystem {
            a: DMatrix::from_row_slice(1, 1, &[1.0]),
            b: DVector::from_vec(vec![f64::INFINITY]),
        };
        assert_eq!(solve_direct(&system), Err(SolverError::SingularSystem));
    }

    #[test]
    fn non_finite_pass_stops_the_loop() {
        use crate::discretization::generator::{Throat, ThroatField};
        use crate::discretization::lattice::Lattice;
        use crate::models::pore::params::{BoundaryPressures, FluidProperties};
        use crate::physics::bc::{BoundaryConditions, PeriodicWrap};
        use crate::physics::conductance::{ConductanceModel, FlowRegime};

        // Zero-length throats have infinite conductance.
        let lattice = Lattice::new(3, 2, 2);
        let throats = ThroatField::uniform(
            lattice,
            0.0,
            Throat {
                radius: 10.0,
                length: 0.0,
                weight: 1.0,
            },
        );
        let model = ConductanceModel::new(FluidProperties::default(), FlowRegime::Viscous, 0.0);
        let bc = BoundaryConditions::new(
            BoundaryPressures {
                inflow: 100.0,
                outflow: 0.0,
            },
            PeriodicWrap::OneSided,
        );
        let assembler = SystemAssembler::new(&throats, model, bc, 10.0, 50.0);
        let mut initial = DVector::from_element(lattice.num_sites(), 100.0);
        bc.pin(&lattice, initial.as_mut_slice());

        let result = PressureSolver::default().solve(&assembler, initial.clone(), false);

        assert_eq!(result.status, SolveStatus::Diverged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.sor_fallbacks, 1);
        assert_eq!(result.solution, initial);
    }
}
