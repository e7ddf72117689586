use super::Tolerance;
use crate::physics::assembly::LinearSystem;
use nalgebra::DVector;
use std::io::{self, Write};

/// Successive over-relaxation, used when the direct solve fails.
pub struct SorSolver {
    pub omega: f64,
    /// Target for `‖A φ − b‖₂`.
    pub criterion: f64,
    pub max_steps: u32,
}

impl Default for SorSolver {
    fn default() -> Self {
        Self {
            omega: 1.5,
            criterion: 1.0,
            max_steps: 100,
        }
    }
}

pub struct SorResult {
    pub solution: DVector<f64>,
    pub steps: u32,
    pub residual: f64,
    pub converged: bool,
}

impl SorSolver {
    /// Sweep rows in order until the residual target or the step budget is
    /// reached. Running out of steps is not an error: the last iterate is
    /// returned with `converged == false`.
    pub fn solve(
        &self,
        system: &LinearSystem,
        initial_guess: DVector<f64>,
        logging: bool,
    ) -> SorResult {
        let a = &system.a;
        let b = &system.b;
        let n = system.dim();
        let tolerance = Tolerance::Absolute(self.criterion);

        let mut phi = initial_guess;
        let mut residual = system.residual_norm(&phi);
        let mut step = 0;

        while !tolerance.is_met(residual) && step < self.max_steps {
            for i in 0..n {
                let mut sigma = 0.0;
                for j in 0..n {
                    if j != i {
                        sigma += a[(i, j)] * phi[j];
                    }
                }
                phi[i] = (1.0 - self.omega) * phi[i] + (self.omega / a[(i, i)]) * (b[i] - sigma);
            }
            residual = system.residual_norm(&phi);
            step += 1;
            log_step(step, residual, logging);
        }

        SorResult {
            solution: phi,
            steps: step,
            residual,
            converged: tolerance.is_met(residual),
        }
    }
}

fn log_step(step: u32, residual: f64, logging: bool) {
    if !logging {
        return;
    }
    println!("Step {step} Residual: {residual:>10.6e}");
    io::stdout().flush().ok();
}
