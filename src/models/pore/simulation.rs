use super::field::PressureField;
use super::params::{
    BoundaryPressures, FluidProperties, NetworkParams, ParamError, SolverSettings,
};
use crate::discretization::generator::{PoreNetwork, ThroatField};
use crate::numerics::solver::{PressureSolver, SolveStatus};
use crate::numerics::sor::SorSolver;
use crate::physics::assembly::SystemAssembler;
use crate::physics::bc::BoundaryConditions;
use crate::physics::conductance::ConductanceModel;
use crate::processing::permeability::{self, Permeability};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParamError),
    #[error("throat field is {found:?}, expected {expected:?}")]
    LatticeMismatch {
        found: (usize, usize, usize),
        expected: (usize, usize, usize),
    },
}

/// Every input of a run.
#[derive(Debug, Clone, Default)]
pub struct SimulationConfig {
    pub network: NetworkParams,
    pub pressures: BoundaryPressures,
    pub fluid: FluidProperties,
    pub solver: SolverSettings,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ParamError> {
        self.network.validate()?;
        self.pressures.validate()?;
        self.fluid.validate(self.solver.regime)?;
        self.solver.validate()?;
        Ok(())
    }

    pub fn boundary_conditions(&self) -> BoundaryConditions {
        BoundaryConditions::new(self.pressures, self.solver.periodic_wrap)
    }
}

/// Outcome of [`Simulation::run`].
#[derive(Clone, Debug)]
pub struct SimulationReport {
    pub iterations: u32,
    pub final_metric: f64,
    pub status: SolveStatus,
    pub sor_fallbacks: u32,
    pub last_sor_residual: Option<f64>,
    pub degenerate_rows: usize,
    pub unwrapped_couplings: usize,
    pub permeability: Permeability,
}

/// Owns the sampled network and the pressure field for one run.
pub struct Simulation {
    pub config: SimulationConfig,
    pub throats: ThroatField,
    field: PressureField,
    pub logging: bool,
}

impl Simulation {
    /// Validate the configuration and sample the throat network.
    pub fn new(config: SimulationConfig, logging: bool) -> Result<Self, SimulationError> {
        config.validate()?;
        let throats = ThroatField::sample(&config.network)?;
        Self::with_throats(config, throats, logging)
    }

    /// Use an already built throat field instead of sampling one.
    pub fn with_throats(
        config: SimulationConfig,
        throats: ThroatField,
        logging: bool,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let net = &config.network;
        let lat = throats.lattice;
        if (lat.n, lat.m, lat.w) != (net.n, net.m, net.w) {
            return Err(SimulationError::LatticeMismatch {
                found: (lat.n, lat.m, lat.w),
                expected: (net.n, net.m, net.w),
            });
        }

        let field = PressureField::initial(lat, &config.boundary_conditions());
        if logging {
            println!("--- Pore network ---");
            println!("Lattice: {} x {} x {} ({} sites)", lat.n, lat.m, lat.w, lat.num_sites());
            println!("Connectivity cutoff: {:.4}", throats.cutoff);
            println!("--------------------\n");
        }

        Ok(Self {
            config,
            throats,
            field,
            logging,
        })
    }

    pub fn field(&self) -> &PressureField {
        &self.field
    }

    pub fn network(&self) -> PoreNetwork {
        self.throats.network()
    }

    /// Solve for the pressure field and derive the permeability.
    pub fn run(&mut self) -> SimulationReport {
        let cfg = &self.config;
        let settings = cfg.solver;
        let bc = cfg.boundary_conditions();
        let model = ConductanceModel::new(cfg.fluid, settings.regime, self.throats.cutoff);
        let assembler = SystemAssembler::new(
            &self.throats,
            model,
            bc,
            cfg.network.r_avg,
            cfg.network.l_avg,
        );

        let solver = PressureSolver {
            tolerance: settings.tolerance,
            max_iterations: settings.max_outer_iterations,
            fallback: SorSolver {
                omega: settings.sor_omega,
                criterion: settings.tolerance,
                max_steps: settings.sor_max_steps,
            },
        };
        let result = solver.solve(&assembler, self.field.values.clone(), self.logging);
        self.field.values = result.solution;

        let permeability = permeability::extract(
            &self.throats,
            &self.field,
            cfg.fluid.viscosity,
            cfg.network.r_avg,
            cfg.network.l_avg,
            cfg.pressures.pressure_drop(),
        );

        SimulationReport {
            iterations: result.iterations,
            final_metric: result.final_metric,
            status: result.status,
            sor_fallbacks: result.sor_fallbacks,
            last_sor_residual: result.last_sor_residual,
            degenerate_rows: result.last_assembly.degenerate_rows.len(),
            unwrapped_couplings: result.last_assembly.unwrapped_couplings,
            permeability,
        }
    }
}
