use crate::physics::bc::PeriodicWrap;
use crate::physics::conductance::FlowRegime;
use thiserror::Error;

/// Maximum coordination number of the 26-neighbour stencil.
pub const MAX_COORDINATION: f64 = 26.0;

const KELVIN_OFFSET: f64 = 273.15;

#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("lattice extents must be positive, got {n}x{m}x{w}")]
    EmptyLattice { n: usize, m: usize, w: usize },
    #[error("need at least an inflow and an outflow layer, got n = {0}")]
    TooFewLayers(usize),
    #[error("average coordination number must lie in [0, 26], got {0}")]
    CoordinationOutOfRange(f64),
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must be non-negative and finite, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("inflow and outflow pressure are equal ({0} Pa), permeability is undefined")]
    NoPressureDrop(f64),
    #[error("SOR relaxation factor must lie in (0, 2), got {0}")]
    RelaxationOutOfRange(f64),
    #[error("the outer loop needs at least one iteration")]
    NoIterations,
}

/// Lattice extents and the distributions throat geometry is sampled from.
/// Lengths are in microns.
#[derive(Debug, Clone)]
pub struct NetworkParams {
    pub n: usize,
    pub m: usize,
    pub w: usize,
    pub z_avg: f64,    // Target average coordination number (0..=26)
    pub r_avg: f64,    // Mean throat radius [micron]
    pub r_stdv: f64,   // Radius standard deviation [micron]
    pub l_avg: f64,    // Mean throat length [micron]
    pub l_stdv: f64,   // Length standard deviation [micron]
    pub seed: u64,
    /// Clamp negative sampled radii to zero and lengths to a tiny positive
    /// value. Off by default: the normal distribution is used as drawn.
    pub clamp_negative_geometry: bool,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            n: 6,
            m: 4,
            w: 4,
            z_avg: 6.0,
            r_avg: 10.0,
            r_stdv: 2.0,
            l_avg: 50.0,
            l_stdv: 5.0,
            seed: 0,
            clamp_negative_geometry: false,
        }
    }
}

impl NetworkParams {
    /// Connectivity threshold: a throat exists iff its weight exceeds this.
    pub fn cutoff(&self) -> f64 {
        cutoff(self.z_avg)
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        let (n, m, w) = (self.n, self.m, self.w);
        if n == 0 || m == 0 || w == 0 {
            return Err(ParamError::EmptyLattice { n, m, w });
        }
        if n < 2 {
            return Err(ParamError::TooFewLayers(n));
        }
        if !(0.0..=MAX_COORDINATION).contains(&self.z_avg) {
            return Err(ParamError::CoordinationOutOfRange(self.z_avg));
        }
        positive("R_avg", self.r_avg)?;
        positive("L_avg", self.l_avg)?;
        non_negative("R_stdv", self.r_stdv)?;
        non_negative("L_stdv", self.l_stdv)?;
        Ok(())
    }
}

/// `1 - Z_avg / 26`. Not clamped; callers validate `z_avg` first.
pub fn cutoff(z_avg: f64) -> f64 {
    1.0 - z_avg / MAX_COORDINATION
}

/// Dirichlet pressures on the inflow (`i = 0`) and outflow (`i = n-1`) faces [Pa].
#[derive(Debug, Clone, Copy)]
pub struct BoundaryPressures {
    pub inflow: f64,
    pub outflow: f64,
}

impl Default for BoundaryPressures {
    fn default() -> Self {
        Self {
            inflow: 200_000.0,
            outflow: 100_000.0,
        }
    }
}

impl BoundaryPressures {
    pub fn pressure_drop(&self) -> f64 {
        self.inflow - self.outflow
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        finite("P1", self.inflow)?;
        finite("P2", self.outflow)?;
        if self.inflow == self.outflow {
            return Err(ParamError::NoPressureDrop(self.inflow));
        }
        Ok(())
    }
}

/// Fluid properties. Temperature and molecular weight only enter the
/// molecular-flow regime.
#[derive(Debug, Clone, Copy)]
pub struct FluidProperties {
    pub viscosity: f64,        // [Pa.s]
    pub temperature: f64,      // [K]
    pub molecular_weight: f64, // [kg/mol]
}

impl Default for FluidProperties {
    fn default() -> Self {
        Self::from_user_units(1.0e-3, 25.0, 18.015)
    }
}

impl FluidProperties {
    /// Build from the units the inputs are given in: °C and g/mol.
    pub fn from_user_units(viscosity: f64, temperature_c: f64, molecular_weight_g: f64) -> Self {
        Self {
            viscosity,
            temperature: temperature_c + KELVIN_OFFSET,
            molecular_weight: molecular_weight_g / 1000.0,
        }
    }

    pub fn validate(&self, regime: FlowRegime) -> Result<(), ParamError> {
        positive("viscosity", self.viscosity)?;
        if regime == FlowRegime::Molecular {
            positive("temperature [K]", self.temperature)?;
            positive("molecular weight", self.molecular_weight)?;
        }
        Ok(())
    }
}

/// Iteration budgets and tolerances of the solve loop.
#[derive(Debug, Clone, Copy)]
pub struct SolverSettings {
    /// Relative field change at which the outer loop stops. Also used as the
    /// absolute residual target of the SOR fallback.
    pub tolerance: f64,
    pub max_outer_iterations: u32,
    pub sor_omega: f64,
    pub sor_max_steps: u32,
    pub regime: FlowRegime,
    pub periodic_wrap: PeriodicWrap,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: 1.0,
            max_outer_iterations: 20,
            sor_omega: 1.5,
            sor_max_steps: 100,
            regime: FlowRegime::Viscous,
            periodic_wrap: PeriodicWrap::OneSided,
        }
    }
}

impl SolverSettings {
    pub fn validate(&self) -> Result<(), ParamError> {
        non_negative("tolerance", self.tolerance)?;
        if !(self.sor_omega > 0.0 && self.sor_omega < 2.0) {
            return Err(ParamError::RelaxationOutOfRange(self.sor_omega));
        }
        if self.max_outer_iterations == 0 {
            return Err(ParamError::NoIterations);
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParamError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ParamError::Negative { name, value })
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), ParamError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ParamError::NonFinite { name, value })
    }
}
