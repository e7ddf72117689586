use crate::discretization::generator::Throat;
use crate::models::pore::params::FluidProperties;
use std::f64::consts::PI;

/// Universal gas constant [J/(mol K)].
pub const GAS_CONSTANT: f64 = 8.314;

/// Flow law used to turn throat geometry into a conductance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlowRegime {
    /// Incompressible Hagen–Poiseuille flow.
    #[default]
    Viscous,
    /// Gas flow: Hagen–Poiseuille scaled by the molar density at the local
    /// mean pressure, plus a Knudsen (free molecular) contribution.
    Molecular,
}

/// `π r⁴ / (8 μ l)`: volumetric conductance of a cylindrical capillary.
#[inline]
pub fn hagen_poiseuille(radius: f64, length: f64, viscosity: f64) -> f64 {
    PI * radius.powi(4) / (8.0 * viscosity * length)
}

/// Knudsen term `(2π r³ / 3) √(8 / (M π R T))`.
#[inline]
pub fn knudsen(radius: f64, molecular_weight: f64, temperature: f64) -> f64 {
    (2.0 * PI * radius.powi(3) / 3.0)
        * (8.0 / (molecular_weight * PI * GAS_CONSTANT * temperature)).sqrt()
}

/// Evaluates throat conductances for one run: fluid, regime and cutoff are
/// fixed, only the mean pressure changes between calls.
#[derive(Clone, Copy, Debug)]
pub struct ConductanceModel {
    pub fluid: FluidProperties,
    pub regime: FlowRegime,
    pub cutoff: f64,
}

impl ConductanceModel {
    pub fn new(fluid: FluidProperties, regime: FlowRegime, cutoff: f64) -> Self {
        Self {
            fluid,
            regime,
            cutoff,
        }
    }

    /// `1` if the weight clears the cutoff, `0` otherwise.
    #[inline]
    pub fn gate(&self, weight: f64) -> f64 {
        if weight > self.cutoff { 1.0 } else { 0.0 }
    }

    /// Conductance of a throat whose length is already distance-scaled.
    /// Exactly zero for closed throats.
    pub fn conductance(&self, throat: &Throat, p_avg: f64) -> f64 {
        let gate = self.gate(throat.weight);
        if gate == 0.0 {
            return 0.0;
        }
        let fluid = &self.fluid;
        let viscous = hagen_poiseuille(throat.radius, throat.length, fluid.viscosity);
        match self.regime {
            FlowRegime::Viscous => viscous * gate,
            FlowRegime::Molecular => {
                let molar_density = p_avg / (GAS_CONSTANT * fluid.temperature);
                let free_molecular =
                    knudsen(throat.radius, fluid.molecular_weight, fluid.temperature);
                (viscous * molar_density + free_molecular) * gate
            }
        }
    }
}
