use crate::discretization::generator::ThroatField;
use crate::discretization::lattice::Lattice;
use crate::models::pore::field::PressureField;
use crate::physics::conductance::hagen_poiseuille;
use glam::IVec3;

/// micron³/s to m³/s.
pub const FLOW_RATE_TO_SI: f64 = 1e-18;
/// Computed permeability to millidarcy.
pub const PERMEABILITY_TO_MILLIDARCY: f64 = 1.01325e3;

const LATERAL: [i32; 3] = [0, 1, -1];

/// Darcy permeability of the sample and the quantities it is built from, in
/// micron-based units.
#[derive(Clone, Copy, Debug)]
pub struct Permeability {
    pub flow_rate: f64, // [micron^3/s]
    pub area: f64,      // [micron^2]
    pub length: f64,    // [micron]
    pub value: f64,
}

impl Permeability {
    pub fn flow_rate_si(&self) -> f64 {
        self.flow_rate * FLOW_RATE_TO_SI
    }

    pub fn millidarcy(&self) -> f64 {
        self.value * PERMEABILITY_TO_MILLIDARCY
    }
}

/// Cross-section normal to the flow: pores of diameter `2 R_avg` separated by
/// throats of length `L_avg` along `j` and `k`.
pub fn characteristic_area(lattice: &Lattice, r_avg: f64, l_avg: f64) -> f64 {
    let (m, w) = (lattice.m as f64, lattice.w as f64);
    (2.0 * m * r_avg + l_avg * (m - 1.0)) * (l_avg * (w - 1.0) + 2.0 * w * r_avg)
}

/// Sample length along the flow axis.
pub fn characteristic_length(lattice: &Lattice, r_avg: f64, l_avg: f64) -> f64 {
    let n = lattice.n as f64;
    l_avg * (n - 1.0) + 2.0 * n * r_avg
}

/// Volumetric flow into the outflow face from the layer behind it, summed
/// over open throats. NaN contributions are skipped.
pub fn outflow_rate(throats: &ThroatField, field: &PressureField, viscosity: f64) -> f64 {
    let lattice = throats.lattice;
    let last = lattice.n - 1;
    let mut total = 0.0;

    for site in lattice.layer(last) {
        let p = lattice.point(site);
        for dy in LATERAL {
            for dz in LATERAL {
                let Some(nb) = lattice.index_of(p + IVec3::new(-1, dy, dz)) else {
                    continue;
                };
                let throat = throats.scaled_between(site, nb);
                if !throats.is_open(&throat) {
                    continue;
                }
                let dp = field.values[nb] - field.values[site];
                let q = dp * hagen_poiseuille(throat.radius, throat.length, viscosity);
                if !q.is_nan() {
                    total += q;
                }
            }
        }
    }
    total
}

/// `K = Q L μ / (A ΔP)`.
pub fn extract(
    throats: &ThroatField,
    field: &PressureField,
    viscosity: f64,
    r_avg: f64,
    l_avg: f64,
    pressure_drop: f64,
) -> Permeability {
    let lattice = throats.lattice;
    let flow_rate = outflow_rate(throats, field, viscosity);
    let area = characteristic_area(&lattice, r_avg, l_avg);
    let length = characteristic_length(&lattice, r_avg, l_avg);
    let value = flow_rate * length * viscosity / (area * pressure_drop);

    Permeability {
        flow_rate,
        area,
        length,
        value,
    }
}
