use crate::discretization::lattice::Lattice;
use crate::physics::bc::BoundaryConditions;
use nalgebra::DVector;

/// Pressure at every site, stored in flat lattice order.
#[derive(Clone, Debug)]
pub struct PressureField {
    pub lattice: Lattice,
    pub values: DVector<f64>,
}

impl PressureField {
    /// `P1` everywhere, outflow face at `P2`.
    pub fn initial(lattice: Lattice, bc: &BoundaryConditions) -> Self {
        let mut values = DVector::from_element(lattice.num_sites(), bc.pressures.inflow);
        bc.pin(&lattice, values.as_mut_slice());
        Self { lattice, values }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        self.values[self.lattice.linear_index(i, j, k)]
    }

    /// Mean pressure of layer `i`.
    pub fn layer_average(&self, i: usize) -> f64 {
        let sum: f64 = self.lattice.layer(i).map(|idx| self.values[idx]).sum();
        sum / (self.lattice.m * self.lattice.w) as f64
    }

    /// `(x, mean pressure)` per layer with `x = i * l_avg` [micron].
    pub fn axial_profile(&self, l_avg: f64) -> Vec<(f64, f64)> {
        (0..self.lattice.n)
            .map(|i| (i as f64 * l_avg, self.layer_average(i)))
            .collect()
    }
}
