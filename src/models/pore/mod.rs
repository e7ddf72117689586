pub mod field;
pub mod params;
pub mod simulation;

pub use field::PressureField;
pub use params::{BoundaryPressures, FluidProperties, NetworkParams, ParamError, SolverSettings};
pub use simulation::{Simulation, SimulationConfig, SimulationError, SimulationReport};
