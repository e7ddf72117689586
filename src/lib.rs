//! Steady-state flow through a random 3D pore network.
//!
//! A lattice of pores is connected by randomly sized throats, a conservation
//! system is assembled over the interior pores and solved for pressure, and
//! the outflow rate is turned into a Darcy permeability.

pub mod discretization;
pub mod models;
pub mod numerics;
pub mod physics;
pub mod processing;
