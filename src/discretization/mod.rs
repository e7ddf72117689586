pub mod generator;
pub mod lattice;
