pub mod csv_writer;
pub mod permeability;
pub mod summary;
