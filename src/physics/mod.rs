pub mod assembly;
pub mod bc;
pub mod conductance;
