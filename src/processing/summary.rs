use crate::discretization::generator::PoreNetwork;
use crate::models::pore::simulation::{SimulationConfig, SimulationReport};
use crate::numerics::solver::SolveStatus;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

pub struct SimulationSummary {
    // Network info
    pub lattice: (usize, usize, usize),
    pub num_sites: usize,
    pub num_throats: usize,
    pub mean_coordination: f64,
    pub target_coordination: f64,
    pub isolated_sites: usize,
    pub cutoff: f64,

    // Solver info
    pub iterations: u32,
    pub final_metric: f64,
    pub status: SolveStatus,
    pub sor_fallbacks: u32,
    pub last_sor_residual: Option<f64>,
    pub degenerate_rows: usize,
    pub unwrapped_couplings: usize,

    // Results, reporting units
    pub flow_rate_si: f64,
    pub permeability_md: f64,
}

impl SimulationSummary {
    pub fn from_run(
        config: &SimulationConfig,
        network: &PoreNetwork,
        report: &SimulationReport,
    ) -> Self {
        let lat = network.lattice;
        Self {
            lattice: (lat.n, lat.m, lat.w),
            num_sites: lat.num_sites(),
            num_throats: network.num_throats(),
            mean_coordination: network.mean_coordination(),
            target_coordination: config.network.z_avg,
            isolated_sites: network.isolated_sites(),
            cutoff: config.network.cutoff(),
            iterations: report.iterations,
            final_metric: report.final_metric,
            status: report.status,
            sor_fallbacks: report.sor_fallbacks,
            last_sor_residual: report.last_sor_residual,
            degenerate_rows: report.degenerate_rows,
            unwrapped_couplings: report.unwrapped_couplings,
            flow_rate_si: report.permeability.flow_rate_si(),
            permeability_md: report.permeability.millidarcy(),
        }
    }

    pub fn flow_rate_line(&self) -> String {
        format!("The flow rate Q = {:e}[m^3/s]", self.flow_rate_si)
    }

    pub fn permeability_line(&self) -> String {
        format!("The permeability K = {:e} [md]", self.permeability_md)
    }

    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let (n, m, w) = self.lattice;

        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "PORE NETWORK SIMULATION SUMMARY")?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out)?;

        writeln!(out, "NETWORK STATISTICS")?;
        writeln!(out, "{}", "-".repeat(60))?;
        writeln!(out, "Lattice:             {} x {} x {}", n, m, w)?;
        writeln!(out, "Number of sites:     {}", self.num_sites)?;
        writeln!(out, "Number of throats:   {}", self.num_throats)?;
        writeln!(
            out,
            "Coordination:        {:.3} (target {:.3})",
            self.mean_coordination, self.target_coordination
        )?;
        writeln!(out, "Isolated sites:      {}", self.isolated_sites)?;
        writeln!(out, "Cutoff:              {:.6}", self.cutoff)?;
        writeln!(out)?;

        writeln!(out, "SOLVER")?;
        writeln!(out, "{}", "-".repeat(60))?;
        writeln!(out, "Outer iterations:    {}", self.iterations)?;
        writeln!(
            out,
            "Final change:        {:.6e} ({})",
            self.final_metric,
            match self.status {
                SolveStatus::Converged => "converged",
                SolveStatus::BudgetExhausted => "budget exhausted",
                SolveStatus::Diverged => "diverged",
            }
        )?;
        writeln!(out, "SOR fallbacks:       {}", self.sor_fallbacks)?;
        if let Some(res) = self.last_sor_residual {
            writeln!(out, "Last SOR residual:   {:.6e}", res)?;
        }
        writeln!(out, "Degenerate rows:     {}", self.degenerate_rows)?;
        if self.unwrapped_couplings > 0 {
            writeln!(out, "Unwrapped periodic:  {}", self.unwrapped_couplings)?;
        }
        writeln!(out)?;

        writeln!(out, "RESULTS")?;
        writeln!(out, "{}", "-".repeat(60))?;
        writeln!(out, "{}", self.flow_rate_line())?;
        writeln!(out, "{}", self.permeability_line())?;
        writeln!(out, "{}", "=".repeat(60))?;

        Ok(())
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = File::create(path)?;
        self.write_report(&mut file)
    }

    pub fn print_to_console(&self) {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        if let Err(e) = self.write_report(&mut lock) {
            eprintln!("Failed to print summary: {}", e);
        }
    }
}
