use clap::{Parser, ValueEnum};
use porenet_rs::models::pore::{
    BoundaryPressures, FluidProperties, NetworkParams, Simulation, SimulationConfig,
    SolverSettings,
};
use porenet_rs::numerics::solver::SolveStatus;
use porenet_rs::physics::bc::PeriodicWrap;
use porenet_rs::physics::conductance::FlowRegime;
use porenet_rs::processing::csv_writer;
use porenet_rs::processing::summary::SimulationSummary;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliRegime {
    Viscous,
    Molecular,
}

impl From<CliRegime> for FlowRegime {
    fn from(value: CliRegime) -> Self {
        match value {
            CliRegime::Viscous => FlowRegime::Viscous,
            CliRegime::Molecular => FlowRegime::Molecular,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliWrap {
    OneSided,
    Modular,
    Legacy,
}

impl From<CliWrap> for PeriodicWrap {
    fn from(value: CliWrap) -> Self {
        match value {
            CliWrap::OneSided => PeriodicWrap::OneSided,
            CliWrap::Modular => PeriodicWrap::Modular,
            CliWrap::Legacy => PeriodicWrap::Legacy,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "porenet", version, about)]
struct Cli {
    /// Nodes along the flow direction
    #[arg(short, long, default_value_t = 6)]
    n: usize,

    /// Horizontal nodes
    #[arg(short, long, default_value_t = 4)]
    m: usize,

    /// Depth nodes
    #[arg(short, long, default_value_t = 4)]
    w: usize,

    /// Average coordination number (0..=26)
    #[arg(long, default_value_t = 6.0)]
    z_avg: f64,

    /// Average throat radius [micron]
    #[arg(long, default_value_t = 10.0)]
    r_avg: f64,

    /// Throat radius standard deviation [micron]
    #[arg(long, default_value_t = 2.0)]
    r_stdv: f64,

    /// Average throat length [micron]
    #[arg(long, default_value_t = 50.0)]
    l_avg: f64,

    /// Throat length standard deviation [micron]
    #[arg(long, default_value_t = 5.0)]
    l_stdv: f64,

    /// System temperature [C]
    #[arg(long, default_value_t = 25.0)]
    temperature: f64,

    /// Molecular weight of the fluid [g/mol]
    #[arg(long, default_value_t = 18.015)]
    molecular_weight: f64,

    /// Fluid viscosity [Pa.s]
    #[arg(long, default_value_t = 1.0e-3)]
    viscosity: f64,

    /// Inflow pressure [Pa]
    #[arg(long, default_value_t = 200_000.0)]
    p1: f64,

    /// Outflow pressure [Pa]
    #[arg(long, default_value_t = 100_000.0)]
    p2: f64,

    #[arg(long, value_enum, default_value_t = CliRegime::Viscous)]
    regime: CliRegime,

    /// Mapping of neighbours that leave through a lateral face
    #[arg(long, value_enum, default_value_t = CliWrap::OneSided)]
    periodic_wrap: CliWrap,

    /// Clamp negative sampled radii and lengths
    #[arg(long)]
    clamp_geometry: bool,

    /// RNG seed for the throat network
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Directory for CSV exports of the network, field and profile
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Only print the results
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            network: NetworkParams {
                n: self.n,
                m: self.m,
                w: self.w,
                z_avg: self.z_avg,
                r_avg: self.r_avg,
                r_stdv: self.r_stdv,
                l_avg: self.l_avg,
                l_stdv: self.l_stdv,
                seed: self.seed,
                clamp_negative_geometry: self.clamp_geometry,
            },
            pressures: BoundaryPressures {
                inflow: self.p1,
                outflow: self.p2,
            },
            fluid: FluidProperties::from_user_units(
                self.viscosity,
                self.temperature,
                self.molecular_weight,
            ),
            solver: SolverSettings {
                regime: self.regime.into(),
                periodic_wrap: self.periodic_wrap.into(),
                ..SolverSettings::default()
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config();

    let mut sim = match Simulation::new(config.clone(), !cli.quiet) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let network = sim.network();
    let report = sim.run();
    let summary = SimulationSummary::from_run(&config, &network, &report);

    if cli.quiet {
        println!("{}", summary.flow_rate_line());
        println!("{}", summary.permeability_line());
    } else {
        summary.print_to_console();
    }

    if let Some(dir) = &cli.output {
        if let Err(e) = export(dir, &sim, &network, &summary) {
            eprintln!("Failed to write output to {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
        if !cli.quiet {
            println!("Results saved to {}", dir.display());
        }
    }

    if report.status == SolveStatus::Diverged {
        eprintln!("Error: pressure solve diverged, results are from the last finite field");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn export(
    dir: &Path,
    sim: &Simulation,
    network: &porenet_rs::discretization::generator::PoreNetwork,
    summary: &SimulationSummary,
) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    csv_writer::write_network_edges(dir.join("network_edges.csv"), network)?;
    csv_writer::write_pressure_field(dir.join("pressure_field.csv"), sim.field())?;
    csv_writer::write_profile(
        dir.join("pressure_profile.csv"),
        &sim.field().axial_profile(sim.config.network.l_avg),
    )?;
    summary.write_to_file(dir.join("simulation_summary.txt"))
}
