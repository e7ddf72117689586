use crate::discretization::generator::PoreNetwork;
use crate::models::pore::field::PressureField;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write equally long columns under a header row.
pub fn write_csv<P: AsRef<Path>>(path: P, headers: &[&str], data: &[Vec<f64>]) -> io::Result<()> {
    if headers.len() != data.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "Headers count ({}) doesn't match data columns ({})",
                headers.len(),
                data.len()
            ),
        ));
    }
    let n_rows = data.first().map_or(0, |col| col.len());
    if data.iter().any(|col| col.len() != n_rows) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "columns have different lengths",
        ));
    }

    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "{}", headers.join(","))?;
    for i in 0..n_rows {
        let row: Vec<String> = data.iter().map(|col| format!("{:.15e}", col[i])).collect();
        writeln!(file, "{}", row.join(","))?;
    }
    file.flush()
}

/// Pressure at every site: `i,j,k,pressure`.
pub fn write_pressure_field<P: AsRef<Path>>(path: P, field: &PressureField) -> io::Result<()> {
    let lat = field.lattice;
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "i,j,k,pressure")?;
    for (idx, p) in field.values.iter().enumerate() {
        let (i, j, k) = lat.lattice_coord(idx);
        writeln!(file, "{i},{j},{k},{p:.15e}")?;
    }
    file.flush()
}

/// One line per throat: both endpoint coordinates.
pub fn write_network_edges<P: AsRef<Path>>(path: P, network: &PoreNetwork) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "i1,j1,k1,i2,j2,k2")?;
    for (a, b) in &network.edges {
        writeln!(file, "{},{},{},{},{},{}", a.x, a.y, a.z, b.x, b.y, b.z)?;
    }
    file.flush()
}

/// Layer-averaged pressure against axial position.
pub fn write_profile<P: AsRef<Path>>(path: P, profile: &[(f64, f64)]) -> io::Result<()> {
    let (x, p): (Vec<f64>, Vec<f64>) = profile.iter().copied().unzip();
    write_csv(path, &["length_micron", "pressure_pa"], &[x, p])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_write_csv() {
        let path = std::env::temp_dir().join("porenet_test_output.csv");
        let data = vec![vec![1.0, 2.0], vec![3.0, 4.0]];

        write_csv(&path, &["x", "y"], &data).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("x,y\n"));
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let path = std::env::temp_dir().join("porenet_ragged.csv");
        let err = write_csv(&path, &["x", "y"], &[vec![1.0], vec![]]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn pressure_field_has_one_row_per_site() {
        use crate::discretization::lattice::Lattice;
        use crate::models::pore::params::BoundaryPressures;
        use crate::physics::bc::{BoundaryConditions, PeriodicWrap};

        let lattice = Lattice::new(3, 2, 2);
        let bc = BoundaryConditions::new(BoundaryPressures::default(), PeriodicWrap::OneSided);
        let field = PressureField::initial(lattice, &bc);
        let path = std::env::temp_dir().join("porenet_pressure_field.csv");

        write_pressure_field(&path, &field).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("i,j,k,pressure"));
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), lattice.num_sites());
        assert!(rows[0].starts_with("0,0,0,"));
        assert!(rows[11].starts_with("2,1,1,"));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn network_edges_have_one_row_per_throat() {
        use crate::discretization::generator::{Throat, ThroatField};
        use crate::discretization::lattice::Lattice;

        let throats = ThroatField::uniform(
            Lattice::new(2, 1, 1),
            0.0,
            Throat {
                radius: 10.0,
                length: 50.0,
                weight: 1.0,
            },
        );
        let network = throats.network();
        let path = std::env::temp_dir().join("porenet_network_edges.csv");

        write_network_edges(&path, &network).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["i1,j1,k1,i2,j2,k2", "0,0,0,1,0,0"]);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn profile_has_one_row_per_layer() {
        let path = std::env::temp_dir().join("porenet_profile.csv");
        let profile = vec![(0.0, 200.0), (50.0, 150.0), (100.0, 100.0)];

        write_profile(&path, &profile).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "length_micron,pressure_pa");
        let last: Vec<f64> = lines[3].split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(last, vec![100.0, 100.0]);

        fs::remove_file(&path).ok();
    }
}
