use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::impact::domain::sensor_reading::SensorReading;

/// Reads a captured serial log and returns the recognised readings in
/// order, along with the 1-based line each came from. Unrecognised lines
/// (boot banners, debug output) are skipped.
pub fn read_sensor_log(
    path: &Path,
) -> Result<Vec<(usize, SensorReading)>, Box<dyn std::error::Error>> {
    let file = File::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    parse_sensor_log(BufReader::new(file))
}

pub fn parse_sensor_log<R: BufRead>(
    reader: R,
) -> Result<Vec<(usize, SensorReading)>, Box<dyn std::error::Error>> {
    let mut readings = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(reading) = SensorReading::parse_line(line.trim_end()) {
            readings.push((i + 1, reading));
        }
    }
    Ok(readings)
}
