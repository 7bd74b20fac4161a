/// One reading from the helmet sensor's serial stream, still in raw units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorReading {
    /// `MAG: <int>`, linear acceleration magnitude.
    Acceleration(i64),
    /// `MAG_GY: <int>`, angular velocity magnitude.
    AngularVelocity(i64),
}

const ACCEL_TAG: &str = "MAG:";
const GYRO_TAG: &str = "MAG_GY:";

impl SensorReading {
    /// Finds a tagged integer anywhere in `line`. Lines without a tag, or
    /// with a tag not followed by an integer, yield `None`. A line carrying
    /// both tags reads as acceleration.
    pub fn parse_line(line: &str) -> Option<Self> {
        if let Some(value) = tagged_value(line, ACCEL_TAG) {
            return Some(SensorReading::Acceleration(value));
        }
        tagged_value(line, GYRO_TAG).map(SensorReading::AngularVelocity)
    }
}

fn tagged_value(line: &str, tag: &str) -> Option<i64> {
    line.match_indices(tag)
        .find_map(|(pos, _)| leading_int(&line[pos + tag.len()..]))
}

/// Parses `\s*-?\d+` at the start of `s`.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let digits_start = usize::from(s.starts_with('-'));
    let digits_len = s[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    s[..digits_start + digits_len].parse().ok()
}
