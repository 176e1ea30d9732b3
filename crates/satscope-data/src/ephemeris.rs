//! Local ephemeris files.
//!
//! The files are CSV exports with two preamble lines before the header row.
//! Positions are ECEF kilometers; velocities, when present, are km/s.

use std::path::Path;

use glam::DVec3;
use satscope_geodesy::CartesianPosition;

use crate::error::{Error, Result};
use crate::time::ObservationTime;

/// Number of lines before the header row.
const PREAMBLE_LINES: usize = 2;

pub const TIME_COLUMN: &str = "Time (UTCJ4)";
pub const POSITION_COLUMNS: [&str; 3] = ["x (km)", "y (km)", "z (km)"];
pub const VELOCITY_COLUMNS: [&str; 3] = ["vx (km/s)", "vy (km/s)", "vz (km/s)"];

/// Row limit the viewer applies when loading a file.
pub const DEFAULT_ROW_LIMIT: usize = 100;

/// One state vector from an ephemeris file.
#[derive(Debug, Clone, PartialEq)]
pub struct EphemerisRow {
    /// Timestamp exactly as written in the file.
    pub time: String,
    pub position: CartesianPosition,
    pub velocity: Option<DVec3>,
}

/// Column positions resolved from the header row.
struct Columns {
    time: usize,
    position: [usize; 3],
    velocity: Option<[usize; 3]>,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self> {
        let find = |name: &str| header.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::InvalidData {
                context: "ephemeris",
                detail: format!("missing column {name:?}"),
            })
        };

        let velocity = match VELOCITY_COLUMNS.map(find) {
            [Some(vx), Some(vy), Some(vz)] => Some([vx, vy, vz]),
            _ => None,
        };

        Ok(Self {
            time: require(TIME_COLUMN)?,
            position: [
                require(POSITION_COLUMNS[0])?,
                require(POSITION_COLUMNS[1])?,
                require(POSITION_COLUMNS[2])?,
            ],
            velocity,
        })
    }
}

/// Read and parse an ephemeris file, keeping at most `limit` rows.
pub fn load_ephemeris(path: &Path, limit: usize) -> Result<Vec<EphemerisRow>> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let rows = parse_ephemeris(&text, limit)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "loaded ephemeris");
    Ok(rows)
}

/// Parse ephemeris CSV text, keeping at most `limit` rows.
pub fn parse_ephemeris(text: &str, limit: usize) -> Result<Vec<EphemerisRow>> {
    let mut lines = text
        .lines()
        .enumerate()
        .skip(PREAMBLE_LINES)
        .filter(|(_, line)| !line.trim().is_empty());

    let Some((_, header)) = lines.next() else {
        return Err(Error::InvalidData {
            context: "ephemeris",
            detail: "missing header row".to_string(),
        });
    };
    let columns = Columns::from_header(&split_record(header))?;

    lines
        .take(limit)
        .map(|(index, line)| parse_row(&columns, &split_record(line), index + 1))
        .collect()
}

fn parse_row(columns: &Columns, fields: &[String], line_number: usize) -> Result<EphemerisRow> {
    let field = |index: usize| {
        fields.get(index).ok_or_else(|| Error::InvalidData {
            context: "ephemeris",
            detail: format!("line {line_number}: expected at least {} fields", index + 1),
        })
    };
    let number = |index: usize| -> Result<f64> {
        let raw = field(index)?;
        raw.parse().map_err(|e| Error::InvalidData {
            context: "ephemeris",
            detail: format!("line {line_number}: bad number {raw:?}: {e}"),
        })
    };

    let [x, y, z] = columns.position;
    let position = CartesianPosition::new(number(x)?, number(y)?, number(z)?);

    let velocity = match columns.velocity {
        Some([vx, vy, vz]) => Some(DVec3::new(number(vx)?, number(vy)?, number(vz)?)),
        None => None,
    };

    Ok(EphemerisRow {
        time: field(columns.time)?.clone(),
        position,
        velocity,
    })
}

/// Split one CSV record, honouring double-quoted fields and `""` escapes.
///
/// Whitespace around fields is dropped; inside quotes it is kept.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut was_quoted = false;
    let mut closed = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                    closed = true;
                }
            }
            '"' if current.trim().is_empty() && !was_quoted => {
                current.clear();
                in_quotes = true;
                was_quoted = true;
            }
            ',' if !in_quotes => {
                fields.push(finish_field(&mut current, was_quoted));
                was_quoted = false;
                closed = false;
            }
            c if closed && c.is_whitespace() => {}
            _ => current.push(c),
        }
    }
    fields.push(finish_field(&mut current, was_quoted));
    fields
}

fn finish_field(current: &mut String, was_quoted: bool) -> String {
    let field = std::mem::take(current);
    if was_quoted {
        field
    } else {
        field.trim().to_string()
    }
}

/// A small demonstration data set, one second apart from `base`.
#[must_use]
pub fn sample_ephemeris(base: ObservationTime) -> Vec<EphemerisRow> {
    let positions = [
        (5000.0, -3000.0, 4000.0),
        (5001.5, -2998.5, 4001.2),
        (5003.0, -2997.0, 4002.4),
    ];

    positions
        .into_iter()
        .zip(0u32..)
        .map(|((x, y, z), offset)| EphemerisRow {
            time: base.plus_seconds(offset).to_string(),
            position: CartesianPosition::new(x, y, z),
            velocity: Some(DVec3::new(-4.5, 5.2, 3.8)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANDSAT: &str = "\
Landsat 8 Definitive Ephemeris
Generated 2025-01-01
Time (UTCJ4),x (km),y (km),z (km),vx (km/s),vy (km/s),vz (km/s)
2025-01-01T00:00:00,5000.0,-3000.0,4000.0,-4.5,5.2,3.8
2025-01-01T00:00:01,5001.5,-2998.5,4001.2,-4.5,5.2,3.8

2025-01-01T00:00:02,5003.0,-2997.0,4002.4,-4.5,5.2,3.8
";

    #[test]
    fn test_parse_rows() {
        let rows = parse_ephemeris(LANDSAT, 100).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].time, "2025-01-01T00:00:00");
        assert_eq!(rows[0].position, CartesianPosition::new(5000.0, -3000.0, 4000.0));
        assert_eq!(rows[2].velocity, Some(DVec3::new(-4.5, 5.2, 3.8)));
    }

    #[test]
    fn test_limit() {
        let rows = parse_ephemeris(LANDSAT, 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].time, "2025-01-01T00:00:01");
    }

    #[test]
    fn test_columns_in_any_order_without_velocity() {
        let text = "a\nb\n\"z (km)\", Time (UTCJ4) ,x (km),y (km)\n3, \"2025-01-01T00:00:00\" ,1,2\n";
        let rows = parse_ephemeris(text, 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].position, CartesianPosition::new(1.0, 2.0, 3.0));
        assert_eq!(rows[0].time, "2025-01-01T00:00:00");
        assert!(rows[0].velocity.is_none());
    }

    #[test]
    fn test_missing_column() {
        let text = "a\nb\nTime (UTCJ4),x (km),y (km)\n2025,1,2\n";
        match parse_ephemeris(text, 10) {
            Err(Error::InvalidData { detail, .. }) => assert!(detail.contains("z (km)")),
            other => panic!("expected invalid data, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_number_names_line() {
        let text = "a\nb\nTime (UTCJ4),x (km),y (km),z (km)\nt0,1,2,3\nt1,1,oops,3\n";
        match parse_ephemeris(text, 10) {
            Err(Error::InvalidData { detail, .. }) => {
                assert!(detail.contains("line 5"), "{detail}");
                assert!(detail.contains("oops"), "{detail}");
            }
            other => panic!("expected invalid data, got {other:?}"),
        }
    }

    #[test]
    fn test_short_row() {
        let text = "a\nb\nTime (UTCJ4),x (km),y (km),z (km)\nt0,1,2\n";
        assert!(matches!(
            parse_ephemeris(text, 10),
            Err(Error::InvalidData { .. })
        ));
    }

    #[test]
    fn test_missing_header() {
        assert!(parse_ephemeris("only\npreamble\n", 10).is_err());
    }

    #[test]
    fn test_split_record_quotes() {
        assert_eq!(
            split_record(r#"a, "b, c" ,"d ""e""",f"#),
            vec!["a", "b, c", "d \"e\"", "f"]
        );
    }

    #[test]
    fn test_sample_matches_file_format() {
        let sample = sample_ephemeris(ObservationTime::default());
        let parsed = parse_ephemeris(LANDSAT, 100).unwrap();
        assert_eq!(sample, parsed);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_ephemeris(Path::new("/definitely/not/here.csv"), 10);
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
