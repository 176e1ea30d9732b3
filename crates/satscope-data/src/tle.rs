//! Three-line element set parsing.

use crate::error::{Error, Result};

/// A named two-line element set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TleEntry {
    pub name: String,
    pub norad_id: u32,
    pub line1: String,
    pub line2: String,
}

/// Parse CelesTrak "3LE" text: repeating groups of name, line 1, line 2.
///
/// Blank lines are ignored and a trailing incomplete group is dropped.
pub fn parse_tle(text: &str) -> Result<Vec<TleEntry>> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();

    lines
        .chunks_exact(3)
        .map(|group| {
            let (name, line1, line2) = (group[0], group[1], group[2]);
            Ok(TleEntry {
                name: name.trim().to_string(),
                norad_id: norad_id(line1)?,
                line1: line1.to_string(),
                line2: line2.to_string(),
            })
        })
        .collect()
}

/// Catalog number from columns 3-7 of line 1.
fn norad_id(line1: &str) -> Result<u32> {
    let field = line1.get(2..7).ok_or_else(|| Error::InvalidData {
        context: "tle",
        detail: format!("line 1 too short: {line1:?}"),
    })?;

    field.trim().parse().map_err(|e| Error::InvalidData {
        context: "tle",
        detail: format!("bad catalog number {field:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATIONS: &str = "ISS (ZARYA)
1 25544U 98067A   24366.50000000  .00016717  00000-0  30000-3 0  9993
2 25544  51.6400 208.9163 0006317  69.9862  25.2906 15.50000000480000
CSS (TIANHE)
1 48274U 21035A   24366.50000000  .00020000  00000-0  25000-3 0  9991
2 48274  41.4700 120.0000 0005000 300.0000  60.0000 15.60000000200000
";

    #[test]
    fn test_parse_two_entries() {
        let entries = parse_tle(STATIONS).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "ISS (ZARYA)");
        assert_eq!(entries[0].norad_id, 25544);
        assert!(entries[0].line1.starts_with("1 25544U"));
        assert!(entries[0].line2.starts_with("2 25544"));
        assert_eq!(entries[1].name, "CSS (TIANHE)");
        assert_eq!(entries[1].norad_id, 48274);
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let text = STATIONS.replace('\n', "\r\n\r\n");
        let entries = parse_tle(&text).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].line2.ends_with('\r'));
    }

    #[test]
    fn test_incomplete_group_dropped() {
        let text = format!("{STATIONS}HST\n1 20580U 90037B");
        let entries = parse_tle(&text).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_bad_catalog_number() {
        let text = "BROKEN\n1 ABCDEU 98067A\n2 ABCDE\n";
        assert!(matches!(
            parse_tle(text),
            Err(Error::InvalidData { context: "tle", .. })
        ));
    }

    #[test]
    fn test_short_line() {
        let text = "SHORT\n1 2\n2 2\n";
        assert!(parse_tle(text).is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_tle("").unwrap().is_empty());
    }
}
