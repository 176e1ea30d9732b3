//! UTC observation timestamps.
//!
//! Format: `YYYY-MM-DDTHH:MM:SS` (e.g. `2025-01-01T00:00:00`); a space is
//! accepted in place of the `T`.

use std::fmt;
use std::str::FromStr;

/// Default observation time.
pub const DEFAULT_OBSERVATION_TIME: &str = "2025-01-01T00:00:00";

/// A UTC calendar date and time of day, to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObservationTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl Default for ObservationTime {
    fn default() -> Self {
        Self {
            year: 2025,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl ObservationTime {
    /// Returns the time-of-day as UTC seconds since midnight.
    #[must_use]
    pub fn utc_seconds(&self) -> u32 {
        self.hour * 3600 + self.minute * 60 + self.second
    }

    /// Advance by a number of seconds, rolling over days, months and years.
    #[must_use]
    pub fn plus_seconds(mut self, seconds: u32) -> Self {
        let total = u64::from(self.utc_seconds()) + u64::from(seconds);
        let mut days = total / 86_400;
        let rem = total % 86_400;

        #[allow(clippy::cast_possible_truncation)]
        {
            self.hour = (rem / 3600) as u32;
            self.minute = (rem % 3600 / 60) as u32;
            self.second = (rem % 60) as u32;
        }

        while days > 0 {
            self.day += 1;
            if self.day > days_in_month(self.year, self.month) {
                self.day = 1;
                self.month += 1;
                if self.month > 12 {
                    self.month = 1;
                    self.year += 1;
                }
            }
            days -= 1;
        }
        self
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl fmt::Display for ObservationTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl FromStr for ObservationTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both 'T' and ' ' as date/time separator.
        let s = s.trim().replace(' ', "T");
        let parts: Vec<&str> = s.split('T').collect();
        if parts.len() != 2 {
            return Err(format!("expected YYYY-MM-DDTHH:MM:SS, got '{s}'"));
        }

        let date_parts: Vec<&str> = parts[0].split('-').collect();
        let time_parts: Vec<&str> = parts[1].split(':').collect();

        if date_parts.len() != 3 || time_parts.len() != 3 {
            return Err(format!("expected YYYY-MM-DDTHH:MM:SS, got '{s}'"));
        }

        let year = date_parts[0]
            .parse::<i32>()
            .map_err(|e| format!("invalid year: {e}"))?;
        let month = date_parts[1]
            .parse::<u32>()
            .map_err(|e| format!("invalid month: {e}"))?;
        let day = date_parts[2]
            .parse::<u32>()
            .map_err(|e| format!("invalid day: {e}"))?;
        let hour = time_parts[0]
            .parse::<u32>()
            .map_err(|e| format!("invalid hour: {e}"))?;
        let minute = time_parts[1]
            .parse::<u32>()
            .map_err(|e| format!("invalid minute: {e}"))?;
        let second = time_parts[2]
            .parse::<u32>()
            .map_err(|e| format!("invalid second: {e}"))?;

        if !(1..=12).contains(&month) {
            return Err(format!("month out of range: {month}"));
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(format!("day out of range: {day}"));
        }
        if hour >= 24 {
            return Err(format!("hour out of range: {hour}"));
        }
        if minute >= 60 {
            return Err(format!("minute out of range: {minute}"));
        }
        if second >= 60 {
            return Err(format!("second out of range: {second}"));
        }

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }
}
