use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

/// Part of the day a greeting is chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeBucket {
    /// 05–11 morning, 12–17 afternoon, 18–21 evening, otherwise night.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            18..=21 => Self::Evening,
            _ => Self::Night,
        }
    }

    pub fn salutation(&self) -> &'static str {
        match self {
            Self::Morning => "Good morning",
            Self::Afternoon => "Good afternoon",
            Self::Evening => "Good evening",
            Self::Night => "Working late",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Greeting {
    pub message: String,
    pub bucket: TimeBucket,
    pub hour: u32,
    pub timezone: String,
}

/// Greet `name` according to the local hour of `now` in `tz_name`.
/// An unknown timezone falls back to UTC.
pub fn greet(name: &str, now: DateTime<Utc>, tz_name: &str) -> Greeting {
    let (hour, timezone) = match tz_name.parse::<chrono_tz::Tz>() {
        Ok(tz) => (now.with_timezone(&tz).hour(), tz.name().to_string()),
        Err(_) => {
            log::debug!("[greeting] unknown timezone '{}', using UTC", tz_name);
            (now.hour(), "UTC".to_string())
        }
    };

    let bucket = TimeBucket::from_hour(hour);
    let message = if name.trim().is_empty() {
        format!("{}!", bucket.salutation())
    } else {
        format!("{}, {}!", bucket.salutation(), name.trim())
    };

    Greeting {
        message,
        bucket,
        hour,
        timezone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, h, m, 0).unwrap()
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(TimeBucket::from_hour(4), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(5), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(11), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(12), TimeBucket::Afternoon);
        assert_eq!(TimeBucket::from_hour(17), TimeBucket::Afternoon);
        assert_eq!(TimeBucket::from_hour(18), TimeBucket::Evening);
        assert_eq!(TimeBucket::from_hour(21), TimeBucket::Evening);
        assert_eq!(TimeBucket::from_hour(22), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(0), TimeBucket::Night);
    }

    #[test]
    fn greeting_uses_site_timezone() {
        // 10:30 UTC is 11:30 in Prague (CET) in January
        let g = greet("Jana", utc(10, 30), "Europe/Prague");
        assert_eq!(g.hour, 11);
        assert_eq!(g.bucket, TimeBucket::Morning);
        assert_eq!(g.message, "Good morning, Jana!");
        assert_eq!(g.timezone, "Europe/Prague");

        let g = greet("Jana", utc(11, 30), "Europe/Prague");
        assert_eq!(g.bucket, TimeBucket::Afternoon);
    }

    #[test]
    fn unknown_timezone_falls_back_to_utc() {
        let g = greet("Petr", utc(23, 0), "Mars/Olympus");
        assert_eq!(g.timezone, "UTC");
        assert_eq!(g.bucket, TimeBucket::Night);
        assert_eq!(g.message, "Working late, Petr!");
    }

    #[test]
    fn empty_name_still_greets() {
        assert_eq!(greet("  ", utc(19, 0), "UTC").message, "Good evening!");
    }
}
