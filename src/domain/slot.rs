//! Static slot catalogue
//!
//! The schedule grid is the same for every day: a fixed, ordered sequence of
//! hourly slots grouped into periods. Slots are never persisted.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time of day at minute resolution, rendered as `HH:mm`
///
/// # Examples
///
/// ```
/// use agenda::domain::slot::SlotTime;
///
/// let time: SlotTime = "09:30".parse().unwrap();
/// assert_eq!(time.to_string(), "09:30");
/// assert!("9h".parse::<SlotTime>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotTime {
    hour: u8,
    minute: u8,
}

impl SlotTime {
    /// Creates a slot time. Panics if the hour or minute is out of range.
    pub const fn new(hour: u8, minute: u8) -> Self {
        assert!(hour < 24 && minute < 60);
        Self { hour, minute }
    }

    /// Creates a slot time from hour and minute, returning `None` if out of range
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                hour: hour as u8,
                minute: minute as u8,
            })
        } else {
            None
        }
    }

    /// Truncates a wall-clock time to minute resolution
    pub fn from_naive(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Hour component (0-23)
    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    /// Minute component (0-59)
    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    /// Wall-clock time at the start of this minute
    pub fn to_naive(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }

    /// The `HH:mm` label
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for SlotTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid time '{s}'. Expected HH:mm");
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for SlotTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Named part of the day a slot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Before noon
    Morning,
    /// Noon to late afternoon
    Afternoon,
    /// Evening sessions
    Evening,
}

impl Period {
    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Afternoon => "Afternoon",
            Period::Evening => "Evening",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the slot catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Start time of the slot
    pub time: SlotTime,

    /// Period the slot belongs to
    pub period: Period,

    /// UI hint: a frequently requested time
    pub peak: bool,
}

impl Slot {
    const fn at(hour: u8, period: Period, peak: bool) -> Self {
        Self {
            time: SlotTime::new(hour, 0),
            period,
            peak,
        }
    }

    /// The `HH:mm` label of the slot
    pub fn label(&self) -> String {
        self.time.label()
    }
}

static CATALOGUE: [Slot; 11] = [
    Slot::at(8, Period::Morning, false),
    Slot::at(9, Period::Morning, true),
    Slot::at(10, Period::Morning, true),
    Slot::at(11, Period::Morning, false),
    Slot::at(12, Period::Afternoon, false),
    Slot::at(13, Period::Afternoon, false),
    Slot::at(14, Period::Afternoon, false),
    Slot::at(15, Period::Afternoon, false),
    Slot::at(16, Period::Afternoon, false),
    Slot::at(17, Period::Afternoon, false),
    Slot::at(18, Period::Evening, true),
];

/// The fixed, ordered slot catalogue shared by every day
pub fn catalogue() -> &'static [Slot] {
    &CATALOGUE
}

/// Finds the catalogue slot starting at `time`, if any
pub fn find_slot(time: SlotTime) -> Option<&'static Slot> {
    CATALOGUE.iter().find(|slot| slot.time == time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_catalogue_is_ordered_and_unique() {
        let slots = catalogue();
        assert_eq!(slots.len(), 11);
        assert!(slots.windows(2).all(|w| w[0].time < w[1].time));
        assert_eq!(slots.first().unwrap().label(), "08:00");
        assert_eq!(slots.last().unwrap().label(), "18:00");
    }

    #[test]
    fn test_catalogue_periods() {
        let periods: Vec<Period> = catalogue().iter().map(|s| s.period).collect();
        assert_eq!(periods.iter().filter(|p| **p == Period::Morning).count(), 4);
        assert_eq!(periods.iter().filter(|p| **p == Period::Afternoon).count(), 6);
        assert_eq!(periods.iter().filter(|p| **p == Period::Evening).count(), 1);
    }

    #[test]
    fn test_peak_slots() {
        let peaks: Vec<String> = catalogue()
            .iter()
            .filter(|s| s.peak)
            .map(|s| s.label())
            .collect();
        assert_eq!(peaks, vec!["09:00", "10:00", "18:00"]);
    }

    #[test_case("08:00", 8, 0)]
    #[test_case("9:05", 9, 5)]
    #[test_case(" 23:59 ", 23, 59)]
    fn test_slot_time_parse_valid(input: &str, hour: u32, minute: u32) {
        let time: SlotTime = input.parse().unwrap();
        assert_eq!((time.hour(), time.minute()), (hour, minute));
    }

    #[test_case("" ; "empty")]
    #[test_case("24:00" ; "hour out of range")]
    #[test_case("10:60" ; "minute out of range")]
    #[test_case("10:5" ; "single digit minute")]
    #[test_case("ten:00" ; "not a number")]
    #[test_case("10-00" ; "wrong separator")]
    fn test_slot_time_parse_invalid(input: &str) {
        assert!(input.parse::<SlotTime>().is_err());
    }

    #[test]
    fn test_slot_time_from_naive_truncates_seconds() {
        let naive = NaiveTime::from_hms_opt(9, 0, 42).unwrap();
        assert_eq!(SlotTime::from_naive(naive).label(), "09:00");
    }

    #[test]
    fn test_find_slot() {
        assert!(find_slot(SlotTime::new(14, 0)).is_some());
        assert!(find_slot(SlotTime::new(14, 30)).is_none());
        assert!(find_slot(SlotTime::new(19, 0)).is_none());
    }

    #[test]
    fn test_slot_time_serde() {
        let json = serde_json::to_string(&SlotTime::new(7, 5)).unwrap();
        assert_eq!(json, "\"07:05\"");
        let back: SlotTime = serde_json::from_str("\"18:00\"").unwrap();
        assert_eq!(back, SlotTime::new(18, 0));
    }
}
