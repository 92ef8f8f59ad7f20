//! Crop-season calendar for the Indian agricultural year.
//!
//! Maps a calendar date to the season whose historical baseline is relevant
//! for the farmer's *current* decision, which is not always the season the
//! date falls in: during a sowing window the season being sown wins, and
//! during a harvest window the farmer is already planning for the next one.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// The three crop seasons of the agricultural calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Kharif,
    Rabi,
    Zaid,
}

/// Why a season was selected for the given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonContext {
    /// The date is inside this season's sowing window.
    Sowing,
    /// The date is inside the previous season's harvest window; this is the next season.
    Upcoming,
    /// The date falls plainly inside this season's months.
    Current,
}

impl Season {
    /// Fixed iteration order used by every window check. Also the cyclic
    /// succession order: kharif -> rabi -> zaid -> kharif.
    pub const ORDER: [Season; 3] = [Season::Kharif, Season::Rabi, Season::Zaid];

    /// Calendar months comprising the season. The three sets partition the
    /// twelve months exactly.
    pub fn months(self) -> &'static [u32] {
        match self {
            Season::Kharif => &[6, 7, 8, 9, 10],
            Season::Rabi => &[11, 12, 1, 2, 3],
            Season::Zaid => &[4, 5],
        }
    }

    /// Months during which this season's crops are sown.
    pub fn sowing_window(self) -> &'static [u32] {
        match self {
            Season::Kharif => &[5, 6, 7],
            Season::Rabi => &[10, 11, 12],
            Season::Zaid => &[3, 4],
        }
    }

    /// Months during which this season's crops are harvested.
    pub fn harvest_window(self) -> &'static [u32] {
        match self {
            Season::Kharif => &[9, 10, 11],
            Season::Rabi => &[3, 4, 5],
            Season::Zaid => &[5, 6],
        }
    }

    /// The season that follows this one in the agricultural year.
    pub fn next(self) -> Season {
        match self {
            Season::Kharif => Season::Rabi,
            Season::Rabi => Season::Zaid,
            Season::Zaid => Season::Kharif,
        }
    }

    /// Human-readable name used in reports.
    pub fn display_name(self) -> &'static str {
        match self {
            Season::Kharif => "Kharif (Monsoon)",
            Season::Rabi => "Rabi (Winter)",
            Season::Zaid => "Zaid (Summer)",
        }
    }
}

/// The outcome of [`relevant_season`]: which season's baseline to analyze and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevantSeason {
    pub season: Season,
    pub months: &'static [u32],
    pub context: SeasonContext,
}

/// Determines which season is relevant for farming decisions on `date`.
///
/// Priority is a fixed business rule: sowing-window containment wins over
/// harvest-window containment, which wins over plain month containment. A
/// harvest-window hit returns the *next* season, since the farmer's pending
/// decisions concern the upcoming crop, not the one being cut.
pub fn relevant_season(date: NaiveDate) -> RelevantSeason {
    let month = date.month();

    for season in Season::ORDER {
        if season.sowing_window().contains(&month) {
            return RelevantSeason {
                season,
                months: season.months(),
                context: SeasonContext::Sowing,
            };
        }
    }

    for season in Season::ORDER {
        if season.harvest_window().contains(&month) {
            let next = season.next();
            return RelevantSeason {
                season: next,
                months: next.months(),
                context: SeasonContext::Upcoming,
            };
        }
    }

    for season in Season::ORDER {
        if season.months().contains(&month) {
            return RelevantSeason {
                season,
                months: season.months(),
                context: SeasonContext::Current,
            };
        }
    }

    // Unreachable while the month sets partition the year; kept so the
    // function stays total.
    RelevantSeason {
        season: Season::Rabi,
        months: Season::Rabi.months(),
        context: SeasonContext::Current,
    }
}
