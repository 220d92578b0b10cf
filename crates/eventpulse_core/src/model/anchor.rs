//! Anchor dates and recurrence tags.
//!
//! # Responsibility
//! - Reduce externally owned records to a `(month, day)` anchor with an
//!   optional year.
//! - Tag every anchor as annual or one-off instead of inferring it from the
//!   entity type.
//!
//! # Invariants
//! - `year` is required when projecting `Recurrence::Once`.
//! - `year` is ignored when projecting `Recurrence::Annual`.

use crate::calendar::{date_of, EpochMs};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Calendar anchor of a projectable entity.
///
/// Fields are public and unchecked; the projector rejects malformed anchors
/// with `ProjectionError::InvalidAnchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorDate {
    /// Original year. Kept for one-off entities.
    pub year: Option<i32>,
    /// 1-based month.
    pub month: u32,
    /// 1-based day of month.
    pub day: u32,
}

impl AnchorDate {
    /// Anchor with month/day only, for annually repeating entities.
    pub fn annual(month: u32, day: u32) -> Self {
        Self {
            year: None,
            month,
            day,
        }
    }

    /// Anchor pinned to one calendar date.
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        Self {
            year: Some(year),
            month,
            day,
        }
    }

    /// Extracts the UTC calendar date of a stored timestamp.
    ///
    /// Returns `None` when `ms` is outside the representable calendar range.
    pub fn from_epoch_ms(ms: EpochMs) -> Option<Self> {
        let date = date_of(ms)?;
        Some(Self::on(date.year(), date.month(), date.day()))
    }

    /// Whether this anchor is February 29.
    pub fn is_leap_day(&self) -> bool {
        self.month == 2 && self.day == 29
    }
}

/// Recurrence tag attached to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// Repeats every year on the anchor's month/day.
    Annual,
    /// Happens once, on the anchor's full date.
    Once,
}

impl Recurrence {
    /// Maps a stored `is_recurring` flag to a tag.
    pub fn from_flag(recurring: bool) -> Self {
        if recurring {
            Self::Annual
        } else {
            Self::Once
        }
    }

    pub fn is_recurring(self) -> bool {
        matches!(self, Self::Annual)
    }
}

/// Reduced form of one external record (recipient, custom event, holiday).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRecord {
    /// Opaque back-reference to the source entity.
    pub source_id: String,
    /// Display name carried into every occurrence.
    pub label: String,
    pub anchor: AnchorDate,
    pub recurrence: Recurrence,
}

impl AnchorRecord {
    pub fn new(
        source_id: impl Into<String>,
        label: impl Into<String>,
        anchor: AnchorDate,
        recurrence: Recurrence,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            label: label.into(),
            anchor,
            recurrence,
        }
    }

    /// Annually repeating record on `month`/`day`.
    pub fn annual(
        source_id: impl Into<String>,
        label: impl Into<String>,
        month: u32,
        day: u32,
    ) -> Self {
        Self::new(
            source_id,
            label,
            AnchorDate::annual(month, day),
            Recurrence::Annual,
        )
    }

    /// One-off record on a full calendar date.
    pub fn once(
        source_id: impl Into<String>,
        label: impl Into<String>,
        year: i32,
        month: u32,
        day: u32,
    ) -> Self {
        Self::new(
            source_id,
            label,
            AnchorDate::on(year, month, day),
            Recurrence::Once,
        )
    }
}
