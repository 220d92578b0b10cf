//! External record shapes and the source contract.

use crate::calendar::EpochMs;
use crate::model::anchor::{AnchorDate, AnchorRecord, Recurrence};
use crate::upcoming::aggregator::{AggregateResult, UpcomingError};
use serde::{Deserialize, Serialize};

/// Contact stored by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientRecord {
    pub id: String,
    pub name: String,
    /// Birthday as stored, epoch milliseconds. Optional in the contact form.
    pub birthday_ms: Option<EpochMs>,
}

impl RecipientRecord {
    /// Annual birthday anchor, or `None` when no birthday is stored.
    ///
    /// # Errors
    /// - `InvalidRecord` when the stored timestamp is not a calendar date.
    pub fn to_anchor_record(&self) -> AggregateResult<Option<AnchorRecord>> {
        let Some(birthday_ms) = self.birthday_ms else {
            return Ok(None);
        };
        let anchor = anchor_from_ms(&self.id, birthday_ms)?;
        Ok(Some(AnchorRecord::annual(
            self.id.clone(),
            self.name.clone(),
            anchor.month,
            anchor.day,
        )))
    }
}

/// User-defined event stored by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomEventRecord {
    pub id: String,
    pub name: String,
    pub date_ms: EpochMs,
    pub is_recurring: bool,
}

impl CustomEventRecord {
    /// Anchor keeping the original year for one-off events.
    ///
    /// # Errors
    /// - `InvalidRecord` when the stored timestamp is not a calendar date.
    pub fn to_anchor_record(&self) -> AggregateResult<AnchorRecord> {
        let anchor = anchor_from_ms(&self.id, self.date_ms)?;
        Ok(AnchorRecord::new(
            self.id.clone(),
            self.name.clone(),
            anchor,
            Recurrence::from_flag(self.is_recurring),
        ))
    }
}

fn anchor_from_ms(source_id: &str, ms: EpochMs) -> AggregateResult<AnchorDate> {
    AnchorDate::from_epoch_ms(ms).ok_or_else(|| UpcomingError::InvalidRecord {
        source_id: source_id.to_string(),
        reason: format!("timestamp {ms} is outside the calendar range"),
    })
}

/// Read-only accessor over one user's records.
pub trait EventSource {
    fn recipients(&self) -> AggregateResult<Vec<RecipientRecord>>;
    fn custom_events(&self) -> AggregateResult<Vec<CustomEventRecord>>;
}

/// Source backed by owned vectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryEventSource {
    #[serde(default)]
    pub recipients: Vec<RecipientRecord>,
    #[serde(default)]
    pub custom_events: Vec<CustomEventRecord>,
}

impl InMemoryEventSource {
    pub fn new(recipients: Vec<RecipientRecord>, custom_events: Vec<CustomEventRecord>) -> Self {
        Self {
            recipients,
            custom_events,
        }
    }
}

impl EventSource for InMemoryEventSource {
    fn recipients(&self) -> AggregateResult<Vec<RecipientRecord>> {
        Ok(self.recipients.clone())
    }

    fn custom_events(&self) -> AggregateResult<Vec<CustomEventRecord>> {
        Ok(self.custom_events.clone())
    }
}

impl<S: EventSource + ?Sized> EventSource for &S {
    fn recipients(&self) -> AggregateResult<Vec<RecipientRecord>> {
        (**self).recipients()
    }

    fn custom_events(&self) -> AggregateResult<Vec<CustomEventRecord>> {
        (**self).custom_events()
    }
}
