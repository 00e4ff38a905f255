//! Confirmation types: the kinds of interaction recorded against a delivered ad.
//!
//! Ordinals are persisted and compared when collapsing history, so the table
//! below is the single source of truth for ordinal, wire string and whether
//! the interaction belongs to the viewed/clicked/dismissed funnel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfirmationTypeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ConfirmationType {
    #[default]
    None,
    Clicked,
    Dismissed,
    Viewed,
    Landed,
    Flagged,
    Upvoted,
    Downvoted,
    Conversion,
}

struct Entry {
    kind: ConfirmationType,
    value: u8,
    wire: &'static str,
    funnel_event: bool,
}

static TABLE: [Entry; 9] = [
    Entry { kind: ConfirmationType::None, value: 0, wire: "", funnel_event: false },
    Entry { kind: ConfirmationType::Clicked, value: 1, wire: "click", funnel_event: true },
    Entry { kind: ConfirmationType::Dismissed, value: 2, wire: "dismiss", funnel_event: true },
    Entry { kind: ConfirmationType::Viewed, value: 3, wire: "view", funnel_event: true },
    Entry { kind: ConfirmationType::Landed, value: 4, wire: "landed", funnel_event: false },
    Entry { kind: ConfirmationType::Flagged, value: 5, wire: "flag", funnel_event: false },
    Entry { kind: ConfirmationType::Upvoted, value: 6, wire: "upvote", funnel_event: false },
    Entry { kind: ConfirmationType::Downvoted, value: 7, wire: "downvote", funnel_event: false },
    Entry { kind: ConfirmationType::Conversion, value: 8, wire: "conversion", funnel_event: false },
];

impl ConfirmationType {
    fn entry(self) -> &'static Entry {
        // Variants are declared in ordinal order, so the discriminant indexes the table.
        &TABLE[self as usize]
    }

    /// Every confirmation type in ordinal order.
    pub fn all() -> impl Iterator<Item = ConfirmationType> {
        TABLE.iter().map(|e| e.kind)
    }

    /// Persisted ordinal. Lower values win when history is collapsed.
    pub fn value(self) -> u8 {
        self.entry().value
    }

    pub fn as_str(self) -> &'static str {
        self.entry().wire
    }

    /// Whether this interaction is a viewed, clicked or dismissed event.
    pub fn is_funnel_event(self) -> bool {
        self.entry().funnel_event
    }
}

impl TryFrom<u8> for ConfirmationType {
    type Error = ConfirmationTypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        TABLE
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.kind)
            .ok_or(ConfirmationTypeError::OutOfRange(value))
    }
}

impl FromStr for ConfirmationType {
    type Err = ConfirmationTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TABLE
            .iter()
            .find(|e| e.wire == s)
            .map(|e| e.kind)
            .ok_or_else(|| ConfirmationTypeError::Unknown(s.to_string()))
    }
}

impl fmt::Display for ConfirmationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConfirmationType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConfirmationType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = String::deserialize(deserializer)?;
        wire.parse().map_err(serde::de::Error::custom)
    }
}
