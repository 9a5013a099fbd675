//! Status model for the dual status system.
//!
//! This module defines the two parallel status representations used across the
//! tool: the compact "custom" status (urgent / priority-2 / priority-3 / done)
//! that acts as the master representation, and the traditional lifecycle
//! status (todo / in-progress / done) paired with a separate 1-4 priority
//! level. Display labels, colour classes, and parse predicates live here.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Compact four-value status bucket, the master representation.
///
/// Urgency order: urgent > priority-2 > priority-3. Done is terminal and not
/// comparable for urgency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CustomStatus {
    Urgent,
    #[serde(rename = "priority_2")]
    #[value(name = "priority-2", alias = "priority_2")]
    Priority2,
    #[serde(rename = "priority_3")]
    #[value(name = "priority-3", alias = "priority_3")]
    Priority3,
    Done,
}

/// Traditional lifecycle stage, independent of urgency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TraditionalStatus {
    Todo,
    #[value(name = "in-progress", alias = "in_progress")]
    InProgress,
    Done,
}

/// Priority ranking used with the traditional axis. Serialised as its 1-4
/// integer value for compatibility with existing stores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
#[serde(into = "u8", try_from = "u8")]
pub enum PriorityLevel {
    #[value(alias = "1")]
    Low,
    #[value(alias = "2")]
    Medium,
    #[value(alias = "3")]
    High,
    #[value(alias = "4")]
    Urgent,
}

/// Which status system a caller wants to operate in.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StatusMode {
    Custom,
    Traditional,
}

impl CustomStatus {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            CustomStatus::Urgent => "Urgent",
            CustomStatus::Priority2 => "Priority 2",
            CustomStatus::Priority3 => "Priority 3",
            CustomStatus::Done => "Done",
        }
    }

    /// Colour classification for presentation layers.
    pub fn color(self) -> &'static str {
        match self {
            CustomStatus::Urgent => "red",
            CustomStatus::Priority2 => "yellow",
            CustomStatus::Priority3 => "blue",
            CustomStatus::Done => "green",
        }
    }
}

impl TraditionalStatus {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            TraditionalStatus::Todo => "To Do",
            TraditionalStatus::InProgress => "In Progress",
            TraditionalStatus::Done => "Done",
        }
    }

    /// Colour classification for presentation layers.
    pub fn color(self) -> &'static str {
        match self {
            TraditionalStatus::Todo => "gray",
            TraditionalStatus::InProgress => "blue",
            TraditionalStatus::Done => "green",
        }
    }
}

impl PriorityLevel {
    /// Numeric value (1=Low .. 4=Urgent).
    pub fn value(self) -> u8 {
        match self {
            PriorityLevel::Low => 1,
            PriorityLevel::Medium => 2,
            PriorityLevel::High => 3,
            PriorityLevel::Urgent => 4,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            PriorityLevel::Low => "Low",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::High => "High",
            PriorityLevel::Urgent => "Urgent",
        }
    }

    /// Colour classification for presentation layers.
    pub fn color(self) -> &'static str {
        match self {
            PriorityLevel::Low => "gray",
            PriorityLevel::Medium => "blue",
            PriorityLevel::High => "yellow",
            PriorityLevel::Urgent => "red",
        }
    }
}

impl From<PriorityLevel> for u8 {
    fn from(p: PriorityLevel) -> u8 {
        p.value()
    }
}

impl TryFrom<u8> for PriorityLevel {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        parse_priority_level(n as i64).ok_or_else(|| format!("invalid priority level: {n}"))
    }
}

/// Parse a custom status string. Total, never panics; anything outside the
/// closed set yields `None`.
pub fn parse_custom_status(s: &str) -> Option<CustomStatus> {
    match s.trim().to_lowercase().as_str() {
        "urgent" => Some(CustomStatus::Urgent),
        "priority_2" | "priority-2" => Some(CustomStatus::Priority2),
        "priority_3" | "priority-3" => Some(CustomStatus::Priority3),
        "done" => Some(CustomStatus::Done),
        _ => None,
    }
}

/// Parse a traditional status string. Total, never panics.
pub fn parse_traditional_status(s: &str) -> Option<TraditionalStatus> {
    match s.trim().to_lowercase().as_str() {
        "todo" => Some(TraditionalStatus::Todo),
        "in_progress" | "in-progress" => Some(TraditionalStatus::InProgress),
        "done" => Some(TraditionalStatus::Done),
        _ => None,
    }
}

/// Parse a numeric priority level. Values outside 1-4 yield `None`.
pub fn parse_priority_level(n: i64) -> Option<PriorityLevel> {
    match n {
        1 => Some(PriorityLevel::Low),
        2 => Some(PriorityLevel::Medium),
        3 => Some(PriorityLevel::High),
        4 => Some(PriorityLevel::Urgent),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_custom_status() {
        assert_eq!(parse_custom_status("urgent"), Some(CustomStatus::Urgent));
        assert_eq!(parse_custom_status("priority_2"), Some(CustomStatus::Priority2));
        assert_eq!(parse_custom_status("priority-3"), Some(CustomStatus::Priority3));
        assert_eq!(parse_custom_status("Done"), Some(CustomStatus::Done));
        assert_eq!(parse_custom_status("todo"), None);
        assert_eq!(parse_custom_status("in_progress"), None);
        assert_eq!(parse_custom_status("invalid"), None);
    }

    #[test]
    fn test_parse_traditional_status() {
        assert_eq!(parse_traditional_status("todo"), Some(TraditionalStatus::Todo));
        assert_eq!(
            parse_traditional_status("in_progress"),
            Some(TraditionalStatus::InProgress)
        );
        assert_eq!(parse_traditional_status("done"), Some(TraditionalStatus::Done));
        assert_eq!(parse_traditional_status("urgent"), None);
        assert_eq!(parse_traditional_status("priority_2"), None);
        assert_eq!(parse_traditional_status(""), None);
    }

    #[test]
    fn test_parse_priority_level() {
        assert_eq!(parse_priority_level(1), Some(PriorityLevel::Low));
        assert_eq!(parse_priority_level(2), Some(PriorityLevel::Medium));
        assert_eq!(parse_priority_level(3), Some(PriorityLevel::High));
        assert_eq!(parse_priority_level(4), Some(PriorityLevel::Urgent));
        assert_eq!(parse_priority_level(0), None);
        assert_eq!(parse_priority_level(5), None);
        assert_eq!(parse_priority_level(-1), None);
    }

    #[test]
    fn test_priority_level_serialises_as_integer() {
        let json = serde_json::to_string(&PriorityLevel::High).unwrap();
        assert_eq!(json, "3");
        let back: PriorityLevel = serde_json::from_str("4").unwrap();
        assert_eq!(back, PriorityLevel::Urgent);
        assert!(serde_json::from_str::<PriorityLevel>("7").is_err());
    }

    #[test]
    fn test_custom_status_wire_names() {
        let json = serde_json::to_string(&CustomStatus::Priority2).unwrap();
        assert_eq!(json, "\"priority_2\"");
        let back: CustomStatus = serde_json::from_str("\"priority_3\"").unwrap();
        assert_eq!(back, CustomStatus::Priority3);
    }

    #[test]
    fn test_labels_and_colors_are_total() {
        for s in [
            CustomStatus::Urgent,
            CustomStatus::Priority2,
            CustomStatus::Priority3,
            CustomStatus::Done,
        ] {
            assert!(!s.label().is_empty());
            assert!(!s.color().is_empty());
        }
        for s in [
            TraditionalStatus::Todo,
            TraditionalStatus::InProgress,
            TraditionalStatus::Done,
        ] {
            assert!(!s.label().is_empty());
            assert!(!s.color().is_empty());
        }
        for p in [
            PriorityLevel::Low,
            PriorityLevel::Medium,
            PriorityLevel::High,
            PriorityLevel::Urgent,
        ] {
            assert!(!p.label().is_empty());
            assert!(!p.color().is_empty());
        }
    }
}
