//! Typed task fields and their display classes.
//!
//! This module defines the priority and status types carried by every task,
//! together with the pure mappings that derive a severity band, a color tone
//! and an icon from them.

use std::fmt;

use clap::ValueEnum;

/// Rank of a task. Lower values sort first.
///
/// The remote table stores priorities as text; they are parsed once at the
/// record boundary (see [`crate::task::TaskRecord`]) and carried as a plain
/// integer from then on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub u32);

impl Priority {
    /// Parse a wire value. `None` means the value was absent or not a
    /// non-negative integer.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u32>().ok().map(Priority)
    }

    /// The priority that ranks directly after this one.
    pub fn next(self) -> Self {
        Priority(self.0.saturating_add(1))
    }

    /// Severity band used to color the priority badge.
    pub fn band(self) -> PriorityBand {
        match self.0 {
            7.. => PriorityBand::High,
            4..=6 => PriorityBand::Medium,
            _ => PriorityBand::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity class of a priority value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityBand {
    High,
    Medium,
    Low,
}

/// Workflow status of a task.
///
/// Three labels are recognised; anything else is kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Done,
    Other(String),
}

impl Status {
    pub const PENDING_LABEL: &'static str = "Pendente";
    pub const IN_PROGRESS_LABEL: &'static str = "Em Andamento";
    pub const DONE_LABEL: &'static str = "Concluído";

    /// Case-insensitive match against the recognised labels.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "pendente" => Status::Pending,
            "em andamento" => Status::InProgress,
            "concluído" => Status::Done,
            _ => Status::Other(raw.to_string()),
        }
    }

    /// Label written back to the store and shown in the UI.
    pub fn label(&self) -> &str {
        match self {
            Status::Pending => Self::PENDING_LABEL,
            Status::InProgress => Self::IN_PROGRESS_LABEL,
            Status::Done => Self::DONE_LABEL,
            Status::Other(raw) => raw,
        }
    }

    /// Whether this is one of the labels the creation form offers.
    pub fn is_known(&self) -> bool {
        !matches!(self, Status::Other(_))
    }

    /// The statuses offered by the creation form, in selector order.
    pub fn choices() -> [Status; 3] {
        [Status::Pending, Status::InProgress, Status::Done]
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Color class derived from a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Brand,
    Danger,
    Neutral,
}

/// Icon variant derived from a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    Done,
    InProgress,
    Pending,
    Unknown,
}

/// Text tone for a (possibly missing) status.
pub fn status_tone(status: Option<&Status>) -> StatusTone {
    match status {
        Some(Status::Done) => StatusTone::Success,
        Some(Status::InProgress) => StatusTone::Brand,
        Some(Status::Pending) => StatusTone::Danger,
        Some(Status::Other(_)) | None => StatusTone::Neutral,
    }
}

/// Icon for a (possibly missing) status.
pub fn status_icon(status: Option<&Status>) -> StatusIcon {
    match status {
        Some(Status::Done) => StatusIcon::Done,
        Some(Status::InProgress) => StatusIcon::InProgress,
        Some(Status::Pending) => StatusIcon::Pending,
        Some(Status::Other(_)) | None => StatusIcon::Unknown,
    }
}

/// Status values accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum StatusArg {
    #[value(alias = "pending")]
    Pendente,
    #[value(alias = "in-progress")]
    EmAndamento,
    #[value(alias = "done")]
    Concluido,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pendente => Status::Pending,
            StatusArg::EmAndamento => Status::InProgress,
            StatusArg::Concluido => Status::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_ignores_case() {
        assert_eq!(Status::parse("Concluído"), Status::Done);
        assert_eq!(Status::parse("concluído"), Status::Done);
        assert_eq!(Status::parse("CONCLUÍDO"), Status::Done);
        assert_eq!(Status::parse("EM ANDAMENTO"), Status::InProgress);
        assert_eq!(Status::parse("pendente"), Status::Pending);
        assert_eq!(Status::parse("Unknown"), Status::Other("Unknown".to_string()));
        // Labels are not trimmed.
        assert_eq!(Status::parse(" Pendente"), Status::Other(" Pendente".to_string()));
    }

    #[test]
    fn test_status_label_keeps_raw_text() {
        assert_eq!(Status::parse("concluído").label(), "Concluído");
        assert_eq!(Status::parse("Bloqueado").label(), "Bloqueado");
    }

    #[test]
    fn test_done_variants_share_tone_and_icon() {
        for raw in ["Concluído", "concluído", "CONCLUÍDO"] {
            let status = Status::parse(raw);
            assert_eq!(status_tone(Some(&status)), StatusTone::Success);
            assert_eq!(status_icon(Some(&status)), StatusIcon::Done);
        }
    }

    #[test]
    fn test_unknown_and_missing_status_fall_back() {
        let unknown = Status::parse("Unknown");
        assert_eq!(status_tone(Some(&unknown)), StatusTone::Neutral);
        assert_eq!(status_icon(Some(&unknown)), StatusIcon::Unknown);
        assert_eq!(status_tone(None), StatusTone::Neutral);
        assert_eq!(status_icon(None), StatusIcon::Unknown);
    }

    #[test]
    fn test_known_status_tones() {
        assert_eq!(status_tone(Some(&Status::InProgress)), StatusTone::Brand);
        assert_eq!(status_icon(Some(&Status::InProgress)), StatusIcon::InProgress);
        assert_eq!(status_tone(Some(&Status::Pending)), StatusTone::Danger);
        assert_eq!(status_icon(Some(&Status::Pending)), StatusIcon::Pending);
    }

    #[test]
    fn test_priority_bands() {
        for p in 0..=3 {
            assert_eq!(Priority(p).band(), PriorityBand::Low);
        }
        for p in 4..=6 {
            assert_eq!(Priority(p).band(), PriorityBand::Medium);
        }
        assert_eq!(Priority(7).band(), PriorityBand::High);
        assert_eq!(Priority(42).band(), PriorityBand::High);
        assert_eq!(Priority::default().band(), PriorityBand::Low);
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!(Priority::parse("7"), Some(Priority(7)));
        assert_eq!(Priority::parse(" 12 "), Some(Priority(12)));
        assert_eq!(Priority::parse("-1"), None);
        assert_eq!(Priority::parse("alta"), None);
        assert_eq!(Priority::parse(""), None);
    }

    #[test]
    fn test_status_arg_maps_to_known_status() {
        assert_eq!(Status::from(StatusArg::EmAndamento), Status::InProgress);
        assert!(Status::from(StatusArg::Concluido).is_known());
    }
}
