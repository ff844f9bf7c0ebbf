use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Active,
    Suspended,
}

impl RecordStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(RecordStatus::Active),
            "SUSPENDED" => Some(RecordStatus::Suspended),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "ACTIVE",
            RecordStatus::Suspended => "SUSPENDED",
        }
    }
}

/// Timestamp writes produced by a status change. Empty means the save
/// leaves both audit columns untouched.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StatusStamps {
    pub activated_at: Option<DateTime<Utc>>,
    pub suspended_at: Option<DateTime<Utc>>,
    pub clear_suspended_at: bool,
}

/// Decides the audit stamps for a save. `previous` is None on first
/// creation; on update it is the status read inside the same transaction
/// as the write.
pub fn stamp_transition(
    previous: Option<RecordStatus>,
    next: RecordStatus,
    now: DateTime<Utc>,
) -> StatusStamps {
    match previous {
        None => match next {
            RecordStatus::Active => StatusStamps {
                activated_at: Some(now),
                ..Default::default()
            },
            RecordStatus::Suspended => StatusStamps {
                suspended_at: Some(now),
                ..Default::default()
            },
        },
        Some(prev) if prev == next => StatusStamps::default(),
        Some(_) => match next {
            RecordStatus::Active => StatusStamps {
                activated_at: Some(now),
                clear_suspended_at: true,
                ..Default::default()
            },
            RecordStatus::Suspended => StatusStamps {
                suspended_at: Some(now),
                ..Default::default()
            },
        },
    }
}
