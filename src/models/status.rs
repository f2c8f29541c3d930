use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a timesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Draft,
        Status::Submitted,
        Status::Approved,
        Status::Rejected,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Submitted => "submitted",
            Status::Approved => "approved",
            Status::Rejected => "rejected",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Status::Draft),
            "submitted" => Some(Status::Submitted),
            "approved" => Some(Status::Approved),
            "rejected" => Some(Status::Rejected),
            _ => None,
        }
    }

    /// Statuses a contractor may request for their own timesheet.
    pub fn is_contractor_status(&self) -> bool {
        matches!(self, Status::Draft | Status::Submitted)
    }

    /// The status a timesheet must currently hold for a contractor to move it to `self`.
    ///
    /// The contractor side of the lifecycle is a two-state toggle:
    /// `draft` ← `submitted` and `submitted` ← `draft`.
    pub fn contractor_predecessor(&self) -> Option<Status> {
        match self {
            Status::Draft => Some(Status::Submitted),
            Status::Submitted => Some(Status::Draft),
            Status::Approved | Status::Rejected => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
