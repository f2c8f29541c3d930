use serde::{Deserialize, Serialize};

/// Day of the week a task was worked on. Weeks start on Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        Weekday::ALL.into_iter().find(|d| d.to_db_str() == s)
    }

    /// Zero-based offset from the start of the week (Sunday = 0).
    pub fn offset(&self) -> u64 {
        match self {
            Weekday::Sunday => 0,
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_is_sunday_first() {
        assert_eq!(Weekday::ALL[0], Weekday::Sunday);
        assert!(Weekday::Sunday < Weekday::Saturday);
    }

    #[test]
    fn offsets_follow_declaration_order() {
        for (i, d) in Weekday::ALL.iter().enumerate() {
            assert_eq!(d.offset() as usize, i);
        }
    }

    #[test]
    fn unknown_day_is_rejected() {
        assert_eq!(Weekday::from_db_str("monday"), Some(Weekday::Monday));
        assert_eq!(Weekday::from_db_str("mon"), None);
        assert!(serde_json::from_str::<Weekday>("\"funday\"").is_err());
    }
}
