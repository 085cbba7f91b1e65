use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One-based identifier of a ticket within the question bank.
///
/// Zero is not a valid ticket number, so the type cannot hold it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TicketNumber(u32);

impl TicketNumber {
    /// The first ticket of any non-empty bank.
    pub const FIRST: TicketNumber = TicketNumber(1);

    /// Creates a new `TicketNumber`, returning `None` for zero.
    #[must_use]
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Returns the underlying one-based value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Zero-based position of this ticket among all tickets.
    #[must_use]
    pub fn index(&self) -> usize {
        usize::try_from(self.0 - 1).unwrap_or(usize::MAX)
    }
}

impl fmt::Debug for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TicketNumber({})", self.0)
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TicketNumber> for u32 {
    fn from(value: TicketNumber) -> Self {
        value.0
    }
}

impl TryFrom<u32> for TicketNumber {
    type Error = ParseIdError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ParseIdError {
            kind: "TicketNumber".to_string(),
        })
    }
}

// ─── FromStr ───────────────────────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for TicketNumber {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(TicketNumber::new)
            .ok_or_else(|| ParseIdError {
                kind: "TicketNumber".to_string(),
            })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_not_a_ticket() {
        assert!(TicketNumber::new(0).is_none());
        assert!("0".parse::<TicketNumber>().is_err());
    }

    #[test]
    fn test_ticket_number_display() {
        let id = TicketNumber::new(7).unwrap();
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_ticket_number_from_str() {
        let id: TicketNumber = "12".parse().unwrap();
        assert_eq!(id, TicketNumber::new(12).unwrap());
        assert_eq!(id.index(), 11);
    }

    #[test]
    fn test_ticket_number_from_str_invalid() {
        assert!("ticket".parse::<TicketNumber>().is_err());
        assert!("-3".parse::<TicketNumber>().is_err());
    }

    #[test]
    fn serde_rejects_zero() {
        let parsed: TicketNumber = serde_json::from_str("3").unwrap();
        assert_eq!(parsed.value(), 3);
        assert!(serde_json::from_str::<TicketNumber>("0").is_err());
    }
}
