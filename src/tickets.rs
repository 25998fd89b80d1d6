use std::collections::HashSet;
use std::fmt;
use tracing::info;

use crate::error::TicketError;
use crate::types::{BALLS_PER_DRAW, MAX_NUMBER, MIN_NUMBER, Numbers};

/// A validated pick of six numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub numbers: Numbers,
}

impl Ticket {
    pub fn key(&self) -> String {
        self.numbers.key()
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.numbers, f)
    }
}

// Anything that is not a plain run of ASCII digits reads as the unfilled sentinel 0.
fn parse_field(raw: &str) -> u32 {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    // All digits but too long for u32: definitely out of range.
    raw.parse().unwrap_or(u32::MAX)
}

/// Validates six raw text fields into a ticket.
///
/// Checks run in a fixed order and the first failing one wins: unfilled
/// fields, then the 1..=60 range, then repeats.
pub fn validate_ticket<S: AsRef<str>>(inputs: &[S]) -> Result<Ticket, TicketError> {
    if inputs.len() != BALLS_PER_DRAW {
        return Err(TicketError::MissingDigits);
    }
    let values: Vec<u32> = inputs.iter().map(|s| parse_field(s.as_ref())).collect();

    if values.contains(&0) {
        return Err(TicketError::MissingDigits);
    }
    if values.iter().any(|n| !(MIN_NUMBER..=MAX_NUMBER).contains(n)) {
        return Err(TicketError::OutOfRange);
    }
    if values.iter().collect::<HashSet<_>>().len() < BALLS_PER_DRAW {
        return Err(TicketError::DuplicateNumbers);
    }

    Numbers::from_values(values)
        .map(|numbers| Ticket { numbers })
        .ok_or(TicketError::DuplicateNumbers)
}

/// Append-only list of the tickets entered during one session.
#[derive(Debug, Default)]
pub struct TicketBook {
    tickets: Vec<Ticket>,
}

impl TicketBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends. A rejected submission leaves the book untouched.
    pub fn submit<S: AsRef<str>>(&mut self, inputs: &[S]) -> Result<&Ticket, TicketError> {
        let ticket = validate_ticket(inputs)?;
        info!("🎟️ Ticket added: {}", ticket);
        self.tickets.push(ticket);
        Ok(&self.tickets[self.tickets.len() - 1])
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ticket_has_canonical_key() {
        let ticket = validate_ticket(&["1", "2", "3", "4", "5", "6"]).unwrap();
        assert_eq!(ticket.key(), "01-02-03-04-05-06");

        let ticket = validate_ticket(&["60", "07", "33", "1", "12", "45"]).unwrap();
        assert_eq!(ticket.to_string(), "01-07-12-33-45-60");
    }

    #[test]
    fn zero_is_missing() {
        assert_eq!(
            validate_ticket(&["1", "2", "3", "4", "5", "0"]),
            Err(TicketError::MissingDigits)
        );
    }

    #[test]
    fn non_digits_are_missing() {
        for bad in ["", " 5", "x", "-3", "4.0"] {
            assert_eq!(
                validate_ticket(&["1", "2", "3", "4", "5", bad]),
                Err(TicketError::MissingDigits),
                "{bad:?}"
            );
        }
        assert_eq!(validate_ticket(&["1", "2", "3"]), Err(TicketError::MissingDigits));
    }

    #[test]
    fn out_of_range() {
        assert_eq!(
            validate_ticket(&["1", "2", "3", "4", "5", "61"]),
            Err(TicketError::OutOfRange)
        );
        assert_eq!(
            validate_ticket(&["1", "2", "3", "4", "5", "99999999999"]),
            Err(TicketError::OutOfRange)
        );
    }

    #[test]
    fn duplicates() {
        assert_eq!(
            validate_ticket(&["1", "1", "2", "3", "4", "5"]),
            Err(TicketError::DuplicateNumbers)
        );
    }

    #[test]
    fn checks_follow_priority_order() {
        // Missing beats out-of-range beats duplicate.
        assert_eq!(
            validate_ticket(&["0", "61", "61", "4", "5", "6"]),
            Err(TicketError::MissingDigits)
        );
        assert_eq!(
            validate_ticket(&["61", "61", "2", "3", "4", "5"]),
            Err(TicketError::OutOfRange)
        );
    }

    #[test]
    fn errors_have_distinct_messages() {
        let messages: HashSet<String> = [
            TicketError::MissingDigits,
            TicketError::OutOfRange,
            TicketError::DuplicateNumbers,
        ]
        .iter()
        .map(|e| e.to_string())
        .collect();
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn book_only_grows_on_valid_submissions() {
        let mut book = TicketBook::new();
        assert!(book.is_empty());

        book.submit(&["6", "5", "4", "3", "2", "1"]).unwrap();
        assert!(book.submit(&["1", "1", "2", "3", "4", "5"]).is_err());
        book.submit(&["10", "20", "30", "40", "50", "60"]).unwrap();
        book.submit(&["1", "2", "3", "4", "5", "6"]).unwrap();

        let keys: Vec<String> = book.tickets().iter().map(Ticket::key).collect();
        assert_eq!(
            keys,
            vec!["01-02-03-04-05-06", "10-20-30-40-50-60", "01-02-03-04-05-06"]
        );
        assert_eq!(book.len(), 3);
    }
}
