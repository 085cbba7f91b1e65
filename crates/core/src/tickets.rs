//! Deterministic partitioning of the bank into fixed-size tickets.
//!
//! Tickets are never stored: ticket `n` is always the contiguous block
//! `[(n - 1) * size, min(n * size, len))` of the bank in bank order.

use std::ops::Range;

use crate::model::TicketNumber;

/// Number of tickets needed to cover `bank_size` questions.
///
/// Returns 0 for an empty bank, and also for a zero `ticket_size`, which has no
/// meaningful partition.
#[must_use]
pub fn ticket_count(bank_size: usize, ticket_size: usize) -> usize {
    if bank_size == 0 || ticket_size == 0 {
        return 0;
    }
    bank_size.div_ceil(ticket_size)
}

/// Index range of `ticket` inside a bank of `bank_size` questions.
///
/// The range is empty when the ticket starts at or past the end of the bank;
/// callers range-check ticket numbers against [`ticket_count`].
#[must_use]
pub fn ticket_range(ticket: TicketNumber, bank_size: usize, ticket_size: usize) -> Range<usize> {
    let start = ticket
        .index()
        .checked_mul(ticket_size)
        .unwrap_or(usize::MAX)
        .min(bank_size);
    let end = start.saturating_add(ticket_size).min(bank_size);
    start..end
}

/// The slice of `bank` that forms `ticket`.
#[must_use]
pub fn ticket_slice<T>(bank: &[T], ticket: TicketNumber, ticket_size: usize) -> &[T] {
    &bank[ticket_range(ticket, bank.len(), ticket_size)]
}

/// Every ticket of the bank with the number of questions it holds.
pub fn ticket_sizes(
    bank_size: usize,
    ticket_size: usize,
) -> impl Iterator<Item = (TicketNumber, usize)> {
    let count = u32::try_from(ticket_count(bank_size, ticket_size)).unwrap_or(u32::MAX);
    (1..=count).filter_map(move |n| {
        let ticket = TicketNumber::new(n)?;
        Some((ticket, ticket_range(ticket, bank_size, ticket_size).len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(n: u32) -> TicketNumber {
        TicketNumber::new(n).unwrap()
    }

    #[test]
    fn empty_bank_has_no_tickets() {
        assert_eq!(ticket_count(0, 60), 0);
        assert_eq!(ticket_count(0, 1), 0);
    }

    #[test]
    fn count_rounds_up() {
        assert_eq!(ticket_count(1, 60), 1);
        assert_eq!(ticket_count(60, 60), 1);
        assert_eq!(ticket_count(61, 60), 2);
        assert_eq!(ticket_count(3, 2), 2);
    }

    #[test]
    fn zero_ticket_size_yields_nothing() {
        assert_eq!(ticket_count(10, 0), 0);
        assert!(ticket_range(ticket(1), 10, 0).is_empty());
    }

    #[test]
    fn three_questions_in_tickets_of_two() {
        let bank = ["q0", "q1", "q2"];
        assert_eq!(ticket_count(bank.len(), 2), 2);
        assert_eq!(ticket_slice(&bank, ticket(1), 2), &["q0", "q1"]);
        assert_eq!(ticket_slice(&bank, ticket(2), 2), &["q2"]);
    }

    #[test]
    fn ticket_past_the_end_is_empty() {
        let bank = ["q0", "q1", "q2"];
        assert!(ticket_slice(&bank, ticket(3), 2).is_empty());
        assert!(ticket_slice(&bank, ticket(u32::MAX), usize::MAX).is_empty());
    }

    #[test]
    fn slices_partition_the_bank_exactly() {
        let bank: Vec<usize> = (0..137).collect();
        for size in [1, 2, 7, 60, 136, 137, 500] {
            let mut joined = Vec::new();
            for n in 1..=ticket_count(bank.len(), size) {
                let n = u32::try_from(n).unwrap();
                joined.extend_from_slice(ticket_slice(&bank, ticket(n), size));
            }
            assert_eq!(joined, bank, "ticket size {size}");
        }
    }

    #[test]
    fn sizes_report_short_last_ticket() {
        let sizes: Vec<_> = ticket_sizes(125, 60).map(|(t, len)| (t.value(), len)).collect();
        assert_eq!(sizes, vec![(1, 60), (2, 60), (3, 5)]);
    }
}
