use chrono::NaiveDate;
use serde::Serialize;

use crate::history::DrawSeries;
use crate::tickets::Ticket;
use crate::types::{BALLS_PER_DRAW, Numbers};

pub const RECENT_DRAWS: usize = 20;

/// Size of the intersection of two number sets, 0 to 6.
pub fn match_count(picked: &Numbers, drawn: &Numbers) -> u8 {
    (picked.mask() & drawn.mask()).count_ones() as u8
}

pub fn is_jackpot(matches: u8) -> bool {
    usize::from(matches) == BALLS_PER_DRAW
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketScore {
    pub position: usize,
    pub ticket: String,
    pub matches: u8,
    pub jackpot: bool,
}

/// Scores every ticket against one draw, keeping entry order (positions start at 1).
pub fn score_tickets(tickets: &[Ticket], drawn: &Numbers) -> Vec<TicketScore> {
    tickets
        .iter()
        .enumerate()
        .map(|(i, ticket)| {
            let matches = match_count(&ticket.numbers, drawn);
            TicketScore {
                position: i + 1,
                ticket: ticket.key(),
                matches,
                jackpot: is_jackpot(matches),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentDraw {
    pub contest_number: u32,
    pub draw_date: Option<NaiveDate>,
    pub drawn_numbers: Numbers,
    pub same_as_latest: bool,
}

/// The last `limit` historical draws, newest first, flagging any whose numbers
/// equal `latest`.
pub fn flag_recent_draws(series: &DrawSeries, latest: &Numbers, limit: usize) -> Vec<RecentDraw> {
    series
        .most_recent(limit)
        .map(|record| RecentDraw {
            contest_number: record.contest_number,
            draw_date: record.draw_date,
            drawn_numbers: record.drawn_numbers,
            same_as_latest: is_jackpot(match_count(&record.drawn_numbers, latest)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::validate_ticket;
    use crate::types::DrawRecord;
    use rust_decimal::Decimal;

    fn numbers(values: [u32; 6]) -> Numbers {
        Numbers::from_values(values).unwrap()
    }

    #[test]
    fn counts_intersection() {
        let ticket = numbers([1, 2, 3, 4, 5, 6]);
        assert_eq!(match_count(&ticket, &numbers([1, 2, 3, 7, 8, 9])), 3);
        assert_eq!(match_count(&ticket, &numbers([10, 20, 30, 40, 50, 60])), 0);
        assert_eq!(match_count(&ticket, &numbers([6, 5, 4, 3, 2, 1])), 6);
        assert!(is_jackpot(match_count(&ticket, &ticket)));
        assert!(!is_jackpot(5));
    }

    #[test]
    fn match_count_is_symmetric() {
        let a = numbers([1, 12, 23, 34, 45, 56]);
        let b = numbers([12, 13, 34, 35, 56, 57]);
        assert_eq!(match_count(&a, &b), match_count(&b, &a));
        assert_eq!(match_count(&a, &b), 3);
    }

    #[test]
    fn scores_keep_entry_order() {
        let drawn = numbers([4, 10, 29, 33, 41, 57]);
        let tickets = vec![
            validate_ticket(&["4", "10", "29", "33", "41", "57"]).unwrap(),
            validate_ticket(&["1", "2", "3", "4", "10", "60"]).unwrap(),
        ];
        let scores = score_tickets(&tickets, &drawn);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].position, 1);
        assert_eq!(scores[0].matches, 6);
        assert!(scores[0].jackpot);
        assert_eq!(scores[1].ticket, "01-02-03-04-10-60");
        assert_eq!(scores[1].matches, 2);
        assert!(!scores[1].jackpot);
    }

    #[test]
    fn flags_repeat_of_latest_draw() {
        let latest = numbers([4, 10, 29, 33, 41, 57]);
        let records = (1..=25)
            .map(|contest| DrawRecord {
                contest_number: contest,
                draw_date: None,
                estimated_prize: Decimal::ZERO,
                accumulated_prize: Decimal::ZERO,
                drawn_numbers: if contest == 22 {
                    latest
                } else {
                    numbers([1, 2, 3, 4, 5, (contest % 50) + 10])
                },
            })
            .collect();
        let series = DrawSeries::new(records).unwrap();

        let recent = flag_recent_draws(&series, &latest, RECENT_DRAWS);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].contest_number, 25);
        assert_eq!(recent[19].contest_number, 6);

        let flagged: Vec<u32> = recent
            .iter()
            .filter(|d| d.same_as_latest)
            .map(|d| d.contest_number)
            .collect();
        assert_eq!(flagged, vec![22]);
    }
}
