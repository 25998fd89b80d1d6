use crate::history::{PrizeSummary, TimelinePoint};
use crate::scoring::{RecentDraw, TicketScore};
use crate::types::{DrawRecord, LatestDraw};
use crate::utils::{format_brl, format_draw_date};

pub fn render_latest_draw(draw: &LatestDraw) -> String {
    let mut text = String::new();
    text.push_str(&format!(
        "📢 Contest {} – {}\n",
        draw.contest_number,
        format_draw_date(draw.draw_date)
    ));
    text.push_str(&format!(
        "🎯 Drawn numbers: {}\n",
        draw.drawn_numbers
            .as_slice()
            .iter()
            .map(|n| format!("{:02}", n))
            .collect::<Vec<_>>()
            .join(" - ")
    ));
    if draw.accumulated {
        text.push_str("🔁 No jackpot winner, prize accumulated\n");
    }
    text.push_str(&format!(
        "💰 Estimated prize for next contest: {}\n",
        format_brl(draw.next_estimated_prize)
    ));
    text
}

pub fn render_summary(summary: &PrizeSummary, range: (u32, u32)) -> String {
    let mut text = String::new();
    text.push_str(&format!(
        "📌 Contests {} to {} ({} draws)\n",
        range.0, range.1, summary.draws
    ));
    text.push_str(&format!(
        "   🏆 Highest estimated prize: {}\n",
        format_brl(summary.max_estimated_prize)
    ));
    text.push_str(&format!(
        "   📈 Mean estimated prize:    {}\n",
        format_brl(summary.mean_estimated_prize)
    ));
    text.push_str(&format!(
        "   🔁 Accumulated contests:    {}\n",
        summary.accumulated_draws
    ));
    text
}

pub fn render_history_table(records: &[DrawRecord]) -> String {
    let mut text = format!(
        "{:>8}  {:<10}  {:>22}  {:>22}\n",
        "Contest", "Date", "Estimated prize", "Accumulated (6)"
    );
    for record in records {
        text.push_str(&format!(
            "{:>8}  {:<10}  {:>22}  {:>22}\n",
            record.contest_number,
            format_draw_date(record.draw_date),
            format_brl(record.estimated_prize),
            format_brl(record.accumulated_prize)
        ));
    }
    text
}

pub fn render_timeline(points: &[TimelinePoint]) -> String {
    points
        .iter()
        .map(|p| format!("{}\t{}\n", p.contest_number, p.estimated_prize))
        .collect()
}

pub fn render_ticket_scores(scores: &[TicketScore]) -> String {
    if scores.is_empty() {
        return "No tickets entered.\n".to_string();
    }
    let mut text = String::new();
    for score in scores {
        if score.jackpot {
            text.push_str(&format!(
                "{}. 🟢 {}: {} matches 🎉\n",
                score.position, score.ticket, score.matches
            ));
        } else {
            text.push_str(&format!(
                "{}. {}: {} matches\n",
                score.position, score.ticket, score.matches
            ));
        }
    }
    text
}

pub fn render_recent_draws(draws: &[RecentDraw]) -> String {
    let mut text = String::new();
    for draw in draws {
        let marker = if draw.same_as_latest { "🟢" } else { "  " };
        text.push_str(&format!(
            "{} {:>6}  {:<10}  {}\n",
            marker,
            draw.contest_number,
            format_draw_date(draw.draw_date),
            draw.drawn_numbers
        ));
    }
    text
}
