use anyhow::Result;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use megasena::{
    PrizeSummary, RECENT_DRAWS, flag_recent_draws, prize_timeline, score_tickets,
};

use crate::session::Session;

pub struct DrawUseCase {
    session: Arc<Session>,
}

impl DrawUseCase {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub async fn get_latest_draw(&self, _arguments: &HashMap<String, Value>) -> Result<String> {
        let draw = self.session.latest_draw().await?;

        Ok(json!({
            "success": true,
            "draw": &*draw
        }).to_string())
    }

    pub async fn add_ticket(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let numbers = arguments
            .get("numbers")
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow::anyhow!("Missing numbers parameter"))?;

        let fields: Vec<String> = numbers.iter().map(raw_field).collect();

        let mut book = self.session.tickets.lock().await;
        let response = match book.submit(&fields) {
            Ok(ticket) => json!({
                "success": true,
                "ticket": ticket.key(),
                "message": format!("Ticket added: {}", ticket)
            }),
            Err(e) => json!({
                "success": false,
                "error": e.code(),
                "message": e.to_string()
            }),
        };

        Ok(response.to_string())
    }

    pub async fn list_tickets(&self, _arguments: &HashMap<String, Value>) -> Result<String> {
        let tickets = self.session.tickets.lock().await.tickets().to_vec();
        if tickets.is_empty() {
            return Ok(json!({
                "success": true,
                "draw": null,
                "tickets": []
            }).to_string());
        }

        let draw = self.session.latest_draw().await?;
        let scores = score_tickets(&tickets, &draw.drawn_numbers);

        Ok(json!({
            "success": true,
            "contest_number": draw.contest_number,
            "tickets": scores
        }).to_string())
    }
}

// Text fields pass through; JSON numbers are read as their decimal text.
fn raw_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

pub struct HistoryUseCase {
    session: Arc<Session>,
}

impl HistoryUseCase {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    fn contest_range(arguments: &HashMap<String, Value>, bounds: (u32, u32)) -> (u32, u32) {
        let bound = |key: &str, default: u32| {
            arguments
                .get(key)
                .and_then(|v| v.as_u64())
                .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
                .unwrap_or(default)
        };
        (bound("min_contest", bounds.0), bound("max_contest", bounds.1))
    }

    pub async fn get_prize_summary(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let series = self.session.history().await?;
        let bounds = series
            .bounds()
            .ok_or_else(|| anyhow::anyhow!("The results sheet has no draws"))?;
        let (lo, hi) = Self::contest_range(arguments, bounds);
        let (lo, hi) = series.clamp(lo, hi).unwrap_or(bounds);

        let summary = PrizeSummary::compute(series.range(lo, hi)?)?;

        Ok(json!({
            "success": true,
            "min_contest": lo,
            "max_contest": hi,
            "summary": summary
        }).to_string())
    }

    pub async fn get_prize_timeline(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let series = self.session.history().await?;
        let bounds = series
            .bounds()
            .ok_or_else(|| anyhow::anyhow!("The results sheet has no draws"))?;
        let (lo, hi) = Self::contest_range(arguments, bounds);
        let (lo, hi) = series.clamp(lo, hi).unwrap_or(bounds);

        let points = prize_timeline(series.range(lo, hi)?);

        Ok(json!({
            "success": true,
            "min_contest": lo,
            "max_contest": hi,
            "points": points
        }).to_string())
    }

    pub async fn get_recent_draws(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let limit = arguments
            .get("limit")
            .and_then(|v| v.as_u64())
            .map(|l| l as usize)
            .unwrap_or(RECENT_DRAWS);

        let draw = self.session.latest_draw().await?;
        let series = self.session.history().await?;
        let recent = flag_recent_draws(&series, &draw.drawn_numbers, limit);

        Ok(json!({
            "success": true,
            "latest_contest": draw.contest_number,
            "draws": recent
        }).to_string())
    }
}
