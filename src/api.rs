use reqwest::Client;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::info;

use crate::cleaning::parse_day_first;
use crate::config::Endpoint;
use crate::error::{FetchError, LoadError};
use crate::history::{DrawSeries, build_series};
use crate::types::{CurrentDrawPayload, LatestDraw, Numbers, RawTable};
use crate::workbook::read_workbook;

/// Fetches and decodes the latest official draw.
pub async fn fetch_latest_draw(client: &Client, endpoint: &Endpoint) -> Result<LatestDraw, FetchError> {
    let body = fetch_bytes(client, endpoint).await?;
    let draw = decode_latest_draw(&body).map_err(|reason| FetchError::Malformed {
        url: endpoint.url.clone(),
        reason,
    })?;
    info!("🎯 Latest draw: contest {} ({})", draw.contest_number, draw.drawn_numbers);
    Ok(draw)
}

/// Fetches the results workbook and decodes its first sheet.
pub async fn fetch_history_table(client: &Client, endpoint: &Endpoint) -> Result<RawTable, FetchError> {
    let body = fetch_bytes(client, endpoint).await?;
    read_workbook(body).map_err(|e| FetchError::Malformed {
        url: endpoint.url.clone(),
        reason: e.to_string(),
    })
}

/// Fetches the workbook and builds the cleaned draw series from it.
pub async fn fetch_draw_series(client: &Client, endpoint: &Endpoint) -> Result<DrawSeries, LoadError> {
    let table = fetch_history_table(client, endpoint).await?;
    Ok(build_series(table)?)
}

async fn fetch_bytes(client: &Client, endpoint: &Endpoint) -> Result<Vec<u8>, FetchError> {
    info!("🔍 GET {}", endpoint.url);
    let failed = |e: reqwest::Error| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: endpoint.url.clone(),
                seconds: endpoint.timeout.as_secs(),
            }
        } else {
            FetchError::Transport {
                url: endpoint.url.clone(),
                source: e,
            }
        }
    };

    let response = client
        .get(&endpoint.url)
        .timeout(endpoint.timeout)
        .send()
        .await
        .map_err(failed)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: endpoint.url.clone(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(failed)?;
    Ok(body.to_vec())
}

/// Decodes the current-draw JSON body.
pub fn decode_latest_draw(body: &[u8]) -> Result<LatestDraw, String> {
    let payload: CurrentDrawPayload = serde_json::from_slice(body).map_err(|e| e.to_string())?;

    let values = payload
        .drawn_numbers
        .iter()
        .map(|n| n.value())
        .collect::<Option<Vec<u32>>>()
        .ok_or_else(|| "listaDezenas holds a non-numeric entry".to_string())?;
    let drawn_numbers = Numbers::from_values(values)
        .ok_or_else(|| "listaDezenas must hold six distinct numbers in 1..=60".to_string())?;

    let next_estimated_prize = Decimal::from_f64(payload.next_estimated_prize)
        .filter(|prize| !prize.is_sign_negative())
        .ok_or_else(|| {
            format!(
                "valorEstimadoProximoConcurso is not a valid amount: {}",
                payload.next_estimated_prize
            )
        })?;

    Ok(LatestDraw {
        contest_number: payload.contest_number,
        draw_date: parse_day_first(&payload.draw_date),
        drawn_numbers,
        next_estimated_prize,
        accumulated: payload.accumulated,
    })
}
