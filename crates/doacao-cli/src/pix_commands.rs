// SPDX-License-Identifier: Apache-2.0

use crate::{CliError, OutputMode};
use chrono::{DateTime, Utc};
use doacao_core::{Error, OsRandom, SystemClock};
use doacao_model::{Amount, PaymentStatus, TxId};
use doacao_pix::{build as build_code, decode, generate_txid, render_qr_data_uri, Field};
use doacao_settlement::{HttpStatusSource, SettlementWatcher, WatchConfig, WatchEvent};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub(crate) struct BuildArgs {
    pub key: String,
    pub name: String,
    pub city: String,
    pub amount: String,
    pub description: String,
    pub txid: Option<String>,
    pub qr: bool,
}

pub(crate) fn build(args: BuildArgs, output: OutputMode) -> Result<(), CliError> {
    let amount = Amount::parse(&args.amount)
        .map_err(|e| Error::validation(e.0).with_detail("field", "amount"))?;
    let txid = match args.txid {
        Some(raw) => {
            TxId::parse(&raw).map_err(|e| Error::validation(e.0).with_detail("field", "txid"))?
        }
        None => generate_txid(&OsRandom),
    };
    let code = build_code(
        &args.key,
        &args.description,
        &args.name,
        &args.city,
        amount,
        &txid,
    )
    .map_err(Error::from)?;
    debug!(payment_id = %txid, len = code.chars().count(), "code built");

    let qr = if args.qr {
        Some(render_qr_data_uri(&code).map_err(Error::from)?)
    } else {
        None
    };
    let mut human = code.clone();
    if let Some(uri) = &qr {
        human.push('\n');
        human.push_str(uri);
    }
    output.emit(
        &json!({
            "paymentId": txid.as_str(),
            "qrCodeText": code,
            "qrCodeImage": qr,
        }),
        &human,
    )
}

pub(crate) fn verify(code: &str, output: OutputMode) -> Result<(), CliError> {
    if !doacao_pix::verify(code.trim()) {
        return Err(Error::validation("checksum mismatch").into());
    }
    output.emit(&json!({"valid": true}), "checksum: OK")
}

fn field_json(field: &Field) -> Value {
    let nested = match field.tag.as_str() {
        "26" | "62" => field.nested(),
        _ => None,
    };
    json!({
        "tag": field.tag,
        "length": field.value.chars().count(),
        "value": field.value,
        "fields": nested.map(|fields| fields.iter().map(field_json).collect::<Vec<_>>()),
    })
}

fn field_lines(field: &Field, depth: usize, out: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    out.push(format!(
        "{indent}{} {:02} {}",
        field.tag,
        field.value.chars().count(),
        field.value
    ));
    if matches!(field.tag.as_str(), "26" | "62") {
        for child in field.nested().unwrap_or_default() {
            field_lines(&child, depth + 1, out);
        }
    }
}

pub(crate) fn inspect(code: &str, output: OutputMode) -> Result<(), CliError> {
    let decoded = decode(code.trim()).map_err(Error::from)?;
    let mut lines = Vec::new();
    for field in &decoded.fields {
        field_lines(field, 0, &mut lines);
    }
    lines.push(format!(
        "checksum: {}",
        if decoded.checksum_valid { "OK" } else { "MISMATCH" }
    ));
    output.emit(
        &json!({
            "checksumValid": decoded.checksum_valid,
            "fields": decoded.fields.iter().map(field_json).collect::<Vec<_>>(),
        }),
        &lines.join("\n"),
    )
}

pub(crate) struct WatchArgs {
    pub status_url: String,
    pub payment_id: String,
    pub expires_at: String,
    pub poll_interval_ms: u64,
    pub display_interval_ms: u64,
    pub timeout_ms: u64,
}

pub(crate) fn watch(args: WatchArgs, output: OutputMode) -> Result<(), CliError> {
    let payment_id = TxId::parse(&args.payment_id)
        .map_err(|e| Error::validation(e.0).with_detail("field", "payment_id"))?;
    let expires_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&args.expires_at)
        .map_err(|e| Error::validation(e.to_string()).with_detail("field", "expires_at"))?
        .with_timezone(&Utc);
    if args.poll_interval_ms == 0 || args.display_interval_ms == 0 {
        return Err(CliError::usage("intervals must be > 0"));
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::internal(e.to_string()))?;
    let source = Arc::new(HttpStatusSource::new(
        &args.status_url,
        Duration::from_millis(args.timeout_ms),
    ));
    let config = WatchConfig {
        display_interval: Duration::from_millis(args.display_interval_ms),
        poll_interval: Duration::from_millis(args.poll_interval_ms),
    };
    let watched = payment_id.clone();
    let status = runtime.block_on(async move {
        let watcher = SettlementWatcher::new(source, Arc::new(SystemClock), config);
        let (handle, mut events) = watcher.watch(watched.clone(), expires_at);
        info!(payment_id = %watched, %expires_at, "watching settlement");
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(WatchEvent::Tick(countdown)) => {
                        if !output.json {
                            eprintln!("{countdown}");
                        }
                    }
                    Some(WatchEvent::PollFailed(message)) => {
                        warn!(%message, "status poll failed");
                    }
                    Some(WatchEvent::Settled) | Some(WatchEvent::Expired) | None => {
                        break handle.finished().await;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    handle.abandon().await;
                    break handle.status().await;
                }
            }
        }
    });

    let label = match status {
        PaymentStatus::Settled => "settled",
        PaymentStatus::Expired => "expired",
        PaymentStatus::Abandoned => "abandoned",
        PaymentStatus::Pending => "pending",
    };
    output.emit(
        &json!({"paymentId": payment_id.as_str(), "status": label}),
        &format!("payment {payment_id}: {label}"),
    )
}
