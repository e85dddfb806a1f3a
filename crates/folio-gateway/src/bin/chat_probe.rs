//! Chat probe: concurrent visitors asking Eve questions against a running gateway.
//! Reports success rate, latency and how many answers came back as the no-reply fallback.
//! Run with gateway up: cargo run --bin chat_probe
//! Target: FOLIO_PROBE_URL (default http://127.0.0.1:5000)

use folio_core::NO_REPLY_FALLBACK;
use futures_util::future::join_all;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Instant;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const CONCURRENT_VISITORS: usize = 5;
const QUESTIONS_PER_VISITOR: usize = 4;

const QUESTIONS: &[&str] = &[
    "Who are you?",
    "What are your main skills?",
    "Tell me about your featured projects.",
    "Where have you worked before?",
    "What did you study?",
    "Which technologies do you use for the backend?",
    "How can I contact you?",
];

#[derive(Default)]
struct VisitorTally {
    ok: u32,
    fallback: u32,
    failed: u32,
    latencies_ms: Vec<u64>,
}

async fn visitor(client: Client, base_url: String, visitor_id: usize) -> VisitorTally {
    let mut tally = VisitorTally::default();
    for q in 0..QUESTIONS_PER_VISITOR {
        let question = QUESTIONS[(visitor_id + q) % QUESTIONS.len()];
        let start = Instant::now();
        let res = client
            .post(format!("{}/api/chat", base_url))
            .json(&json!({ "message": question }))
            .send()
            .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match res {
            Ok(resp) if resp.status().is_success() => {
                tally.latencies_ms.push(elapsed_ms);
                let body: Value = resp.json().await.unwrap_or(Value::Null);
                if body["response"].as_str() == Some(NO_REPLY_FALLBACK) {
                    tally.fallback += 1;
                } else {
                    tally.ok += 1;
                }
            }
            Ok(resp) => {
                eprintln!("[CHAT PROBE] visitor {} got {}", visitor_id, resp.status());
                tally.failed += 1;
            }
            Err(e) => {
                eprintln!("[CHAT PROBE] visitor {} request error: {}", visitor_id, e);
                tally.failed += 1;
            }
        }
    }
    tally
}

#[tokio::main]
async fn main() {
    let base_url = std::env::var("FOLIO_PROBE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    println!(
        "[CHAT PROBE] {} visitors x {} questions = {} chats against {}",
        CONCURRENT_VISITORS,
        QUESTIONS_PER_VISITOR,
        CONCURRENT_VISITORS * QUESTIONS_PER_VISITOR,
        base_url
    );

    let client = Client::new();
    let tallies = join_all(
        (0..CONCURRENT_VISITORS).map(|id| visitor(client.clone(), base_url.clone(), id)),
    )
    .await;

    let ok: u32 = tallies.iter().map(|t| t.ok).sum();
    let fallback: u32 = tallies.iter().map(|t| t.fallback).sum();
    let failed: u32 = tallies.iter().map(|t| t.failed).sum();
    let mut latencies: Vec<u64> = tallies.into_iter().flat_map(|t| t.latencies_ms).collect();
    latencies.sort_unstable();

    let total = ok + fallback + failed;
    let success_rate = if total > 0 {
        f64::from(ok + fallback) / f64::from(total) * 100.0
    } else {
        0.0
    };
    let avg_ms = if latencies.is_empty() {
        0.0
    } else {
        latencies.iter().sum::<u64>() as f64 / latencies.len() as f64
    };
    let p95_ms = latencies
        .get((latencies.len() * 95 / 100).min(latencies.len().saturating_sub(1)))
        .copied()
        .unwrap_or(0);

    println!(
        "[CHAT PROBE] Success: {:.1}% | Avg latency: {:.0}ms | p95: {}ms",
        success_rate, avg_ms, p95_ms
    );
    println!(
        "[CHAT PROBE] Total: {} | Answered: {} | Fallback: {} | Failed: {}",
        total, ok, fallback, failed
    );
}
