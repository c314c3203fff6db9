//! End-to-end tests: `TrackerClient` and `RefreshScheduler` against a
//! scripted local server standing in for the market-data provider.
//!
//! Run: cargo test --test tracker_integration

mod common;

use common::{coingecko_route, closed_port_url, market_chart, rising_year, MockServer, Reply, DAY_MS, T0};
use futures_util::StreamExt;
use price_calendar::error::USER_FACING_FAILURE;
use price_calendar::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const WEEK: [f64; 8] = [100.0, 110.0, 105.0, 105.0, 120.0, 90.0, 95.0, 100.0];

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "price-calendar-it-{}-{}-{}",
        name,
        std::process::id(),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ))
}

async fn coingecko_server() -> MockServer {
    let week = market_chart(&WEEK);
    let year = rising_year();
    MockServer::start(move |path| {
        let coin = if path.contains("ethereum") { "ethereum" } else { "bitcoin" };
        coingecko_route(path, coin, &week, &year)
    })
    .await
}

fn client_for(server: &MockServer) -> TrackerClientBuilder {
    TrackerClient::builder()
        .base_url(&server.url)
        .retry(RetryPolicy::None)
}

// ── Cache ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn year_history_is_cached_until_ttl() {
    let server = coingecko_server().await;
    let clock = ManualClock::new(T0);
    let client = client_for(&server)
        .clock(Arc::new(clock.clone()))
        .build()
        .unwrap();
    let btc = client.instruments().get("bitcoin").unwrap();

    let first = client.prices().year(&btc).await.unwrap();
    let second = client.prices().year(&btc).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 366);
    assert_eq!(server.hits("days=365"), 1);

    clock.advance_ms(60 * 60 * 1000 - 1);
    client.prices().year(&btc).await.unwrap();
    assert_eq!(server.hits("days=365"), 1);

    clock.advance_ms(2);
    client.prices().year(&btc).await.unwrap();
    assert_eq!(server.hits("days=365"), 2);
}

#[tokio::test]
async fn week_history_is_never_cached() {
    let server = coingecko_server().await;
    let client = client_for(&server).build().unwrap();
    let btc = client.instruments().get("bitcoin").unwrap();

    client.prices().week(&btc).await.unwrap();
    client.prices().week(&btc).await.unwrap();

    assert_eq!(server.hits("days=7&"), 2);
}

#[tokio::test]
async fn file_store_serves_year_history_offline() {
    let dir = temp_dir("offline");
    let server = coingecko_server().await;
    let online = client_for(&server)
        .store(Arc::new(FileStore::new(&dir)))
        .build()
        .unwrap();
    let btc = online.instruments().get("bitcoin").unwrap();
    let fetched = online.prices().year(&btc).await.unwrap();

    let offline = TrackerClient::builder()
        .base_url(&closed_port_url().await)
        .retry(RetryPolicy::None)
        .store(Arc::new(FileStore::new(&dir)))
        .build()
        .unwrap();
    assert_eq!(offline.prices().year(&btc).await.unwrap(), fetched);
    assert!(offline.prices().week(&btc).await.is_err());

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn invalidate_forces_refetch() {
    let server = coingecko_server().await;
    let client = client_for(&server).build().unwrap();
    let btc = client.instruments().get("bitcoin").unwrap();

    client.prices().year(&btc).await.unwrap();
    client.prices().invalidate_year(&btc).unwrap();
    client.prices().year(&btc).await.unwrap();

    assert_eq!(server.hits("days=365"), 2);
}

// ── Scheduler ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_publishes_ready_snapshot() {
    let server = coingecko_server().await;
    let clock = ManualClock::new(T0 + 9 * 60 * 60 * 1000);
    let client = client_for(&server)
        .clock(Arc::new(clock.clone()))
        .build()
        .unwrap();
    let scheduler = RefreshScheduler::new(client, RefreshConfig::default());

    assert_eq!(
        scheduler.refresh().await,
        RefreshOutcome::Rendered { generation: 0 }
    );

    let state = scheduler.state().await;
    let snapshot = state.snapshot().expect("ready");
    assert_eq!(snapshot.instrument.id.as_str(), "bitcoin");
    assert_eq!(snapshot.current.price, dec("67123.456"));
    assert_eq!(snapshot.current.change_24h, Some(dec("1.5")));
    assert_eq!(snapshot.last_updated, clock.now());

    // 110 105 105 120 90 95 100
    let week = &snapshot.week;
    assert_eq!(week.cells.len(), 7);
    assert_eq!(week.leading_padding, 0);
    assert_eq!(week.cells[0].direction, Direction::Neutral);
    assert_eq!(week.cells[0].price, Some(dec("110")));
    assert_eq!(week.up_days, 4);
    assert_eq!(week.down_days, 2);

    let year = &snapshot.year;
    assert_eq!(year.real_cells().len(), 365);
    assert_eq!(year.up_days, 364);
    assert_eq!(year.down_days, 0);
    assert!(year.leading_padding < 7);
}

#[tokio::test]
async fn server_error_publishes_uniform_failure() {
    let server = MockServer::start(|_| Reply::status(500)).await;
    let client = client_for(&server).build().unwrap();
    let scheduler = RefreshScheduler::new(client, RefreshConfig::default());

    let outcome = scheduler.refresh().await;

    assert_eq!(
        outcome,
        RefreshOutcome::Failed {
            generation: 0,
            message: USER_FACING_FAILURE.to_string()
        }
    );
    assert_eq!(
        scheduler.state().await,
        DashboardState::Failed {
            message: "Failed to load data. Please try again later.".to_string()
        }
    );
}

#[tokio::test]
async fn malformed_payload_publishes_same_failure() {
    let week = json!({ "prices": [[T0 - DAY_MS, 100.0], [T0, "abc"]] });
    let year = rising_year();
    let server = MockServer::start(move |path| coingecko_route(path, "bitcoin", &week, &year)).await;
    let client = client_for(&server).build().unwrap();
    let scheduler = RefreshScheduler::new(client, RefreshConfig::default());

    scheduler.refresh().await;

    assert_eq!(
        scheduler.state().await,
        DashboardState::Failed {
            message: USER_FACING_FAILURE.to_string()
        }
    );
}

#[tokio::test]
async fn failure_replaces_previous_snapshot() {
    let broken = Arc::new(AtomicBool::new(false));
    let week = market_chart(&WEEK);
    let year = rising_year();
    let flag = broken.clone();
    let server = MockServer::start(move |path| {
        if flag.load(Ordering::SeqCst) {
            Reply::status(503)
        } else {
            coingecko_route(path, "bitcoin", &week, &year)
        }
    })
    .await;
    let client = client_for(&server).build().unwrap();
    let scheduler = RefreshScheduler::new(client, RefreshConfig::default());

    scheduler.refresh().await;
    assert!(scheduler.state().await.snapshot().is_some());

    broken.store(true, Ordering::SeqCst);
    scheduler.refresh().await;
    assert!(matches!(
        scheduler.state().await,
        DashboardState::Failed { .. }
    ));
}

#[tokio::test]
async fn timer_refresh_skipped_while_cycle_in_flight() {
    let week = market_chart(&WEEK);
    let year = rising_year();
    let server = MockServer::start(move |path| {
        coingecko_route(path, "bitcoin", &week, &year).delayed(Duration::from_millis(200))
    })
    .await;
    let client = client_for(&server).build().unwrap();
    let scheduler = RefreshScheduler::new(client, RefreshConfig::default());

    let (first, second) = tokio::join!(scheduler.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(scheduler.is_refreshing());
        scheduler.refresh().await
    });

    assert_eq!(first, RefreshOutcome::Rendered { generation: 0 });
    assert_eq!(second, RefreshOutcome::Skipped);
    assert!(!scheduler.is_refreshing());
    // current + week + year, once
    assert_eq!(server.requests().len(), 3);
}

#[tokio::test]
async fn instrument_switch_supersedes_stale_cycle() {
    let week = market_chart(&WEEK);
    let year = rising_year();
    let server = MockServer::start(move |path| {
        let coin = if path.contains("ethereum") { "ethereum" } else { "bitcoin" };
        let reply = coingecko_route(path, coin, &week, &year);
        if coin == "bitcoin" {
            reply.delayed(Duration::from_millis(300))
        } else {
            reply
        }
    })
    .await;
    let client = client_for(&server).build().unwrap();
    let scheduler = RefreshScheduler::new(client, RefreshConfig::default());

    let (stale, switched) = tokio::join!(scheduler.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.select_instrument("ethereum").await
    });

    assert_eq!(stale, RefreshOutcome::Superseded { generation: 0 });
    assert_eq!(switched.unwrap(), RefreshOutcome::Rendered { generation: 1 });
    assert_eq!(scheduler.generation(), 1);

    let state = scheduler.state().await;
    assert_eq!(state.snapshot().unwrap().instrument.id.as_str(), "ethereum");
}

#[tokio::test]
async fn unknown_instrument_leaves_state_untouched() {
    let server = coingecko_server().await;
    let client = client_for(&server).build().unwrap();
    let scheduler = RefreshScheduler::new(client, RefreshConfig::default());
    scheduler.refresh().await;

    let err = scheduler.select_instrument("dogecoin").await.unwrap_err();

    assert!(matches!(err, TrackerError::UnknownInstrument(_)));
    assert_eq!(scheduler.generation(), 0);
    assert!(scheduler.state().await.snapshot().is_some());
}

#[tokio::test]
async fn selection_survives_restart() {
    let dir = temp_dir("selection");
    let server = coingecko_server().await;
    let first = client_for(&server)
        .store(Arc::new(FileStore::new(&dir)))
        .build()
        .unwrap();
    RefreshScheduler::new(first, RefreshConfig::default())
        .select_instrument("ethereum")
        .await
        .unwrap();

    let second = client_for(&server)
        .store(Arc::new(FileStore::new(&dir)))
        .build()
        .unwrap();
    assert_eq!(
        second.instruments().selected().await.id.as_str(),
        "ethereum"
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn run_refreshes_on_interval() {
    let server = coingecko_server().await;
    let client = client_for(&server).build().unwrap();
    let scheduler = RefreshScheduler::new(
        client,
        RefreshConfig {
            interval: Duration::from_millis(50),
        },
    );

    let outcomes: Vec<RefreshOutcome> = scheduler.run().take(2).collect().await;

    assert_eq!(
        outcomes,
        vec![
            RefreshOutcome::Rendered { generation: 0 },
            RefreshOutcome::Rendered { generation: 0 },
        ]
    );
    assert_eq!(server.hits("/simple/price"), 2);
    assert_eq!(server.hits("days=365"), 1);
}

// ── Binance ──────────────────────────────────────────────────────────────────

fn klines(closes: &[&str]) -> serde_json::Value {
    let start = T0 - (closes.len() as i64 - 1) * DAY_MS;
    let rows: Vec<serde_json::Value> = closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let open_time = start + i as i64 * DAY_MS;
            json!([open_time, "1.0", "2.0", "0.5", close, "1000.0", open_time + DAY_MS - 1])
        })
        .collect();
    json!(rows)
}

#[tokio::test]
async fn binance_provider_end_to_end() {
    let server = MockServer::start(|path| {
        if path.starts_with("/ticker/24hr") {
            Reply::json(json!({ "symbol": "BTCUSDT", "lastPrice": "67000.10", "priceChangePercent": "-2.500" }))
        } else if path.contains("limit=8") {
            Reply::json(klines(&["1", "2", "3", "2", "2", "5", "4", "6"]))
        } else if path.contains("limit=366") {
            let closes: Vec<String> = (0..366).map(|i| (100 + i).to_string()).collect();
            let refs: Vec<&str> = closes.iter().map(String::as_str).collect();
            Reply::json(klines(&refs))
        } else {
            Reply::status(400)
        }
    })
    .await;
    let client = client_for(&server)
        .provider(Provider::Binance)
        .build()
        .unwrap();
    let scheduler = RefreshScheduler::new(client, RefreshConfig::default());

    assert_eq!(
        scheduler.refresh().await,
        RefreshOutcome::Rendered { generation: 0 }
    );
    let state = scheduler.state().await;
    let snapshot = state.snapshot().unwrap();

    assert_eq!(snapshot.current.price, dec("67000.10"));
    assert_eq!(snapshot.current.change_24h, Some(dec("-2.500")));
    assert_eq!(snapshot.current.change_direction(), Some(Direction::Down));
    // 2 3 2 2 5 4 6
    assert_eq!(snapshot.week.up_days, 4);
    assert_eq!(snapshot.week.down_days, 2);
    assert_eq!(snapshot.year.up_days, 364);
    assert_eq!(server.hits("symbol=BTCUSDT"), 3);
}
