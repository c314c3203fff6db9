//! Live checks against the real provider APIs.
//!
//! All tests are `#[ignore]` because they require network access and are
//! subject to public rate limits. Provider and base URL come from `.env`
//! (`PRICE_CALENDAR_PROVIDER`, `PRICE_CALENDAR_API_URL`) when present.
//!
//! Run: cargo test --test live_provider -- --ignored --nocapture

use price_calendar::prelude::*;

fn live_client() -> TrackerClient {
    dotenvy::dotenv().ok();
    TrackerClientBuilder::from_env()
        .expect("valid PRICE_CALENDAR_* environment")
        .build()
        .expect("client")
}

#[tokio::test]
#[ignore]
async fn live_refresh_cycle() {
    let scheduler = RefreshScheduler::new(live_client(), RefreshConfig::default());

    let outcome = scheduler.refresh().await;
    println!("   Outcome: {:?}", outcome);

    let state = scheduler.state().await;
    let snapshot = state.snapshot().expect("live refresh should succeed");
    println!(
        "   {} {} ({} up / {} down this year)",
        snapshot.instrument.display_name,
        snapshot.current.price,
        snapshot.year.up_days,
        snapshot.year.down_days
    );
    println!("   {}", snapshot.last_updated_label());

    assert_eq!(snapshot.week.real_cells().len(), 7);
    assert!(snapshot.year.real_cells().len() >= 360);
}

#[tokio::test]
#[ignore]
async fn live_year_history_is_ordered() {
    let client = live_client();
    let eth = client.instruments().get("ethereum").unwrap();

    let series = client.prices().year(&eth).await.unwrap();
    println!("   {} points for {}", series.len(), eth.id);

    assert!(series
        .points()
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));
}
