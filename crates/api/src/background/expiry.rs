//! Periodic expiry of overdue donations.
//!
//! Spawns a background task that resolves donations still sitting in a
//! non-terminal status after their campaign's deadline has passed: pending
//! payments become `failed`, open pledges become `cancelled`. Runs on a
//! fixed interval using `tokio::time::interval`.

use std::time::Duration;

use chrono::Utc;
use fundra_db::repositories::DonationRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Default grace period after the campaign deadline: 7 days.
const DEFAULT_GRACE_DAYS: i64 = 7;

/// Default sweep interval: 1 hour.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Run the donation expiry sweep loop.
///
/// Resolves overdue donations for campaigns whose deadline passed more than
/// `DONATION_EXPIRY_GRACE_DAYS` ago (defaults to 7). Runs until `cancel`
/// is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let grace_days: i64 = std::env::var("DONATION_EXPIRY_GRACE_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_GRACE_DAYS);

    let interval_secs: u64 = std::env::var("EXPIRY_SWEEP_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

    tracing::info!(grace_days, interval_secs, "Donation expiry sweep started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Donation expiry sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::days(grace_days);
                match DonationRepo::expire_overdue(&pool, cutoff).await {
                    Ok(counts) => {
                        if counts.payments_failed > 0 || counts.pledges_cancelled > 0 {
                            tracing::info!(
                                payments_failed = counts.payments_failed,
                                pledges_cancelled = counts.pledges_cancelled,
                                "Expiry sweep: resolved overdue donations"
                            );
                        } else {
                            tracing::debug!("Expiry sweep: nothing overdue");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Expiry sweep: failed");
                    }
                }
            }
        }
    }
}
