//! Periodic pin usage report

use defmt::*;
use embassy_futures::select::select;
use embassy_time::{Duration, Ticker};

use pinguard_core::config::ChannelGrants;
use pinguard_core::report::UsageReport;

use crate::channels::{REGISTRY, REPORT_REQUEST};

/// Report interval
const REPORT_INTERVAL_SECS: u64 = 30;

/// Status task
///
/// Logs the registry contents every `REPORT_INTERVAL_SECS`, or right away
/// when `REPORT_REQUEST` is signaled. Holds the channel blocks granted at
/// boot so each one is listed with its owner.
#[embassy_executor::task]
pub async fn status_task(grants: ChannelGrants) {
    info!("Status task started");

    let mut ticker = Ticker::every(Duration::from_secs(REPORT_INTERVAL_SECS));

    loop {
        select(ticker.next(), REPORT_REQUEST.wait()).await;

        let report = REGISTRY.with(|r| UsageReport::capture(r));
        info!(
            "{}: {}/{} pins, {}/{} channels",
            report.platform.as_str(),
            report.pins.len(),
            report.pin_count,
            report.channels_used(),
            report.channel_count
        );
        for usage in &report.pins {
            debug!("  gpio{} {} ({})", usage.pin, usage.owner.label(), usage.owner);
        }
        for (owner, block) in &grants {
            debug!(
                "  pwm{}..{} {}",
                block.start(),
                block.start() + block.count(),
                owner.label()
            );
        }
    }
}
