//! `pscraper scrape`: runs one or both marketplace streams and writes every
//! listing as a JSON object per line.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use futures::{pin_mut, StreamExt};
use pscraper_core::{AppConfig, VehicleListing};
use pscraper_scraper::marketplaces::autotrader;
use pscraper_scraper::{
    scrape, Autotrader, Cars, HttpFetcher, JsonLdSellerLocator, LogNotifier, MarketplaceSite,
    Notifier, SlackNotifier,
};
use reqwest::header::HeaderMap;

use crate::SiteArg;

/// # Errors
///
/// Returns an error if an HTTP client cannot be built or the output cannot be
/// written. Page failures end the affected marketplace's stream and are
/// reported through the notifier, not returned.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    target: SiteArg,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let notifier = build_notifier(config)?;
    let mut sink: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut total = 0;
    if matches!(target, SiteArg::Autotrader | SiteArg::All) {
        let fetcher = HttpFetcher::new(
            config.request_timeout_secs,
            &config.user_agent,
            autotrader::request_headers(),
            config.strict_http_status,
        )?;
        let locator = JsonLdSellerLocator::new(fetcher.clone(), config.autotrader_owner_url.clone());
        let site = Autotrader::new(config.autotrader_search_url.clone(), locator);
        total += write_listings(&site, &fetcher, notifier.as_ref(), &mut sink).await?;
    }
    if matches!(target, SiteArg::Cars | SiteArg::All) {
        let fetcher = HttpFetcher::new(
            config.request_timeout_secs,
            &config.user_agent,
            HeaderMap::new(),
            config.strict_http_status,
        )?;
        let site = Cars::new(config.cars_search_url.clone());
        total += write_listings(&site, &fetcher, notifier.as_ref(), &mut sink).await?;
    }

    sink.flush().context("failed to flush output")?;
    tracing::info!(listings = total, "scrape complete");
    Ok(())
}

fn build_notifier(config: &AppConfig) -> anyhow::Result<Box<dyn Notifier>> {
    match &config.slack_webhook_url {
        Some(url) => {
            let slack = SlackNotifier::new(url.clone(), config.request_timeout_secs)
                .context("failed to build Slack client")?;
            Ok(Box::new(slack))
        }
        None => {
            tracing::debug!("SLACK_WEBHOOK_URL not set, notifications go to the log");
            Ok(Box::new(LogNotifier))
        }
    }
}

async fn write_listings<S, W>(
    site: &S,
    fetcher: &HttpFetcher,
    notifier: &dyn Notifier,
    out: &mut W,
) -> anyhow::Result<u64>
where
    S: MarketplaceSite,
    W: Write + ?Sized,
{
    let listings = scrape(site, fetcher, notifier);
    pin_mut!(listings);

    let mut written = 0;
    while let Some(listing) = listings.next().await {
        write_listing(out, &listing)?;
        written += 1;
    }
    tracing::info!(marketplace = %site.marketplace(), listings = written, "marketplace scraped");
    Ok(written)
}

pub(crate) fn write_listing<W: Write + ?Sized>(
    out: &mut W,
    listing: &VehicleListing,
) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, listing).context("failed to serialize listing")?;
    out.write_all(b"\n").context("failed to write listing")?;
    Ok(())
}
