//! Pagination Driver: walks a marketplace's search pages and yields
//! normalized listings lazily.
//!
//! The returned stream fetches a page only when the consumer has drained the
//! previous one. Dropping it early stops all further requests.

use std::collections::VecDeque;
use std::ops::Range;

use futures::stream::{self, Stream};
use pscraper_core::VehicleListing;
use serde_json::Value;

use crate::cache::SellerCache;
use crate::error::{error_chain, PageError};
use crate::fetch::PageFetcher;
use crate::notify::Notifier;
use crate::site::MarketplaceSite;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    /// The probe page has not been fetched yet.
    Init,
    Paging,
    Done,
    /// A page failed; the failure was reported and no more pages are fetched.
    Aborted,
}

#[derive(Debug, Default, Clone, Copy)]
struct RunStats {
    pages_fetched: u32,
    listings_yielded: u64,
    records_rejected: u64,
}

/// State of one scrape, threaded through the stream.
struct ScrapeRun {
    state: RunState,
    pages: Range<u32>,
    pending: VecDeque<Value>,
    sellers: SellerCache,
    stats: RunStats,
}

/// Streams every valid listing of `site`, in page order.
///
/// The probe page is fetched first to size the result set, then each page in
/// the site's range. Records the site rejects are skipped. The first page
/// that cannot be fetched or decoded is reported once through `notifier` and
/// ends the stream; listings already yielded stand.
pub fn scrape<'a, S, F, N>(
    site: &'a S,
    fetcher: &'a F,
    notifier: &'a N,
) -> impl Stream<Item = VehicleListing> + Send + 'a
where
    S: MarketplaceSite + ?Sized,
    F: PageFetcher + ?Sized,
    N: Notifier + ?Sized,
{
    let run = ScrapeRun {
        state: RunState::Init,
        pages: 0..0,
        pending: VecDeque::new(),
        sellers: SellerCache::default(),
        stats: RunStats::default(),
    };
    stream::unfold(run, move |mut run| async move {
        let listing = run.next_listing(site, fetcher, notifier).await?;
        Some((listing, run))
    })
}

impl ScrapeRun {
    async fn next_listing<S, F, N>(
        &mut self,
        site: &S,
        fetcher: &F,
        notifier: &N,
    ) -> Option<VehicleListing>
    where
        S: MarketplaceSite + ?Sized,
        F: PageFetcher + ?Sized,
        N: Notifier + ?Sized,
    {
        loop {
            if let Some(raw) = self.pending.pop_front() {
                match site.normalize(raw, &mut self.sellers).await {
                    Ok(listing) => {
                        self.stats.listings_yielded += 1;
                        return Some(listing);
                    }
                    Err(reason) => {
                        self.stats.records_rejected += 1;
                        tracing::debug!(
                            marketplace = %site.marketplace(),
                            %reason,
                            "record rejected"
                        );
                        continue;
                    }
                }
            }

            match self.state {
                RunState::Init => {
                    let probe = site.probe_page();
                    match self.load_range(site, fetcher, probe).await {
                        Ok(pages) => {
                            tracing::debug!(
                                marketplace = %site.marketplace(),
                                first = pages.start,
                                end = pages.end,
                                "page range"
                            );
                            self.pages = pages;
                            self.state = RunState::Paging;
                        }
                        Err(err) => self.abort(site, notifier, probe, err).await,
                    }
                }
                RunState::Paging => match self.pages.next() {
                    Some(page) => {
                        if let Err(err) = self.load_page(site, fetcher, page).await {
                            self.abort(site, notifier, page, err).await;
                        }
                    }
                    None => {
                        self.state = RunState::Done;
                        self.finish(site);
                    }
                },
                RunState::Done | RunState::Aborted => return None,
            }
        }
    }

    async fn load_range<S, F>(
        &mut self,
        site: &S,
        fetcher: &F,
        probe: u32,
    ) -> Result<Range<u32>, PageError>
    where
        S: MarketplaceSite + ?Sized,
        F: PageFetcher + ?Sized,
    {
        let payload = self.fetch_payload(site, fetcher, probe).await?;
        Ok(site.page_range(&payload)?)
    }

    async fn load_page<S, F>(&mut self, site: &S, fetcher: &F, page: u32) -> Result<(), PageError>
    where
        S: MarketplaceSite + ?Sized,
        F: PageFetcher + ?Sized,
    {
        let payload = self.fetch_payload(site, fetcher, page).await?;
        self.pending.extend(site.listings(payload)?);
        Ok(())
    }

    async fn fetch_payload<S, F>(
        &mut self,
        site: &S,
        fetcher: &F,
        page: u32,
    ) -> Result<Value, PageError>
    where
        S: MarketplaceSite + ?Sized,
        F: PageFetcher + ?Sized,
    {
        let html = fetcher.fetch(&site.page_url(page)).await?;
        self.stats.pages_fetched += 1;
        Ok(site.extract(&html)?)
    }

    async fn abort<S, N>(&mut self, site: &S, notifier: &N, page: u32, err: PageError)
    where
        S: MarketplaceSite + ?Sized,
        N: Notifier + ?Sized,
    {
        let marketplace = site.marketplace();
        tracing::error!(%marketplace, page, error = %err, "page failed, stopping scrape");
        let message = format!(
            "{} response error\n{}",
            marketplace.display_name(),
            error_chain(&err)
        );
        notifier.notify(&message).await;
        self.state = RunState::Aborted;
        self.pending.clear();
        self.finish(site);
    }

    fn finish<S: MarketplaceSite + ?Sized>(&self, site: &S) {
        tracing::info!(
            marketplace = %site.marketplace(),
            aborted = self.state == RunState::Aborted,
            pages_fetched = self.stats.pages_fetched,
            listings = self.stats.listings_yielded,
            rejected = self.stats.records_rejected,
            "scrape finished"
        );
    }
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
