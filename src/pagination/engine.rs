//! Generic pagination engine
//!
//! Fetches a page, decodes it into `Vec<T>`, hands every element to the
//! caller in server order and follows the next link until the server stops
//! sending one. Page N+1 is never requested before page N's elements have
//! been delivered.

use super::types::{CancelSignal, PageWalk, PaginationLimits};
use crate::decode::{decode_api_error, decode_page, EnvelopeFormat, Page};
use crate::error::{Error, Result};
use crate::http::{same_origin, Request, Response, Transport};
use crate::types::NextLinkPolicy;
use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Follows next links over a transport
#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a> {
    transport: &'a Transport,
    envelope: &'a EnvelopeFormat,
    limits: PaginationLimits,
    cancel: Option<&'a CancelSignal>,
}

impl<'a> Paginator<'a> {
    /// Create a paginator with default limits and no cancellation
    pub fn new(transport: &'a Transport, envelope: &'a EnvelopeFormat) -> Self {
        Self {
            transport,
            envelope,
            limits: PaginationLimits::default(),
            cancel: None,
        }
    }

    /// Set the pagination guards
    #[must_use]
    pub fn with_limits(mut self, limits: PaginationLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Abort between pages, and during in-flight requests, once `cancel` fires
    #[must_use]
    pub fn with_cancel(mut self, cancel: &'a CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Call `on_element` for every element of every page
    pub async fn for_each<T, F>(&self, start: &str, mut on_element: F) -> Result<()>
    where
        T: DeserializeOwned,
        F: FnMut(T),
    {
        self.try_for_each(start, |item| {
            on_element(item);
            Ok(())
        })
        .await
    }

    /// Like [`Paginator::for_each`], but an `Err` from the callback stops
    /// the walk and is returned unchanged
    pub async fn try_for_each<T, F>(&self, start: &str, mut on_element: F) -> Result<()>
    where
        T: DeserializeOwned,
        F: FnMut(T) -> Result<()>,
    {
        let mut walk = PageWalk::new(start);

        while let Some(page) = self.next_page::<T>(&mut walk).await? {
            for item in page.items {
                on_element(item)?;
            }
        }

        debug!(
            pages = walk.pages,
            items = walk.total_items,
            "Pagination complete"
        );
        Ok(())
    }

    /// Collect every element of every page
    pub async fn collect<T: DeserializeOwned>(&self, start: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        self.for_each(start, |item| items.push(item)).await?;
        Ok(items)
    }

    /// Stream of decoded pages
    pub fn pages<T>(&self, start: &str) -> impl Stream<Item = Result<Page<T>>> + 'a
    where
        T: DeserializeOwned + 'a,
    {
        let paginator = *self;
        stream::try_unfold(PageWalk::new(start), move |mut walk| async move {
            let page = paginator.next_page::<T>(&mut walk).await?;
            Ok::<_, Error>(page.map(|page| (page, walk)))
        })
    }

    /// Stream of elements across all pages
    pub fn items<T>(&self, start: &str) -> impl Stream<Item = Result<T>> + 'a
    where
        T: DeserializeOwned + 'a,
    {
        self.pages::<T>(start)
            .map_ok(|page| stream::iter(page.items.into_iter().map(Ok::<T, Error>)))
            .try_flatten()
    }

    /// Fetch and decode the next page of `walk`
    ///
    /// Returns `Ok(None)` once the previous page had no next link.
    pub async fn next_page<T: DeserializeOwned>(
        &self,
        walk: &mut PageWalk,
    ) -> Result<Option<Page<T>>> {
        let Some(path) = walk.next.take() else {
            return Ok(None);
        };

        if self.cancel.is_some_and(CancelSignal::is_cancelled) {
            return Err(Error::Cancelled);
        }

        let url = self.transport.resolve(&path);
        self.check_guards(walk, &url)?;
        walk.pages += 1;

        let response = self.fetch(&url).await?;
        if response.is_error() {
            return Err(decode_api_error(&response.url, response.status, &response.body).into());
        }

        let page: Page<T> = decode_page(&response.url, &response.body, self.envelope)?;
        walk.total_items += page.items.len() as u64;
        walk.next.clone_from(&page.next_link);

        debug!(
            page = walk.pages,
            items = page.items.len(),
            has_next = page.next_link.is_some(),
            "Fetched page"
        );
        Ok(Some(page))
    }

    fn check_guards(&self, walk: &mut PageWalk, url: &str) -> Result<()> {
        if let Some(max_pages) = self.limits.max_pages {
            if walk.pages >= max_pages {
                return Err(Error::PageLimitExceeded { max_pages });
            }
        }

        // The start path is the caller's choice; only server-supplied links are checked
        if walk.pages > 0
            && self.limits.next_link_policy == NextLinkPolicy::SameHost
            && !same_origin(url, self.transport.host())?
        {
            return Err(Error::UntrustedNextLink {
                url: url.to_string(),
            });
        }

        if self.limits.detect_cycles && !walk.visit(url) {
            return Err(Error::CursorCycle {
                url: url.to_string(),
            });
        }

        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<Response> {
        let request = Request::get(url);
        match self.cancel {
            Some(cancel) => tokio::select! {
                biased;
                () = cancel.cancelled() => Err(Error::Cancelled),
                response = self.transport.send(request) => response,
            },
            None => self.transport.send(request).await,
        }
    }
}
