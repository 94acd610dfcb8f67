//! Page-by-page collection with rate-limit backoff.
//!
//! All requests of one operation go out strictly in sequence. The only
//! suspension points are the caller's inter-page delay and the wait for a
//! rate-limit window to reset; both are `tokio` sleeps, so other tasks keep
//! running while one operation waits.

use chrono::Utc;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::models::SearchPage;
use crate::rate_limit;
use crate::transport::{RequestDescriptor, ResponseDescriptor, Transport};

/// Largest `per_page` the GitHub API honours.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Items gathered across pages, in page order.
///
/// When the loop stopped because of an error, `interruption` holds it and
/// `items` holds what had been collected up to that point.
#[derive(Debug)]
pub struct Collected<T> {
    pub items: Vec<T>,
    pub interruption: Option<ClientError>,
}

impl<T> Collected<T> {
    fn complete(items: Vec<T>) -> Self {
        Collected {
            items,
            interruption: None,
        }
    }

    fn partial(items: Vec<T>, err: ClientError) -> Self {
        Collected {
            items,
            interruption: Some(err),
        }
    }

    pub fn is_partial(&self) -> bool {
        self.interruption.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The items, or the interruption if the collection is partial.
    pub fn into_result(self) -> Result<Vec<T>> {
        match self.interruption {
            Some(err) => Err(err),
            None => Ok(self.items),
        }
    }
}

pub fn validate_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ClientError::InvalidArgument(format!(
            "page size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, page_size
        )));
    }
    Ok(())
}

/// Send `request` until the answer is not an exhausted rate limit.
///
/// `max_retries` caps how many rate-limit waits are taken; `None` waits as
/// often as the server asks. Successful responses are returned, every other
/// non-2xx becomes [`ClientError::PermissionOrClient`].
pub async fn send_admitted<P>(
    transport: &P,
    request: &RequestDescriptor,
    max_retries: Option<u32>,
) -> Result<ResponseDescriptor>
where
    P: Transport + ?Sized,
{
    let mut retries: u32 = 0;

    loop {
        let response = transport.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let now = Utc::now().timestamp();
        let state = rate_limit::interpret(&response, now);
        let wait = state.and_then(|s| s.wait_from(now));

        match (state, wait) {
            (Some(state), Some(wait)) => {
                if max_retries.is_some_and(|max| retries >= max) {
                    return Err(ClientError::RateLimitExhausted {
                        reset_epoch: state.reset_epoch,
                    });
                }
                retries += 1;
                warn!(
                    "Rate limit reached on {} page {:?}. Waiting {} seconds...",
                    request.endpoint(),
                    request.page(),
                    wait.as_secs()
                );
                sleep(wait).await;
            }
            _ => {
                return Err(ClientError::PermissionOrClient {
                    status: response.status(),
                    message: response.error_message(),
                });
            }
        }
    }
}

/// Collect at most `max_items` search results.
///
/// Page 1 is fetched first; its `total_count` fixes how many pages are
/// requested for the rest of the operation, even if the upstream total
/// changes later. `delay` is slept between successful pages, not after the
/// last one.
pub async fn collect_bounded<P, T>(
    transport: &P,
    request: &RequestDescriptor,
    page_size: u32,
    max_items: usize,
    delay: Duration,
) -> Result<Collected<T>>
where
    P: Transport + ?Sized,
    T: DeserializeOwned,
{
    validate_page_size(page_size)?;

    let mut items: Vec<T> = Vec::new();
    if max_items == 0 {
        return Ok(Collected::complete(items));
    }

    let mut total_pages: u32 = 1;
    let mut page: u32 = 1;

    while page <= total_pages {
        let page_request = request.at_page(page);
        let result = match send_admitted(transport, &page_request, None).await {
            Ok(response) => response.json::<SearchPage<T>>(),
            Err(err) => Err(err),
        };
        let body = match result {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    "Stopping {} at page {} with {} items: {}",
                    request.endpoint(),
                    page,
                    items.len(),
                    err
                );
                items.truncate(max_items);
                return Ok(Collected::partial(items, err));
            }
        };

        if page == 1 {
            let wanted = body.total_count.min(max_items as u64);
            total_pages = wanted.div_ceil(page_size as u64) as u32;
            debug!(
                "{} reports {} results, fetching {} pages",
                request.endpoint(),
                body.total_count,
                total_pages
            );
        }

        if body.incomplete_results {
            warn!(
                "{} page {} timed out upstream; results may be incomplete",
                request.endpoint(),
                page
            );
        }

        let count = body.items.len();
        items.extend(body.items);
        info!("Collected {} results from {} page {}", count, request.endpoint(), page);

        if items.len() >= max_items || page >= total_pages {
            break;
        }

        sleep(delay).await;
        page += 1;
    }

    items.truncate(max_items);
    Ok(Collected::complete(items))
}

/// Collect every item of a listing that signals its end with a short page.
pub async fn collect_exhaustive<P, T>(
    transport: &P,
    request: &RequestDescriptor,
    page_size: u32,
) -> Result<Collected<T>>
where
    P: Transport + ?Sized,
    T: DeserializeOwned,
{
    validate_page_size(page_size)?;

    let mut items: Vec<T> = Vec::new();
    let mut page: u32 = 1;

    loop {
        let page_request = request.at_page(page);
        let result = match send_admitted(transport, &page_request, None).await {
            Ok(response) => response.json::<Vec<T>>(),
            Err(err) => Err(err),
        };
        let batch = match result {
            Ok(batch) => batch,
            Err(err) => {
                warn!(
                    "Stopping {} at page {} with {} items: {}",
                    request.endpoint(),
                    page,
                    items.len(),
                    err
                );
                return Ok(Collected::partial(items, err));
            }
        };

        let count = batch.len();
        items.extend(batch);
        info!("Collected {} items from {} page {}", count, request.endpoint(), page);

        if count < page_size as usize {
            debug!("No more pages for {}", request.endpoint());
            break;
        }
        page += 1;
    }

    Ok(Collected::complete(items))
}

/// Fetch a single object, retrying once after a rate-limit wait.
///
/// `Ok(None)` when the target does not exist.
pub async fn fetch_one<P, T>(transport: &P, request: &RequestDescriptor) -> Result<Option<T>>
where
    P: Transport + ?Sized,
    T: DeserializeOwned,
{
    match send_admitted(transport, request, Some(1)).await {
        Ok(response) => Ok(Some(response.json()?)),
        Err(ClientError::PermissionOrClient { status, .. }) if status == StatusCode::NOT_FOUND => {
            debug!("{} not found", request.endpoint());
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_bounds() {
        assert!(validate_page_size(1).is_ok());
        assert!(validate_page_size(MAX_PAGE_SIZE).is_ok());
        assert!(matches!(
            validate_page_size(0),
            Err(ClientError::InvalidArgument(_))
        ));
        assert!(matches!(
            validate_page_size(MAX_PAGE_SIZE + 1),
            Err(ClientError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_partial_into_result() {
        let partial: Collected<u32> =
            Collected::partial(vec![1, 2], ClientError::Transport("reset".into()));
        assert!(partial.is_partial());
        assert_eq!(partial.len(), 2);
        assert!(matches!(partial.into_result(), Err(ClientError::Transport(_))));

        let complete = Collected::complete(vec![1, 2, 3]);
        assert!(!complete.is_partial());
        assert_eq!(complete.into_result().unwrap(), vec![1, 2, 3]);
    }
}
