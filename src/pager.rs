//! Auto-paginating results for list RPCs.
//!
//! A pager is single-pass: it is seeded with the first response at
//! construction and reissues the list call with `page_token` threaded in
//! whenever the buffer runs dry, preserving every other request field and
//! the original call options. It ends when the server returns an empty
//! token and the buffer is drained.
//!
//! ```ignore
//! let mut models = client.list_models(args, CallOptions::new()).await?;
//! while let Some(model) = models.next().await {
//!     println!("{}", model?.name);
//! }
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use futures_core::Stream;

use crate::call;
use crate::config::CallShared;
use crate::descriptor::PagedMethod;
use crate::errors::Result;
use crate::options::CallOptions;
use crate::transport::Transport;

/// Cooperative-async pager over one list call.
pub struct ListPager<M: PagedMethod, T> {
    transport: Arc<T>,
    shared: CallShared,
    request: M::Request,
    options: CallOptions,
    items: VecDeque<M::Item>,
    next_token: String,
    exhausted: bool,
}

impl<M, T> ListPager<M, T>
where
    M: PagedMethod,
    T: Transport,
{
    /// Issues the first list call and seeds the pager with its response.
    pub(crate) async fn start(
        transport: Arc<T>,
        shared: CallShared,
        request: M::Request,
        options: CallOptions,
    ) -> Result<Self> {
        let response = call::invoke::<M, T>(
            transport.as_ref(),
            &shared,
            request.clone(),
            options.clone(),
        )
        .await?;
        let next_token = M::next_page_token(&response).to_string();
        let exhausted = next_token.is_empty();
        Ok(Self {
            transport,
            shared,
            request,
            options,
            items: M::into_items(response).into(),
            next_token,
            exhausted,
        })
    }

    /// Next item, fetching further pages as needed. `None` once the listing
    /// is exhausted; a failed page fetch yields the error and ends the
    /// pager.
    pub async fn next(&mut self) -> Option<Result<M::Item>> {
        loop {
            if let Some(item) = self.items.pop_front() {
                return Some(Ok(item));
            }
            if self.exhausted {
                return None;
            }
            if let Err(error) = self.fetch_next_page().await {
                self.exhausted = true;
                return Some(Err(error));
            }
        }
    }

    /// Next non-empty page of items. The first call returns the page the
    /// pager was seeded with.
    pub async fn next_page(&mut self) -> Option<Result<Vec<M::Item>>> {
        while self.items.is_empty() {
            if self.exhausted {
                return None;
            }
            if let Err(error) = self.fetch_next_page().await {
                self.exhausted = true;
                return Some(Err(error));
            }
        }
        Some(Ok(self.items.drain(..).collect()))
    }

    /// Adapts the pager into a [`Stream`] of items.
    pub fn into_stream(self) -> impl Stream<Item = Result<M::Item>> + Send {
        futures_util::stream::unfold(self, |mut pager| async move {
            pager.next().await.map(|item| (item, pager))
        })
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        M::set_page_token(&mut self.request, std::mem::take(&mut self.next_token));
        let response = call::invoke::<M, T>(
            self.transport.as_ref(),
            &self.shared,
            self.request.clone(),
            self.options.clone(),
        )
        .await?;
        self.next_token = M::next_page_token(&response).to_string();
        self.exhausted = self.next_token.is_empty();
        self.items.extend(M::into_items(response));
        Ok(())
    }
}

/// Blocking mirror of [`ListPager`], iterable directly.
#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub struct BlockingListPager<M: PagedMethod, T> {
    transport: Arc<T>,
    shared: CallShared,
    request: M::Request,
    options: CallOptions,
    items: VecDeque<M::Item>,
    next_token: String,
    exhausted: bool,
}

#[cfg(feature = "blocking")]
impl<M, T> BlockingListPager<M, T>
where
    M: PagedMethod,
    T: crate::transport::BlockingTransport,
{
    pub(crate) fn start(
        transport: Arc<T>,
        shared: CallShared,
        request: M::Request,
        options: CallOptions,
    ) -> Result<Self> {
        let response = call::invoke_blocking::<M, T>(
            transport.as_ref(),
            &shared,
            request.clone(),
            options.clone(),
        )?;
        let next_token = M::next_page_token(&response).to_string();
        let exhausted = next_token.is_empty();
        Ok(Self {
            transport,
            shared,
            request,
            options,
            items: M::into_items(response).into(),
            next_token,
            exhausted,
        })
    }

    /// Next non-empty page of items. The first call returns the page the
    /// pager was seeded with.
    pub fn next_page(&mut self) -> Option<Result<Vec<M::Item>>> {
        while self.items.is_empty() {
            if self.exhausted {
                return None;
            }
            if let Err(error) = self.fetch_next_page() {
                self.exhausted = true;
                return Some(Err(error));
            }
        }
        Some(Ok(self.items.drain(..).collect()))
    }

    fn fetch_next_page(&mut self) -> Result<()> {
        M::set_page_token(&mut self.request, std::mem::take(&mut self.next_token));
        let response = call::invoke_blocking::<M, T>(
            self.transport.as_ref(),
            &self.shared,
            self.request.clone(),
            self.options.clone(),
        )?;
        self.next_token = M::next_page_token(&response).to_string();
        self.exhausted = self.next_token.is_empty();
        self.items.extend(M::into_items(response));
        Ok(())
    }
}

#[cfg(feature = "blocking")]
impl<M, T> Iterator for BlockingListPager<M, T>
where
    M: PagedMethod,
    T: crate::transport::BlockingTransport,
{
    type Item = Result<M::Item>;

    fn next(&mut self) -> Option<Result<M::Item>> {
        loop {
            if let Some(item) = self.items.pop_front() {
                return Some(Ok(item));
            }
            if self.exhausted {
                return None;
            }
            if let Err(error) = self.fetch_next_page() {
                self.exhausted = true;
                return Some(Err(error));
            }
        }
    }
}
