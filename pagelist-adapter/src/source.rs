use core::future::Future;

use pagelist::{FetchError, FetchTicket, Page, PageRequest};

/// The host's paginated fetch capability.
///
/// Implemented for any `Fn(PageRequest) -> impl Future<Output = Result<Page<T>, FetchError>>`,
/// so a closure around a REST client is enough.
pub trait PageSource<T> {
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Page<T>, FetchError>>;
}

impl<T, F, Fut> PageSource<T> for F
where
    F: Fn(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, FetchError>>,
{
    fn fetch_page(
        &self,
        request: PageRequest,
    ) -> impl Future<Output = Result<Page<T>, FetchError>> {
        self(request)
    }
}

/// A finished fetch, ready for [`crate::Controller::on_fetched`].
#[derive(Clone, Debug)]
pub struct Fetched<T> {
    pub ticket: FetchTicket,
    pub result: Result<Page<T>, FetchError>,
}

/// Issues `ticket`'s request against `source` right away and resolves once it completes.
///
/// The returned future borrows only the source, so the controller stays free while it is
/// pending: a refresh issued in the meantime simply makes this ticket stale.
pub fn fetch<T, S: PageSource<T>>(
    source: &S,
    ticket: FetchTicket,
) -> impl Future<Output = Fetched<T>> {
    let pending = source.fetch_page(ticket.request().clone());
    async move {
        let result = pending.await;
        Fetched { ticket, result }
    }
}
