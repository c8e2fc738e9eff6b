use crate::*;

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::future::Future;

use pagelist::{FetchError, FetchState, Filters, Indicator, Item, Page, PageRequest};
use tokio::sync::oneshot;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Reagent {
    id: u32,
    name: String,
}

impl Item for Reagent {
    type Id = u32;

    fn id(&self) -> &u32 {
        &self.id
    }
}

fn reagents(ids: core::ops::Range<u32>) -> Vec<Reagent> {
    ids.map(|id| Reagent {
        id,
        name: std::format!("reagent-{id}"),
    })
    .collect()
}

fn ids(c: &Controller<Reagent>) -> Vec<u32> {
    c.items().iter().map(|r| r.id).collect()
}

fn controller() -> Controller<Reagent> {
    Controller::new(ControllerOptions::default())
}

/// A controller with the first page `0..n` applied and more pages available.
fn loaded(n: u32) -> Controller<Reagent> {
    let mut c = controller();
    let ticket = c.refresh(Filters::new());
    c.complete(
        ticket,
        Ok(Page::more(reagents(0..n), std::format!("c{n}")).with_total(1000)),
    )
    .unwrap();
    c
}

/// An in-memory server over ids `0..total`. The cursor is the next id as a string.
async fn serve(request: PageRequest, total: u32) -> Result<Page<Reagent>, FetchError> {
    let start = match &request.cursor {
        Some(cursor) => cursor
            .as_str()
            .parse::<u32>()
            .map_err(|_| FetchError::status(400))?,
        None => 0,
    };
    let end = start.saturating_add(request.limit).min(total);
    let items = reagents(start..end);
    let page = if end < total {
        Page::more(items, std::format!("{end}"))
    } else {
        Page::last(items)
    };
    Ok(page.with_total(total as u64))
}

type Reply = Result<Page<Reagent>, FetchError>;

/// A source whose responses are released by hand, in any order.
#[derive(Default)]
struct ScriptedSource {
    requests: RefCell<Vec<PageRequest>>,
    replies: RefCell<VecDeque<oneshot::Receiver<Reply>>>,
}

impl ScriptedSource {
    /// Queues a reply slot for the next request.
    fn expect(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(rx);
        tx
    }

    fn requests(&self) -> Vec<PageRequest> {
        self.requests.borrow().clone()
    }
}

impl PageSource<Reagent> for ScriptedSource {
    fn fetch_page(&self, request: PageRequest) -> impl Future<Output = Reply> {
        self.requests.borrow_mut().push(request);
        let reply = self.replies.borrow_mut().pop_front();
        async move {
            match reply {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(FetchError::network("reply dropped"))),
                None => Err(FetchError::network("unscripted request")),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// async bridge

#[tokio::test]
async fn refresh_supersedes_a_pending_load_more() {
    let source = ScriptedSource::default();
    let mut c = controller();

    let first = source.expect();
    let pending = fetch(&source, c.refresh(Filters::new()));
    first
        .send(Ok(Page::more(reagents(0..20), "c20")))
        .unwrap();
    c.on_fetched(pending.await).unwrap();

    let more = source.expect();
    let ticket = c.on_scroll(0).unwrap();
    let stale = fetch(&source, ticket);

    let filtered = Filters::new().with("hazard", "flammable");
    let fresh_reply = source.expect();
    let fresh = fetch(&source, c.refresh(filtered.clone()));

    // The refresh answers first, the old follow-up page arrives afterwards.
    fresh_reply.send(Ok(Page::last(reagents(100..103)))).unwrap();
    c.on_fetched(fresh.await).unwrap();
    more.send(Ok(Page::more(reagents(20..40), "c40"))).unwrap();
    let err = c.on_fetched(stale.await).unwrap_err();

    assert!(err.is_stale());
    assert_eq!(ids(&c), [100, 101, 102]);
    assert!(!c.store().has_more());
    assert_eq!(c.store().filters(), &filtered);

    let requests = source.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].cursor.as_ref().map(|c| c.as_str()), Some("c20"));
    assert_eq!(requests[2].cursor, None);
    assert_eq!(requests[2].filters, filtered);
}

#[tokio::test]
async fn refresh_answered_late_still_wins() {
    let source = ScriptedSource::default();
    let mut c = loaded(20);

    let more = source.expect();
    let stale = fetch(&source, c.on_scroll(0).unwrap());
    let fresh_reply = source.expect();
    let fresh = fetch(&source, c.refresh(Filters::new()));

    more.send(Ok(Page::more(reagents(20..40), "c40"))).unwrap();
    assert!(c.on_fetched(stale.await).unwrap_err().is_stale());
    assert!(c.items().is_empty());
    assert!(c.status().is_loading());

    fresh_reply.send(Ok(Page::more(reagents(0..20), "c20"))).unwrap();
    c.on_fetched(fresh.await).unwrap();
    assert_eq!(ids(&c), (0..20).collect::<Vec<_>>());
}

#[tokio::test]
async fn failed_request_surfaces_as_fetch_error() {
    let source = ScriptedSource::default();
    let mut c = loaded(20);

    let more = source.expect();
    let pending = fetch(&source, c.on_scroll(0).unwrap());
    more.send(Err(FetchError::status(503))).unwrap();
    let err = c.on_fetched(pending.await).unwrap_err();

    assert!(!err.is_stale());
    assert_eq!(c.error(), Some(&FetchError::status(503)));
    assert_eq!(c.items().len(), 20);
    assert_eq!(c.footer(), Indicator::Error);
}

#[tokio::test]
async fn closure_source_scrolls_to_the_end() {
    let source = |request: PageRequest| serve(request, 45);
    let mut c = controller();

    let mut next = Some(c.refresh(Filters::new()));
    let mut fetches = 0;
    while let Some(ticket) = next {
        fetches += 1;
        c.on_fetched(fetch(&source, ticket).await).unwrap();
        let bottom = c.view().max_scroll_offset(c.items().len());
        next = c.on_scroll(bottom).or_else(|| c.on_layout());
    }

    assert_eq!(fetches, 3);
    assert_eq!(ids(&c), (0..45).collect::<Vec<_>>());
    assert!(!c.store().has_more());
    assert_eq!(c.store().total(), 45);
    assert_eq!(c.footer(), Indicator::None);
    assert!(!c.render_plan().sentinel);
}

// ---------------------------------------------------------------------------
// prefetch triggers

#[test]
fn scroll_prefetches_only_near_the_end() {
    // 100 rows of 70 = 7000; threshold is 3 * 600 = 1800 below the viewport.
    let mut c = loaded(100);

    assert_eq!(c.on_scroll(0), None);
    assert_eq!(c.on_scroll(4600), None);
    let ticket = c.on_scroll(4700).unwrap();

    assert_eq!(ticket.request().cursor.as_ref().map(|c| c.as_str()), Some("c100"));
    assert_eq!(c.last_trigger(), Some(PrefetchTrigger::Scroll));
    assert_eq!(c.footer(), Indicator::Loading);
}

#[test]
fn duplicate_triggers_collapse_into_one_fetch() {
    let mut c = loaded(20);

    assert!(c.on_scroll(0).is_some());
    assert_eq!(c.on_scroll(10), None);
    assert_eq!(c.on_sentinel(true), None);
    assert_eq!(c.on_layout(), None);
    assert_eq!(c.load_more(), None);
    assert!(c.status().is_loading_more());
}

#[test]
fn short_page_fetches_through_the_sentinel_on_layout() {
    let mut c = controller();
    let ticket = c.refresh(Filters::new());
    c.complete(ticket, Ok(Page::more(reagents(0..5), "c5")))
        .unwrap();

    let ticket = c.on_layout().unwrap();
    assert_eq!(ticket.request().cursor.as_ref().map(|c| c.as_str()), Some("c5"));
    assert_eq!(c.last_trigger(), Some(PrefetchTrigger::Sentinel));
    assert_eq!(c.on_layout(), None);
}

#[test]
fn growing_the_container_reveals_the_sentinel() {
    // 20 rows = 1400; the sentinel sits below 600 + 200 margin until the container grows.
    let mut c = loaded(20);
    assert_eq!(c.on_layout(), None);

    c.on_resize(1400);
    assert!(c.view().has_pending_resize());
    assert!(c.on_layout().is_some());
    assert_eq!(c.view().container_height(), 1400);
}

#[test]
fn sentinel_signal_is_ignored_when_not_intersecting() {
    let mut c = loaded(20);
    assert_eq!(c.on_sentinel(false), None);
    assert!(c.on_sentinel(true).is_some());
}

#[test]
fn empty_list_never_prefetches() {
    let mut c = controller();
    let ticket = c.refresh(Filters::new());
    c.complete(ticket, Ok(Page::more(Vec::new(), "c0"))).unwrap();

    assert!(c.store().has_more());
    assert_eq!(c.on_scroll(0), None);
    assert_eq!(c.on_layout(), None);
    assert_eq!(c.on_sentinel(true), None);
    assert!(!c.render_plan().sentinel);
}

#[test]
fn exhausted_list_never_prefetches() {
    let mut c = controller();
    let ticket = c.refresh(Filters::new());
    c.complete(ticket, Ok(Page::last(reagents(0..3)))).unwrap();

    assert_eq!(c.on_scroll(0), None);
    assert_eq!(c.on_layout(), None);
    assert_eq!(c.on_sentinel(true), None);
    assert_eq!(c.status().state, FetchState::Idle);
}

#[test]
fn failed_page_pauses_automatic_triggers_until_retry() {
    let mut c = loaded(20);
    let ticket = c.on_scroll(0).unwrap();
    c.complete(ticket, Err(FetchError::Timeout)).unwrap_err();

    assert_eq!(c.footer(), Indicator::Error);
    assert_eq!(c.on_scroll(50), None);
    assert_eq!(c.on_sentinel(true), None);
    assert_eq!(c.on_layout(), None);

    let retry = c.load_more().unwrap();
    assert_eq!(retry.request().cursor.as_ref().map(|c| c.as_str()), Some("c20"));
    assert_eq!(c.error(), None);
    assert_eq!(c.footer(), Indicator::Loading);

    c.complete(retry, Ok(Page::more(reagents(20..40), "c40")))
        .unwrap();
    assert_eq!(c.items().len(), 40);
    // 2800 - 1000 - 600 = 1200 left below the viewport.
    assert!(c.on_scroll(1000).is_some());
}

#[test]
fn first_page_failure_shows_no_retry_footer_after_local_add() {
    let mut c = controller();
    let ticket = c.refresh(Filters::new());
    c.complete(ticket, Err(FetchError::Timeout)).unwrap_err();
    c.add_item(Reagent {
        id: 500,
        name: "draft".into(),
    });

    assert_eq!(c.items().len(), 1);
    assert_eq!(c.footer(), Indicator::None);
    assert_eq!(c.load_more(), None);
    assert_eq!(c.on_sentinel(true), None);
}

// ---------------------------------------------------------------------------
// debounced refresh

#[test]
fn first_mount_schedules_a_refresh() {
    let mut c = controller();
    assert!(c.set_filters(Filters::new(), 0));
    assert_eq!(c.tick(DEFAULT_REFRESH_DEBOUNCE_MS - 1), None);

    let ticket = c.tick(DEFAULT_REFRESH_DEBOUNCE_MS).unwrap();
    assert_eq!(ticket.request().cursor, None);
    assert!(!c.has_pending_refresh());
    assert!(c.status().is_loading());
}

#[test]
fn each_filter_change_restarts_the_timer() {
    let mut c = loaded(20);
    let a = Filters::new().with("q", "ace");
    let b = Filters::new().with("q", "acet");

    assert!(c.set_filters(a, 0));
    assert!(c.set_filters(b.clone(), 200));
    assert_eq!(c.tick(300), None);
    assert_eq!(c.tick(499), None);

    let ticket = c.tick(500).unwrap();
    assert_eq!(ticket.request().filters, b);
    assert_eq!(c.tick(10_000), None);
}

#[test]
fn unchanged_filters_do_not_schedule() {
    let a = Filters::new().with("hazard", "toxic");
    let mut c = controller();
    let ticket = c.refresh(a.clone());
    c.complete(ticket, Ok(Page::last(reagents(0..3)))).unwrap();

    assert!(!c.set_filters(a.clone(), 0));
    assert!(!c.has_pending_refresh());

    let b = Filters::new().with("hazard", "corrosive");
    assert!(c.set_filters(b.clone(), 0));
    // Repeating the pending set keeps the original deadline.
    assert!(!c.set_filters(b, 250));
    assert!(c.tick(300).is_some());
}

#[test]
fn custom_debounce_delay() {
    let options = ControllerOptions::default().with_refresh_debounce_ms(50);
    let mut c: Controller<Reagent> = Controller::new(options);
    c.set_filters(Filters::new(), 1000);
    assert_eq!(c.tick(1049), None);
    assert!(c.tick(1050).is_some());
}

#[test]
fn immediate_refresh_drops_the_pending_one() {
    let mut c = loaded(20);
    c.set_filters(Filters::new().with("q", "x"), 0);
    c.refresh(Filters::new().with("q", "y"));

    assert!(!c.has_pending_refresh());
    assert_eq!(c.tick(1000), None);
    assert_eq!(c.store().filters().get("q"), Some("y"));
}

#[test]
fn refresh_scrolls_back_to_the_top() {
    let mut c = loaded(100);
    c.on_scroll(3000);
    assert_eq!(c.view().scroll_offset(), 3000);

    c.reload();
    assert_eq!(c.view().scroll_offset(), 0);
    assert!(c.items().is_empty());
}

// ---------------------------------------------------------------------------
// lifecycle and local mutations

#[test]
fn detach_cancels_fetch_and_pending_refresh() {
    let mut c = loaded(20);
    let ticket = c.on_scroll(0).unwrap();
    c.set_filters(Filters::new().with("q", "x"), 0);

    assert!(c.detach());
    assert_eq!(c.tick(10_000), None);
    let err = c
        .complete(ticket, Ok(Page::more(reagents(20..40), "c40")))
        .unwrap_err();
    assert!(err.is_stale());
    assert_eq!(c.items().len(), 20);
    assert!(!c.detach());
}

#[test]
fn local_mutations_pass_through() {
    let mut c = loaded(20);
    c.add_item(Reagent {
        id: 500,
        name: "new".into(),
    });
    assert_eq!(c.items()[0].id, 500);
    assert_eq!(c.status().total, 1001);

    assert!(c.update_item_with(&3, |r| r.name = "renamed".into()));
    assert_eq!(c.items()[4].name, "renamed");
    assert!(c.update_item(Reagent {
        id: 4,
        name: "replaced".into(),
    }));
    assert!(c.remove_item(&500).is_some());
    assert_eq!(c.status().total, 1000);
    assert_eq!(c.remove_item(&500), None);
}

#[test]
fn visible_rows_follow_the_scroll_offset() {
    let mut c = loaded(100);
    c.on_scroll(700);

    let mut seen = Vec::new();
    c.for_each_visible(|row, item| {
        assert_eq!(row.index as u32, item.id);
        assert_eq!(row.top, row.index as u64 * 70);
        seen.push(item.id);
    });
    // rows 10..19 are visible, plus 5 rows of overscan on each side
    assert_eq!(seen, (5..24).collect::<Vec<_>>());

    let plan = c.render_plan();
    assert_eq!(plan.window.start_index, 5);
    assert_eq!(plan.window.end_index, 24);
    assert_eq!(plan.window.total_height, 7000);
    assert!(plan.sentinel);
}

#[test]
fn parts_round_trip() {
    let c = loaded(20);
    let (store, view) = c.into_parts();
    let c = Controller::from_parts(store, view);
    assert_eq!(c.items().len(), 20);
    assert_eq!(c.store().cursor().map(|c| c.as_str()), Some("c20"));
}
