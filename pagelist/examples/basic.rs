// Example: window math plus a store fed from an in-memory "server".
use pagelist::{Cursor, Filters, Item, ListView, ListViewOptions, Page, PageRequest, PagerStore};

#[derive(Clone, Debug)]
struct Reagent {
    id: u64,
    name: String,
}

impl Item for Reagent {
    type Id = u64;

    fn id(&self) -> &u64 {
        &self.id
    }
}

// Serves ids `0..total` in ascending order, keyed by the last id seen.
fn serve(request: &PageRequest, total: u64) -> Page<Reagent> {
    let start = request
        .cursor
        .as_ref()
        .and_then(|c| c.as_str().parse::<u64>().ok())
        .map_or(0, |last| last + 1);
    let end = (start + request.limit as u64).min(total);
    let items: Vec<Reagent> = (start..end)
        .map(|id| Reagent {
            id,
            name: format!("reagent #{id}"),
        })
        .collect();
    let page = if end < total {
        Page::more(items, Cursor::new((end - 1).to_string()))
    } else {
        Page::last(items)
    };
    page.with_total(total)
}

fn main() {
    let mut store = PagerStore::<Reagent>::default();
    let mut view = ListView::new(ListViewOptions::new(70).with_container_height(600));

    let ticket = store.load_initial(Filters::new().with("status", "available"));
    let page = serve(ticket.request(), 95);
    store.complete(ticket, Ok(page)).expect("first page");

    // Scroll to the bottom, fetching whenever the prefetch threshold is crossed.
    loop {
        let bottom = view.max_scroll_offset(store.len());
        view.on_scroll(bottom);
        if !view.should_prefetch(store.len()) {
            break;
        }
        let Some(ticket) = store.load_more() else {
            break;
        };
        let page = serve(ticket.request(), 95);
        let applied = store.complete(ticket, Ok(page)).expect("next page");
        println!("loaded {} more (total {})", applied.appended, store.len());
    }

    let plan = view.render_plan(&store.status());
    println!("window={:?} footer={:?}", plan.window, plan.footer);
    view.for_each_visible(store.items(), |row, item| {
        println!("{:>6} {}", row.top, item.name);
    });
}
