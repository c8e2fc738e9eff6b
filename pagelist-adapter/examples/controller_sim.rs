// Example: a headless controller driven by simulated typing, a timer and scrolling.
//
// A UI adapter would:
// - forward filter edits to `set_filters(filters, now_ms)` and call `tick(now_ms)` from a timer
// - forward scroll/resize/layout events and run any ticket they return through `fetch`
// - render `render_plan()` and `for_each_visible(..)` after each applied page
use pagelist::{FetchError, Filters, Item, Page, PageRequest};
use pagelist_adapter::{Controller, ControllerOptions, fetch};

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

const CATALOG: [&str; 6] = [
    "acetone",
    "acetic acid",
    "acetonitrile",
    "ammonia",
    "benzene",
    "chloroform",
];

// Serves a catalog of 250 reagents, filtered by a name prefix. The cursor is an offset.
async fn serve(request: PageRequest) -> Result<Page<Reagent>, FetchError> {
    let prefix = request.filters.get("q").unwrap_or("");
    let matching: Vec<Reagent> = (0..250u64)
        .map(|id| Reagent {
            id,
            name: format!("{} #{id}", CATALOG[id as usize % CATALOG.len()]),
        })
        .filter(|r| r.name.starts_with(prefix))
        .collect();

    let start = match &request.cursor {
        Some(cursor) => cursor
            .as_str()
            .parse::<usize>()
            .map_err(|_| FetchError::status(400))?,
        None => 0,
    };
    let end = (start + request.limit as usize).min(matching.len());
    let total = matching.len() as u64;
    let items = matching[start.min(end)..end].to_vec();
    let page = if end < matching.len() {
        Page::more(items, end.to_string())
    } else {
        Page::last(items)
    };
    Ok(page.with_total(total))
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut c: Controller<Reagent> = Controller::new(ControllerOptions::default());

    // Typing "ace" one key at a time, 120ms apart: only the last edit survives the debounce.
    let mut now_ms = 0u64;
    let mut query = String::new();
    for ch in "ace".chars() {
        query.push(ch);
        c.set_filters(Filters::new().with("q", query.as_str()), now_ms);
        now_ms += 120;
    }

    let mut next = None;
    while next.is_none() {
        now_ms += 16;
        next = c.tick(now_ms);
    }
    println!("t={now_ms} refresh issued");

    // Keep scrolling to the bottom until the source runs dry.
    while let Some(ticket) = next {
        match c.on_fetched(fetch(&serve, ticket).await) {
            Ok(applied) => println!(
                "applied {} rows ({} duplicates), {} of {} loaded",
                applied.appended,
                applied.duplicates,
                c.items().len(),
                c.status().total
            ),
            Err(err) => println!("fetch failed: {err}"),
        }
        let bottom = c.view().max_scroll_offset(c.items().len());
        next = c.on_scroll(bottom).or_else(|| c.on_layout());
    }

    let plan = c.render_plan();
    println!("window={:?} footer={:?}", plan.window, plan.footer);
    c.for_each_visible(|row, item| println!("{:>6} {}", row.top, item.name));
}
