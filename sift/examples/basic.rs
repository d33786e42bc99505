// Example: coalesce a burst of keystrokes and filter once the input settles.
use sift::{Debouncer, Projection, ProjectionOptions};

fn main() {
    let items: Vec<String> = (0..100_000).map(|i| format!("Item #{i}")).collect();
    let mut view = Projection::with_items(
        ProjectionOptions::new(|s: &String| Some(s.as_str())),
        items,
    );

    let mut input = Debouncer::with_callback(400.0, |q: &String| {
        println!("settled query={q:?}");
    })
    .expect("valid quiet period");

    // Simulate typing "#4242" at ~60ms per keystroke.
    let mut now_ms = 0u64;
    let typed = "#4242";
    for end in 1..=typed.len() {
        input.submit(typed[..end].to_string(), now_ms);
        now_ms += 60;
        assert!(input.tick(now_ms).is_none());
    }

    // Simulate a 60fps frame loop until the query settles.
    loop {
        now_ms += 16;
        if let Some(q) = input.tick(now_ms) {
            view.set_query(q);
            break;
        }
    }

    println!(
        "t={now_ms}ms matched={} of {} first={:?}",
        view.len(),
        view.total_count(),
        view.item(0)
    );
    input.dispose();
}
