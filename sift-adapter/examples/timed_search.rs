// Example: debounce keystrokes with the tokio timer instead of a frame loop.
use std::time::Duration;

use sift::compute_view;
use sift_adapter::TimedDebouncer;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let frameworks = vec!["Angular", "React", "Vue", "Svelte", "Solid"];

    let mut input = TimedDebouncer::new(400.0, move |query: &String| {
        let view = compute_view(query, &frameworks, |s: &&str| Some(*s));
        println!("{query:?} -> {view:?}");
    })
    .expect("valid quiet period");

    for text in ["s", "so", "sol"] {
        input.submit(text.to_string());
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
    tokio::time::sleep(Duration::from_millis(500)).await;

    input.submit("e".to_string());
    tokio::time::sleep(Duration::from_millis(500)).await;
}
