// Example: a search box over users fetched from two sources.
use serde::Deserialize;
use sift::{DebouncerOptions, ProjectionOptions};
use sift_adapter::{FetchError, LoadSource, SearchController};

#[derive(Clone, Debug, Deserialize)]
struct User {
    id: u32,
    name: String,
    email: String,
}

const USERS: &str = r#"[
    {"id": 1, "name": "Leanne Graham", "email": "Sincere@april.biz"},
    {"id": 2, "name": "Ervin Howell", "email": "Shanna@melissa.tv"},
    {"id": 3, "name": "Clementine Bauch", "email": "Nathan@yesenia.net"},
    {"id": 4, "name": "Patricia Lebsack", "email": "Julianne.OConner@kory.org"},
    {"id": 5, "name": "Chelsey Dietrich", "email": "Lucio_Hettinger@annie.ca"}
]"#;

fn fetch(body: &str) -> Result<Vec<User>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::new(e.to_string()))
}

fn main() {
    let opts = ProjectionOptions::new_with_key(|u: &User| Some(u.name.as_str()), |u: &User| u.id);
    let mut search: SearchController<User, u32> =
        SearchController::new(DebouncerOptions::default(), opts).expect("valid quiet period");

    // The searched list and an unfiltered side list load concurrently.
    let side_list = LoadSource(1);
    let searched = search.begin_load();
    let side = search.begin_load_from(side_list);
    search.complete_load(side, fetch(USERS));
    println!("loading={} error={:?}", search.is_loading(), search.last_error());
    search.complete_load(searched, fetch(USERS));
    println!("loading={} error={:?}", search.is_loading(), search.last_error());

    let retry = search.begin_load_from(side_list);
    search.complete_load(retry, fetch("<html>502 Bad Gateway</html>"));
    println!("loading={} error={:?}", search.is_loading(), search.last_error());

    let keystrokes = [(0, "c"), (120, "ch"), (260, "che")];
    for (now_ms, text) in keystrokes {
        search.on_input(text, now_ms);
    }

    let mut now_ms = 260;
    while !search.tick(now_ms) {
        now_ms += 16;
    }
    println!("settled {:?} at {now_ms}ms", search.query().as_str());
    search.projection().for_each_view_item_keyed(|it, u| {
        println!("#{} {} <{}>", it.key, u.name, u.email);
    });
    if let Some(all) = search.collection(side_list) {
        println!("side list: {} users (unfiltered)", all.len());
    }
}
