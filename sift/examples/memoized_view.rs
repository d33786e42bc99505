// Example: a projection only recomputes when its inputs change.
use std::sync::Arc;

use sift::{Projection, ProjectionOptions};

#[derive(Clone, Debug)]
struct User {
    id: u32,
    name: String,
}

fn main() {
    let users: Arc<[User]> = vec![
        User {
            id: 1,
            name: "Leanne Graham".into(),
        },
        User {
            id: 2,
            name: "Ervin Howell".into(),
        },
        User {
            id: 3,
            name: "Clementine Bauch".into(),
        },
    ]
    .into();

    let opts = ProjectionOptions::new_with_key(|u: &User| Some(u.name.as_str()), |u: &User| u.id)
        .with_on_change(|p: &Projection<User, u32>| {
            println!("view changed: {:?}", p.view_state());
        });
    let mut view = Projection::with_items(opts, Arc::clone(&users));

    view.set_query("an");
    view.set_query("AN"); // same match: memo hit, no notification
    view.set_items(Arc::clone(&users)); // same allocation: memo hit

    view.for_each_view_item_keyed(|it, u| {
        println!("key={} position={} name={}", it.key, it.position, u.name);
    });
    println!("recomputes={}", view.recompute_count());
}
