use std::sync::Arc;

use inject::{interface, Implements, Inject, Injector};

#[interface]
trait Store: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
}

#[derive(Implements)]
#[implements(dyn Store)]
struct MemoryStore;

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        Some(format!("value of {}", key))
    }
}

struct Settings {
    prefix: &'static str,
}

#[derive(Inject)]
struct App {
    #[inject]
    store: Option<Arc<dyn Store>>,
    #[inject]
    settings: Option<Arc<Settings>>,
}

fn main() {
    let mut root = Injector::new();
    root.map(Settings { prefix: "app" });

    let mut injector = Injector::with_parent(Arc::new(root));
    injector.map_implementing(MemoryStore);

    let mut app = App {
        store: None,
        settings: None,
    };
    injector.apply(&mut app).unwrap();

    let key = format!("{}.name", app.settings.unwrap().prefix);
    assert_eq!(
        app.store.unwrap().load(&key).as_deref(),
        Some("value of app.name")
    );
}
