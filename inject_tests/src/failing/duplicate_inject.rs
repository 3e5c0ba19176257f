use std::sync::Arc;

use inject::Inject;

#[derive(Inject)]
struct Service {
    #[inject]
    #[inject]
    count: Option<Arc<u32>>,
}

fn main() {
    let service = Service { count: None };
    assert!(service.count.is_none());
}
