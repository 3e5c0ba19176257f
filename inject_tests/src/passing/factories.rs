use std::sync::Arc;

use inject::{interface, Injector, TypeKey, Value};

#[interface]
trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

struct Fixed(u64);

impl Clock for Fixed {
    fn now(&self) -> u64 {
        self.0
    }
}

struct Epoch(u64);

fn main() {
    let mut injector = Injector::new();
    injector.map(Epoch(1_000));
    injector
        .provide(|epoch: Arc<Epoch>| -> Arc<dyn Clock> { Arc::new(Fixed(epoch.0 + 1)) })
        .unwrap()
        .set(TypeKey::of::<u8>(), Value::of(4u8));

    let elapsed = injector
        .invoke(|clock: Arc<dyn Clock>, epoch: Arc<Epoch>, step: Arc<u8>| {
            (clock.now() - epoch.0) * u64::from(*step)
        })
        .unwrap();
    assert_eq!(elapsed, 4);

    let clocks = injector.get_all::<dyn Clock>();
    assert_eq!(clocks.len(), 1);
}
