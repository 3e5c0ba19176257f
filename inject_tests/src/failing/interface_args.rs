use inject::interface;

#[interface(shared)]
trait Greeter: Send + Sync {}

fn main() {}
