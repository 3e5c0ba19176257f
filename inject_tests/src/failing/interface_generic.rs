use inject::interface;

#[interface]
trait Repository<T>: Send + Sync {}

fn main() {}
