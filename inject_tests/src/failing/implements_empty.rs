use inject::Implements;

#[derive(Implements)]
struct English;

fn main() {
    let _ = English;
}
