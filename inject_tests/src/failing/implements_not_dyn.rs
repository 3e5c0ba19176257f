use inject::Implements;

#[derive(Implements)]
#[implements(String)]
struct English;

fn main() {
    let _ = English;
}
