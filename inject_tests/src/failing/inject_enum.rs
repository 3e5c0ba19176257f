use inject::Inject;

#[derive(Inject)]
enum Choice {
    First,
}

fn main() {
    let _ = Choice::First;
}
