use inject::Inject;

#[derive(Inject)]
union Bits {
    a: u32,
}

fn main() {
    let bits = Bits { a: 1 };
    assert_eq!(unsafe { bits.a }, 1);
}
