//! Sample binary for reader tests

mod lib_helpers {
    pub fn greeting() -> &'static str {
        "Hello from sample project!"
    }
}

fn main() {
    println!("{}", lib_helpers::greeting());
}
