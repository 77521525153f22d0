fn main() {
    if let Err(err) = header_diff::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
