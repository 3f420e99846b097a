fn main() {
    if let Err(err) = markmind::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
