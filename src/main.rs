fn main() {
    if let Err(err) = jsondot::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
