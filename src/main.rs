fn main() {
    if let Err(err) = radial_bubbles::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
