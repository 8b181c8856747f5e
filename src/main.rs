fn main() {
    if let Err(err) = circle_points::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
