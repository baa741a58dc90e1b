fn main() {
    if let Err(err) = dashboard_diagrams::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
