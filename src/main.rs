fn main() {
    if let Err(err) = glucatrack_lib::run() {
        eprintln!("glucatrack: {err:#}");
        std::process::exit(1);
    }
}
