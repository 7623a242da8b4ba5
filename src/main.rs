fn main() {
    if let Err(err) = neurocalc_lib::run() {
        eprintln!("neurocalc: {err:#}");
        std::process::exit(1);
    }
}
