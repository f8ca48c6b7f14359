use plate::cli::run;

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
