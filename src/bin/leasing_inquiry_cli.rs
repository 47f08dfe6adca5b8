use leasing_inquiry::{cli::run_cli, init, utils::build_info};

fn main() {
    if std::env::args().skip(1).any(|arg| arg == "--version" || arg == "-V") {
        println!("{}", build_info());
        return;
    }

    init();

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
