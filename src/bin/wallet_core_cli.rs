use wallet_core::{cli::run_cli, init};

fn main() {
    init();

    match run_cli() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(2);
        }
    }
}
