//! Command-line entry point for specgen.

fn main() {
    let code = specgen_cli::run_cli(std::env::args().collect());
    std::process::exit(code);
}
