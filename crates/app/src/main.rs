mod cli;
mod dashboard;
mod html;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if cli::handle_commands(&args)? {
        return Ok(());
    }

    eprintln!("{}", cli::USAGE);
    std::process::exit(2);
}
