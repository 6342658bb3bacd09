use lucid_indent::buffer::{Buffer, HostBuffer};
use lucid_indent::cli;
use lucid_indent::config::IndentConfig;
use lucid_indent::indenter::NewLineIndenter;

/// Debug front end for the indent engine: compute the indent table for a
/// Lucid source file and print the computed width next to each line.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli_args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error parsing arguments: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logger (set RUST_LOG env var to control verbosity)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = match &cli_args.config {
        Some(path) => IndentConfig::from_file(path)?,
        None => IndentConfig::default(),
    };

    let Some(path) = &cli_args.file else {
        eprintln!("Usage: lucid-indent <FILE> [--config <TOML>]");
        std::process::exit(1);
    };
    if !cli_args.exists() {
        eprintln!("Error: Path '{}' does not exist", path.display());
        std::process::exit(1);
    }

    let mut buffer = Buffer::new();
    buffer.load_from_file(path)?;

    let mut indenter = NewLineIndenter::new(config);
    indenter.set_notifier(|msg| eprintln!("warning: {}", msg));
    indenter.update_indent_list(&buffer);

    for line in 0..buffer.line_count() {
        println!("{:>3}  {}", indenter.get_tabs(line), buffer.line(line));
    }

    Ok(())
}
