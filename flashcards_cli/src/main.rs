use clap::Parser;
use flashcards_core::*;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flashcards")]
#[command(about = "Interactive flashcard trainer", long_about = None)]
struct Cli {
    /// Load cards from this file before the first command
    #[arg(short = 'i', long, visible_alias = "import_from")]
    import_from: Option<PathBuf>,

    /// Save cards to this file on exit
    #[arg(short = 'e', long, visible_alias = "export_to")]
    export_to: Option<PathBuf>,

    /// Override log file location
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for quiz card selection
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    // Flags win over config values
    let log_path = cli.log_file.unwrap_or_else(|| config.log.path.clone());
    flashcards_core::logging::init(&log_path)?;

    let options = SessionOptions {
        import_from: cli.import_from.or(config.cards.import_from),
        export_to: cli.export_to.or(config.cards.export_to),
        log_path,
        seed: cli.seed,
    };
    tracing::debug!("Starting session with {:?}", options);

    let stdin = io::stdin();
    let mut session = Session::new(stdin.lock(), io::stdout(), options);
    session.run()
}
