//! Interactive command session.
//!
//! Reads one command per line, runs it to completion against the card store
//! and writes prompts and results as plain text. Input and output are
//! generic so the whole protocol can be driven from tests.

use crate::{quiz, CardStore, Error, QuizPlan, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const MENU: &str =
    "Input the action (add, remove, import, export, ask, exit, log, hardest card, reset stats):";

/// Top-level commands accepted at the menu prompt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Add,
    Remove,
    Import,
    Export,
    Ask,
    Exit,
    Log,
    HardestCard,
    ResetStats,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "add" => Ok(Command::Add),
            "remove" => Ok(Command::Remove),
            "import" => Ok(Command::Import),
            "export" => Ok(Command::Export),
            "ask" => Ok(Command::Ask),
            "exit" => Ok(Command::Exit),
            "log" => Ok(Command::Log),
            "hardest card" => Ok(Command::HardestCard),
            "reset stats" => Ok(Command::ResetStats),
            other => Err(other.to_string()),
        }
    }
}

/// Startup settings for a session
#[derive(Clone, Debug, Default)]
pub struct SessionOptions {
    /// Imported before the first command
    pub import_from: Option<PathBuf>,

    /// Exported to on exit, replacing the farewell message
    pub export_to: Option<PathBuf>,

    /// Log file copied by the `log` command
    pub log_path: PathBuf,

    /// Fixed quiz RNG seed
    pub seed: Option<u64>,
}

/// A single interactive session over a card store
pub struct Session<R, W> {
    store: CardStore,
    input: R,
    output: W,
    rng: StdRng,
    options: SessionOptions,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, options: SessionOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            store: CardStore::new(),
            input,
            output,
            rng,
            options,
        }
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Run the startup import, then commands until `exit` or end of input
    pub fn run(&mut self) -> Result<()> {
        if let Some(path) = self.options.import_from.clone() {
            self.import_from(&path)?;
        }

        loop {
            self.say(MENU)?;

            let Some(line) = self.read_line()? else {
                tracing::info!("Input closed, exiting");
                self.exit()?;
                return Ok(());
            };

            match line.parse::<Command>() {
                Ok(Command::Exit) => {
                    self.exit()?;
                    return Ok(());
                }
                Ok(command) => self.dispatch(command)?,
                Err(unknown) => {
                    tracing::warn!("Invalid command entered: {:?}", unknown);
                    self.say("Not a valid command")?;
                }
            }
        }
    }

    /// Run one non-exit command to completion
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Add => self.add_card(),
            Command::Remove => self.remove_card(),
            Command::Import => {
                self.say("File name:")?;
                let path = PathBuf::from(self.expect_line()?);
                self.import_from(&path)
            }
            Command::Export => {
                self.say("File name:")?;
                let path = PathBuf::from(self.expect_line()?);
                self.export_to(&path)
            }
            Command::Ask => self.ask(),
            Command::Log => self.save_log(),
            Command::HardestCard => self.hardest_card(),
            Command::ResetStats => self.reset_stats(),
            Command::Exit => self.exit(),
        }
    }

    fn add_card(&mut self) -> Result<()> {
        tracing::info!("Adding a new flashcard.");

        self.say("The card:")?;
        let term = loop {
            let term = self.expect_line()?;
            if term.is_empty() {
                self.say("The card can't be empty. Try again:")?;
                continue;
            }
            match self.store.check_term(&term) {
                Ok(()) => break term,
                Err(e) => {
                    tracing::warn!("{}", e);
                    self.say(&format!("{} Try again:", e))?;
                }
            }
        };

        self.say("The definition of the card:")?;
        let definition = loop {
            let definition = self.expect_line()?;
            if definition.is_empty() {
                self.say("The definition can't be empty. Try again:")?;
                continue;
            }
            match self.store.check_definition(&definition) {
                Ok(()) => break definition,
                Err(e) => {
                    tracing::warn!("{}", e);
                    self.say(&format!("{} Try again:", e))?;
                }
            }
        };

        self.store.add(&term, &definition)?;
        let message = format!(
            "The pair (\"{}\":\"{}\") has been added.",
            term, definition
        );
        tracing::info!("{}", message);
        self.say(&message)
    }

    fn remove_card(&mut self) -> Result<()> {
        tracing::info!("Removing a flashcard.");

        self.say("Which card?")?;
        let term = self.expect_line()?;

        match self.store.remove(&term) {
            Ok(_) => {
                tracing::info!("The card {:?} has been removed.", term);
                self.say("The card has been removed.")
            }
            Err(e @ Error::CardNotFound(_)) => {
                tracing::warn!("{}", e);
                self.say(&e.to_string())
            }
            Err(e) => Err(e),
        }
    }

    /// Import cards from `path`, reporting the outcome to the user
    pub fn import_from(&mut self, path: &Path) -> Result<()> {
        tracing::info!("Importing flashcards from {:?}.", path);

        match self.store.import(path) {
            Ok(count) => {
                let message = format!("{} cards have been loaded.", count);
                tracing::info!("{}", message);
                self.say(&message)
            }
            Err(Error::FileNotFound(_)) => {
                tracing::warn!("File {:?} was not found to import from.", path);
                self.say("File not found.")
            }
            Err(e) => {
                tracing::warn!("Import from {:?} failed: {}", path, e);
                self.say(&format!("Could not load cards: {}", e))
            }
        }
    }

    /// Export cards to `path`, reporting the outcome to the user
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        tracing::info!("Exporting flashcards to {:?}.", path);

        match self.store.export(path) {
            Ok(count) => {
                let message = format!("{} cards have been saved.", count);
                tracing::info!("{}", message);
                self.say(&message)
            }
            Err(e) => {
                tracing::warn!("Export to {:?} failed: {}", path, e);
                self.say(&format!("Could not save cards: {}", e))
            }
        }
    }

    fn ask(&mut self) -> Result<()> {
        tracing::info!("Asking questions.");

        self.say("How many times to ask?")?;
        let line = self.expect_line()?;
        let count = match parse_count(&line) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("{}", e);
                return self.say("Please enter a whole number.");
            }
        };

        if self.store.is_empty() {
            return self.say("There are no cards to ask.");
        }

        let mut plan = QuizPlan::new(&self.store, count, &mut self.rng);
        while let Some(term) = plan.next_term(&mut self.rng) {
            self.say(&format!("Print the definition of \"{}\":", term))?;
            let Some(answer) = self.read_line()? else {
                tracing::info!("Input closed with {} questions left", plan.remaining());
                return Ok(());
            };
            tracing::info!("Print the definition of {:?}: {}", term, answer);

            let verdict = quiz::check_answer(&mut self.store, &term, &answer)?;
            tracing::info!("{}", verdict);
            self.say(&verdict.to_string())?;
        }

        Ok(())
    }

    fn save_log(&mut self) -> Result<()> {
        tracing::info!("Saving log.");

        self.say("File name:")?;
        let destination = PathBuf::from(self.expect_line()?);

        let contents = match std::fs::read(&self.options.log_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!("Reading log {:?} failed: {}", self.options.log_path, e);
                return self.say(&format!("Could not save the log: {}", e));
            }
        };

        if let Err(e) = std::fs::write(&destination, contents) {
            tracing::warn!("Saving log to {:?} failed: {}", destination, e);
            return self.say(&format!("Could not save the log: {}", e));
        }

        tracing::info!("The log has been saved.");
        self.say("The log has been saved.")
    }

    fn hardest_card(&mut self) -> Result<()> {
        tracing::info!("Finding the hardest flashcard.");

        let message = match self.store.hardest_cards() {
            Some(hardest) => hardest.to_string(),
            None => "There are no cards with errors.".to_string(),
        };
        tracing::info!("{}", message);
        self.say(&message)
    }

    fn reset_stats(&mut self) -> Result<()> {
        tracing::info!("Resetting flashcard statistics.");

        self.store.reset_stats();
        self.say("Card statistics have been reset.")
    }

    fn exit(&mut self) -> Result<()> {
        match self.options.export_to.clone() {
            Some(path) => self.export_to(&path),
            None => {
                tracing::info!("Exiting the flashcard handler.");
                self.say("Bye bye!")
            }
        }
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()?;
        Ok(())
    }

    /// Next line without surrounding whitespace, `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Next line; end of input in the middle of a command is an error
    fn expect_line(&mut self) -> Result<String> {
        self.read_line()?.ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed in the middle of a command",
            ))
        })
    }
}

/// Parse the number of questions for `ask`
pub fn parse_count(input: &str) -> Result<usize> {
    input
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::InvalidCount(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_script(script: &str, options: SessionOptions) -> (CardStore, String) {
        crate::logging::init_test();

        let mut session = Session::new(Cursor::new(script.to_string()), Vec::new(), options);
        session.run().unwrap();

        let output = String::from_utf8(session.output().clone()).unwrap();
        (session.store().clone(), output)
    }

    fn seeded(seed: u64) -> SessionOptions {
        SessionOptions {
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!("add".parse::<Command>(), Ok(Command::Add));
        assert_eq!("hardest card".parse::<Command>(), Ok(Command::HardestCard));
        assert_eq!("reset stats\n".parse::<Command>(), Ok(Command::ResetStats));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Exit));
        assert!("hardest".parse::<Command>().is_err());
        assert!("ADD".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(" 3 ").unwrap(), 3);
        assert_eq!(parse_count("0").unwrap(), 0);
        assert!(matches!(parse_count("three"), Err(Error::InvalidCount(_))));
        assert!(matches!(parse_count("-1"), Err(Error::InvalidCount(_))));
    }

    #[test]
    fn test_add_reprompts_for_duplicate_fields() {
        let script = "add\ncat\na feline\n\
                      add\ncat\nkitten\na feline\na young cat\n\
                      exit\n";
        let (store, output) = run_script(script, seeded(1));

        assert!(output.contains("The card \"cat\" already exists. Try again:"));
        assert!(output.contains("The definition \"a feline\" already exists. Try again:"));
        assert!(output.contains("The pair (\"kitten\":\"a young cat\") has been added."));
        assert!(output.ends_with("Bye bye!\n"));
        assert_eq!(store.terms(), vec!["cat", "kitten"]);
    }

    #[test]
    fn test_add_rejects_empty_fields() {
        let script = "add\n\ncat\n  \na feline\nexit\n";
        let (store, output) = run_script(script, seeded(1));

        assert!(output.contains("The card can't be empty. Try again:"));
        assert!(output.contains("The definition can't be empty. Try again:"));
        assert_eq!(store.definition_of("cat"), Some("a feline"));
    }

    #[test]
    fn test_remove_existing_and_missing() {
        let script = "add\ncat\na feline\nremove\ndog\nremove\ncat\nexit\n";
        let (store, output) = run_script(script, seeded(1));

        assert!(output.contains("Can't remove \"dog\": there is no such card."));
        assert!(output.contains("The card has been removed."));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unknown_command_keeps_session_alive() {
        let script = "fly\nadd\ncat\na feline\nexit\n";
        let (store, output) = run_script(script, seeded(1));

        assert!(output.contains("Not a valid command"));
        assert_eq!(store.len(), 1);
        assert!(output.ends_with("Bye bye!\n"));
    }

    #[test]
    fn test_end_of_input_exits() {
        let (_, output) = run_script("add\ncat\na feline\n", seeded(1));
        assert!(output.ends_with("Bye bye!\n"));
    }

    #[test]
    fn test_end_of_input_mid_command_is_error() {
        let mut session = Session::new(Cursor::new("add\ncat\n"), Vec::new(), seeded(1));
        let err = session.run().unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_ask_cross_match_and_hardest() {
        // "a canine" is right for dog and a cross-match for cat, whatever the order
        let script = "add\ncat\na feline\nadd\ndog\na canine\n\
                      ask\n2\na canine\na canine\n\
                      hardest card\nexit\n";
        let (store, output) = run_script(script, seeded(42));

        assert!(output.contains("Print the definition of \"cat\":"));
        assert!(output.contains("Print the definition of \"dog\":"));
        assert!(output.contains(
            "Wrong. The right answer is \"a feline\", but your definition is correct for \"dog\"."
        ));
        assert!(output.contains("Correct!"));
        assert!(output.contains("The hardest card is \"cat\". You have 1 error answering it."));
        assert_eq!(store.mistakes_of("cat"), Some(1));
        assert_eq!(store.mistakes_of("dog"), Some(0));
    }

    #[test]
    fn test_ask_invalid_count_and_empty_store() {
        let script = "ask\nmany\nask\n3\nexit\n";
        let (_, output) = run_script(script, seeded(1));

        assert!(output.contains("Please enter a whole number."));
        assert!(output.contains("There are no cards to ask."));
    }

    #[test]
    fn test_reset_stats_clears_hardest() {
        let script = "add\ncat\na feline\nask\n1\nwrong\nreset stats\nhardest card\nexit\n";
        let (store, output) = run_script(script, seeded(1));

        assert!(output.contains("Wrong. The right answer is \"a feline\"."));
        assert!(output.contains("Card statistics have been reset."));
        assert!(output.contains("There are no cards with errors."));
        assert_eq!(store.mistakes_of("cat"), Some(0));
    }

    #[test]
    fn test_export_and_import_commands() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("deck.txt");
        let missing = temp_dir.path().join("missing.txt");

        let script = format!(
            "add\ncat\na feline\nexport\n{}\nimport\n{}\nexit\n",
            path.display(),
            missing.display()
        );
        let (_, output) = run_script(&script, seeded(1));

        assert!(output.contains("1 cards have been saved."));
        assert!(output.contains("File not found."));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "cat: a feline\n");
    }

    #[test]
    fn test_startup_import_and_exit_export() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("in.txt");
        let destination = temp_dir.path().join("out.txt");
        std::fs::write(&source, "cat: a feline\ndog: a canine\n").unwrap();

        let options = SessionOptions {
            import_from: Some(source),
            export_to: Some(destination.clone()),
            seed: Some(1),
            ..Default::default()
        };
        let (_, output) = run_script("remove\ndog\nexit\n", options);

        assert!(output.starts_with("2 cards have been loaded.\n"));
        assert!(output.ends_with("1 cards have been saved.\n"));
        assert!(!output.contains("Bye bye!"));
        assert_eq!(
            std::fs::read_to_string(&destination).unwrap(),
            "cat: a feline\n"
        );
    }

    #[test]
    fn test_log_command_copies_log_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_path = temp_dir.path().join("flashcard.log");
        let copy_path = temp_dir.path().join("copy.log");
        std::fs::write(&log_path, "INFO Adding a new flashcard.\n").unwrap();

        let options = SessionOptions {
            log_path,
            seed: Some(1),
            ..Default::default()
        };
        let script = format!("log\n{}\nexit\n", copy_path.display());
        let (_, output) = run_script(&script, options);

        assert!(output.contains("The log has been saved."));
        assert_eq!(
            std::fs::read_to_string(&copy_path).unwrap(),
            "INFO Adding a new flashcard.\n"
        );
    }

    #[test]
    fn test_huge_ask_count_stops_at_end_of_input() {
        let temp_dir = tempfile::tempdir().unwrap();
        let destination = temp_dir.path().join("deck.txt");

        let options = SessionOptions {
            export_to: Some(destination.clone()),
            seed: Some(1),
            ..Default::default()
        };
        let script = "add\ncat\na feline\nask\n100000000000\na feline\nwrong\n";
        let (store, output) = run_script(script, options);

        assert_eq!(output.matches("Print the definition of \"cat\":").count(), 3);
        assert!(output.contains("Correct!"));
        assert!(output.contains("Wrong. The right answer is \"a feline\"."));
        assert!(output.ends_with("1 cards have been saved.\n"));
        assert_eq!(store.mistakes_of("cat"), Some(1));
        assert_eq!(
            std::fs::read_to_string(&destination).unwrap(),
            "cat: a feline\n"
        );
    }

    #[test]
    fn test_failed_export_keeps_session_alive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let destination = temp_dir.path().join("no_such_dir").join("deck.txt");

        let script = format!(
            "add\ncat\na feline\nexport\n{}\nhardest card\nexit\n",
            destination.display()
        );
        let (store, output) = run_script(&script, seeded(1));

        assert!(output.contains("Could not save cards: IO error:"));
        assert!(output.contains("There are no cards with errors."));
        assert!(output.ends_with("Bye bye!\n"));
        assert!(!destination.exists());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unreadable_import_keeps_session_alive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("binary.txt");
        std::fs::write(&source, b"cat: a feline\n\xff\xfe: broken\n").unwrap();

        let script = format!(
            "add\ndog\na canine\nimport\n{}\nremove\ndog\nexit\n",
            source.display()
        );
        let (store, output) = run_script(&script, seeded(1));

        assert!(output.contains("Could not load cards: IO error:"));
        assert!(output.contains("The card has been removed."));
        assert!(output.ends_with("Bye bye!\n"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unreadable_log_keeps_session_alive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let copy_path = temp_dir.path().join("copy.log");

        // A directory cannot be read as a log file
        let options = SessionOptions {
            log_path: temp_dir.path().to_path_buf(),
            seed: Some(1),
            ..Default::default()
        };
        let script = format!("log\n{}\nreset stats\nexit\n", copy_path.display());
        let (_, output) = run_script(&script, options);

        assert!(output.contains("Could not save the log:"));
        assert!(!output.contains("The log has been saved."));
        assert!(output.contains("Card statistics have been reset."));
        assert!(!copy_path.exists());
    }
}
