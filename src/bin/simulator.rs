use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use typing_core::config::SessionConfig;
use typing_core::corpus::PhraseCorpus;
use typing_core::logging::init_file_logger;
use typing_core::{KeyOutcome, TypingSession};

#[derive(Parser)]
#[command(name = "typing_driver")]
#[command(about = "Line-oriented driver for scripted typing sessions")]
#[command(version)]
struct Cli {
    /// Phrase corpus (tab-separated: display, phonetic, difficulty, language)
    corpus: PathBuf,

    /// Session config JSON
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

fn get_log_path() -> PathBuf {
    let mut path = PathBuf::from("target");
    path.push("typing_driver.log");
    path
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_file_logger(&get_log_path(), log::LevelFilter::Debug) {
        eprintln!("[WARN] Could not open log file: {}", e);
    }
    log::info!("--- Typing driver starting ---");

    let session = match open_session(&cli.corpus, cli.config.as_deref()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            return ExitCode::FAILURE;
        }
    };
    match run(session) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("stdin/stdout failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn open_session(corpus_path: &Path, config_path: Option<&Path>) -> typing_core::Result<TypingSession> {
    let config = match config_path {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };
    let corpus = PhraseCorpus::from_path(corpus_path)?;
    let tables = config.rule_tables()?;
    TypingSession::from_config(&corpus, &tables, &config)
}

fn run(mut session: TypingSession) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let input = line?;
        log::debug!("<- {:?}", input);
        let (command, rest) = match input.split_once(' ') {
            Some((command, rest)) => (command, rest),
            None => (input.as_str(), ""),
        };

        let reply = match command {
            "NEXT" => match session.start_next() {
                Some(challenge) => {
                    format!("CHALLENGE {} {}", challenge.display_text(), challenge.phonetic_text())
                }
                None => "NONE".to_string(),
            },
            "KEY" => match rest.chars().next() {
                Some(key) => match session.press(key) {
                    Ok(KeyOutcome::Correct) => "CORRECT".to_string(),
                    Ok(KeyOutcome::Incorrect) => "INCORRECT".to_string(),
                    Ok(KeyOutcome::Completed(summary)) => format!("FINISHED {}", summary.typed),
                    Err(e) => format!("ERROR {}", e),
                },
                None => "ERROR missing key".to_string(),
            },
            "HINT" => match session.hint() {
                Some(hint) => format!("HINT {}", hint),
                None => "NONE".to_string(),
            },
            "TYPED" => match session.typed() {
                Some(typed) => format!("TYPED {}", typed),
                None => "NONE".to_string(),
            },
            "EXIT" => {
                log::info!("Received EXIT, saving progress.");
                if let Err(e) = session.save_progress() {
                    log::error!("Error saving progress: {}", e);
                }
                break;
            }
            _ => {
                log::warn!("Unknown command: {:?}", command);
                format!("ERROR unknown command {}", command)
            }
        };
        log::debug!("-> {:?}", reply);
        writeln!(stdout, "{}", reply)?;
        stdout.flush()?;
    }
    log::info!("Shutting down.");
    Ok(())
}
