use crossterm::cursor::MoveTo;
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use clap::Parser;
use crossterm::{execute, queue};
use std::io::{self, stdout, Write};
use std::path::{Path, PathBuf};
use typing_core::config::SessionConfig;
use typing_core::corpus::PhraseCorpus;
use typing_core::logging::init_file_logger;
use typing_core::progress::ChallengeSummary;
use typing_core::{KeyOutcome, TypingSession};

const PROGRESS_PATH: &str = "typing_progress.bin";
const LOG_PATH: &str = "typing_trainer.log";

#[derive(Parser)]
#[command(name = "typing_trainer")]
#[command(about = "Interactive romaji typing trainer")]
#[command(version)]
struct Cli {
    /// Phrase corpus (tab-separated: display, phonetic, difficulty, language)
    corpus: PathBuf,

    /// Session config JSON
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

/// What the screen shows below the phrase.
struct View {
    show_hint: bool,
    last_miss: bool,
    last_result: Option<ChallengeSummary>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_file_logger(Path::new(LOG_PATH), log::LevelFilter::Info) {
        eprintln!("[WARN] Could not open log file: {}", e);
    }

    let mut session = match open_session(&cli.corpus, cli.config.as_deref()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            std::process::exit(1);
        }
    };
    if session.start_next().is_none() {
        eprintln!("No phrases available for the configured language and difficulty.");
        std::process::exit(1);
    }

    let result = enable_raw_mode().and_then(|_| run(&mut session));
    let _ = disable_raw_mode();
    if let Err(e) = result {
        eprintln!("[ERROR] Terminal failure: {}", e);
    }

    let progress = session.progress();
    println!(
        "\nCompleted {} phrases, accuracy {:.1}%",
        progress.completed(),
        progress.accuracy() * 100.0
    );
    match session.save_progress() {
        Ok(()) => println!("Progress saved."),
        Err(e) => eprintln!("[ERROR] Could not save progress: {}", e),
    }
}

fn open_session(corpus_path: &Path, config_path: Option<&Path>) -> typing_core::Result<TypingSession> {
    let mut config = match config_path {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };
    if config.progress_path.is_none() {
        config.progress_path = Some(PathBuf::from(PROGRESS_PATH));
    }
    let corpus = PhraseCorpus::from_path(corpus_path)?;
    let tables = config.rule_tables()?;
    TypingSession::from_config(&corpus, &tables, &config)
}

fn run(session: &mut TypingSession) -> io::Result<()> {
    let mut view = View { show_hint: false, last_miss: false, last_result: None };
    loop {
        draw(session, &view)?;

        let Event::Key(KeyEvent { code, modifiers, kind, .. }) = read()? else {
            continue;
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
            KeyCode::Tab => view.show_hint = !view.show_hint,
            KeyCode::Char(key) => match session.press(key) {
                Ok(KeyOutcome::Correct) => view.last_miss = false,
                Ok(KeyOutcome::Incorrect) => view.last_miss = true,
                Ok(KeyOutcome::Completed(summary)) => {
                    view.last_miss = false;
                    view.last_result = Some(summary);
                    if session.start_next().is_none() {
                        return Ok(());
                    }
                }
                Err(e) => log::warn!("Ignored key '{}': {}", key, e),
            },
            _ => {}
        }
    }
}

fn draw(session: &TypingSession, view: &View) -> io::Result<()> {
    let mut out = stdout();
    queue!(out, Clear(ClearType::All), MoveTo(0, 0), Print("Kana Typing Trainer".bold()))?;
    queue!(out, MoveTo(0, 1), Print("Type the romaji. [Tab] toggles the hint, [Esc] quits."))?;

    if let Some(challenge) = session.current() {
        queue!(out, MoveTo(0, 3), Print(challenge.display_text().bold()))?;
        queue!(out, MoveTo(0, 4), Print(challenge.phonetic_text()))?;

        let typed = challenge.typed_sequence();
        queue!(out, MoveTo(0, 6), Print("> "), Print(typed.as_str().green()))?;
        if view.show_hint {
            queue!(out, Print(challenge.shortest_remaining_sequence().dark_grey()))?;
        }
        if view.last_miss {
            queue!(out, MoveTo(0, 7), Print("miss".red()))?;
        }
    }

    if let Some(last) = &view.last_result {
        let line = format!(
            "Last: {} as '{}' ({} keys, {} mistakes, {:.0}%)",
            last.display,
            last.typed,
            last.keystrokes,
            last.mistakes,
            last.accuracy() * 100.0
        );
        queue!(out, MoveTo(0, 9), Print(line))?;
    }
    let progress = session.progress();
    let totals = format!("Completed: {}  Mistakes: {}", progress.completed(), progress.mistakes());
    queue!(out, MoveTo(0, 10), Print(totals))?;
    execute!(out, MoveTo(cursor_column(session).saturating_add(2), 6))?;
    out.flush()
}

fn cursor_column(session: &TypingSession) -> u16 {
    session
        .current()
        .map(|c| u16::try_from(c.typed_sequence().chars().count()).unwrap_or(u16::MAX))
        .unwrap_or(0)
}
