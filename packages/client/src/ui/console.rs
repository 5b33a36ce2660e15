//! Interactive playback console.
//!
//! Lines are read on a blocking thread (rustyline) and forwarded over a
//! channel; the async loop owns the sequencer, the throttle and the
//! stream resolver.

use std::sync::Arc;

use boostroom_shared::time::timestamp_to_rfc3339;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    domain::{PlaybackSignal, ResolveError, Submission, SubmissionId, ThrottleState},
    error::ClientError,
    usecase::{Remaining, ShuffleSequencer, StreamResolver},
};

use super::runner::AppContext;

const PROMPT: &str = "boostroom> ";

/// Console commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Shuffle,
    /// The player reports that the current track finished
    End,
    Skip,
    Stop,
    Now,
    Boost,
    Login,
    Logout,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    /// Parse a console line; blank lines yield `None`
    pub fn parse(line: &str) -> Option<Self> {
        let word = line.split_whitespace().next()?.to_ascii_lowercase();
        let command = match word.as_str() {
            "shuffle" | "play" => Self::Shuffle,
            "end" | "ended" => Self::End,
            "skip" | "next" => Self::Skip,
            "stop" => Self::Stop,
            "now" => Self::Now,
            "boost" => Self::Boost,
            "login" => Self::Login,
            "logout" => Self::Logout,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(word),
        };
        Some(command)
    }
}

pub(super) async fn run(
    mut context: AppContext,
    mut submissions: Vec<Submission>,
) -> Result<(), ClientError> {
    if submissions.is_empty() {
        println!("No submissions given. Pass track ids or --file.");
        return Ok(());
    }

    let signal = PlaybackSignal::new();
    let mut sequencer = ShuffleSequencer::new(signal.clone());

    let (now_playing_tx, mut now_playing_rx) = mpsc::unbounded_channel::<Submission>();
    sequencer.on_change(move |submission| {
        let _ = now_playing_tx.send(submission.clone());
    });

    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    spawn_line_reader(line_tx);

    println!("{} submission(s) loaded.", submissions.len());
    print_help();

    loop {
        tokio::select! {
            Some(submission) = now_playing_rx.recv() => {
                announce(&context.streams, &submission).await;
            }
            line = line_rx.recv() => {
                let Some(line) = line else { break };
                let Some(command) = ConsoleCommand::parse(&line) else { continue };
                match command {
                    ConsoleCommand::Shuffle => sequencer.start_shuffle(submissions.clone()),
                    ConsoleCommand::End => {
                        signal.notify_ended();
                        if sequencer.handle_playback_events() == 0 {
                            println!("Track ended. Autoplay is off.");
                        }
                    }
                    ConsoleCommand::Skip => {
                        if sequencer.is_active() {
                            sequencer.advance();
                        } else {
                            println!("Shuffle is not running.");
                        }
                    }
                    ConsoleCommand::Stop => {
                        sequencer.stop();
                        println!("Shuffle stopped.");
                    }
                    ConsoleCommand::Now => match sequencer.current_submission() {
                        Some(current) => println!("Now: {}", describe(current)),
                        None => println!("Nothing is playing."),
                    },
                    ConsoleCommand::Boost => {
                        let current = sequencer.current_submission().map(|s| s.id.clone());
                        boost(&mut context, &mut submissions, current.as_ref());
                    }
                    ConsoleCommand::Login => {
                        context.throttle.set_authenticated(true);
                        println!("Signed in. Boosts are unlimited.");
                    }
                    ConsoleCommand::Logout => {
                        context.throttle.set_authenticated(false);
                        println!("Signed out.");
                    }
                    ConsoleCommand::Status => print_status(&mut context, &sequencer).await,
                    ConsoleCommand::Help => print_help(),
                    ConsoleCommand::Quit => break,
                    ConsoleCommand::Unknown(word) => {
                        println!("Unknown command '{}'. Type 'help'.", word);
                    }
                }
            }
        }
    }

    sequencer.stop();
    Ok(())
}

/// Read lines on a dedicated thread; EOF and Ctrl-C end the console
fn spawn_line_reader(tx: mpsc::UnboundedSender<String>) {
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to open console: {}", e);
                let _ = tx.send("quit".to_string());
                return;
            }
        };

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                    let _ = tx.send("quit".to_string());
                    break;
                }
                Err(e) => {
                    tracing::error!("Console read failed: {}", e);
                    let _ = tx.send("quit".to_string());
                    break;
                }
            }
        }
    });
}

async fn announce(streams: &Arc<StreamResolver>, submission: &Submission) {
    let Some(track_id) = &submission.track_id else {
        println!("▶ {} (no track attached, use 'skip')", describe(submission));
        return;
    };

    match streams.resolve_stream(track_id.as_str()).await {
        Ok(url) => println!("▶ {}\n  {}", describe(submission), url),
        Err(ResolveError::ConfigurationMissing) => {
            println!("▶ {} (streaming is not configured)", describe(submission));
        }
        Err(e) => println!("▶ {} (unplayable: {})", describe(submission), e),
    }
}

fn boost(
    context: &mut AppContext,
    submissions: &mut [Submission],
    current: Option<&SubmissionId>,
) {
    let Some(current) = current else {
        println!("Nothing is playing.");
        return;
    };

    if !context.throttle.can_perform() {
        println!("Guest boost limit reached. 'login' to keep boosting.");
        return;
    }
    context.throttle.consume();

    if let Some(submission) = submissions.iter_mut().find(|s| &s.id == current) {
        submission.boost_count += 1;
        println!("Boosted {} ({} total).", submission.title, submission.boost_count);
    }
    match context.throttle.remaining() {
        Remaining::Unbounded => {}
        Remaining::Limited(n) => println!("{} guest boost(s) left.", n),
    }
}

async fn print_status(context: &mut AppContext, sequencer: &ShuffleSequencer) {
    let queue = sequencer.queue();
    println!(
        "Shuffle: {} ({}/{})",
        if queue.is_active() { "on" } else { "off" },
        if queue.is_empty() { 0 } else { queue.position() + 1 },
        queue.len()
    );
    let remaining = context.throttle.remaining();
    let state = context.throttle.current_state();
    println!("{}", boost_status(remaining, &state));
    println!(
        "Host container: {}",
        if context.rewriter.is_hosted_in_container() {
            format!("yes, {} mapping(s)", context.rewriter.mappings().len())
        } else {
            "no".to_string()
        }
    );
    match context.config.resolved().await {
        Some(config) => println!("Provider app: {}", config.app_name),
        None => println!("Provider config: not resolved"),
    }
}

fn boost_status(remaining: Remaining, state: &ThrottleState) -> String {
    match remaining {
        Remaining::Unbounded => "Boosts: unlimited (signed in)".to_string(),
        Remaining::Limited(n) if state.guest_action_count == 0 => {
            format!("Boosts: {} left (guest)", n)
        }
        Remaining::Limited(n) => format!(
            "Boosts: {} left (guest session since {})",
            n,
            timestamp_to_rfc3339(state.session_started_at.value())
        ),
    }
}

fn describe(submission: &Submission) -> String {
    format!("{} [{}]", submission.title, submission.id)
}

fn print_help() {
    println!("Commands:");
    println!("  shuffle   start shuffle playback");
    println!("  end       report that the current track ended");
    println!("  skip      jump to the next submission");
    println!("  stop      stop shuffle playback");
    println!("  now       show the current submission");
    println!("  boost     boost the current submission");
    println!("  login     sign in (unlimited boosts)");
    println!("  logout    sign out");
    println!("  status    show playback, boost and proxy state");
    println!("  quit      exit");
}
