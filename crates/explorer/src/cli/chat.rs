//! `explorer chat`: interactive session with slash commands.

use super::terminal::TerminalSurface;
use super::{ChatArgs, load_attachments, resolve_topic};
use anyhow::Result;
use explorer::{ChatSession, ExplorerConfig};
use explorer_core::{Topic, UploadedAsset};
use explorer_error::ExplorerErrorKind;
use explorer_interface::{FileStore, GenerativeDriver};
use std::io::Write;
use std::path::PathBuf;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  /topic <name>   switch topic (see /topics)
  /topics         list topics
  /attach <path>  attach a file to the next question
  /history        show the conversation so far
  /clear          clear the conversation
  /help           show this help
  /quit           exit

Ctrl+C cancels an answer in progress; at the prompt it exits.";

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Question(String),
    Topic(Option<String>),
    Topics,
    Attach(PathBuf),
    History,
    Clear,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Some(Input::Question(line.to_string()));
        };
        let (name, rest) = match command.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (command, ""),
        };
        Some(match name {
            "topic" if rest.is_empty() => Input::Topic(None),
            "topic" => Input::Topic(Some(rest.to_string())),
            "topics" => Input::Topics,
            "attach" if !rest.is_empty() => Input::Attach(PathBuf::from(rest)),
            "history" => Input::History,
            "clear" => Input::Clear,
            "help" => Input::Help,
            "quit" | "exit" => Input::Quit,
            _ => Input::Unknown(line.to_string()),
        })
    }
}

/// Run the interactive loop until `/quit`, end of input, or Ctrl+C at the
/// prompt.
pub async fn run<D, F>(
    session: &ChatSession<D, F>,
    args: ChatArgs,
    config: &ExplorerConfig,
) -> Result<()>
where
    D: GenerativeDriver + ?Sized + 'static,
    F: FileStore + ?Sized,
{
    let mut topic = resolve_topic(args.topic.as_deref(), config);
    let parameters = args.sampling.resolve(config.parameters());
    let mut pending_files: Vec<PathBuf> = Vec::new();

    println!("Knowledge Explorer chat on {} (/help for commands, /quit to exit)", topic);
    println!("---");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("[{}] > ", topic);
        std::io::stdout().flush().ok();

        let interrupt = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        let Some(line) = read_line(&mut lines, interrupt).await? else {
            break;
        };
        let Some(input) = Input::parse(&line) else {
            continue;
        };
        debug!(?input, "Chat input");

        match input {
            Input::Quit => break,
            Input::Help => println!("{}", HELP),
            Input::Topics => super::print_topics(),
            Input::Topic(None) => println!("Current topic: {}", topic),
            Input::Topic(Some(name)) => {
                topic = match Topic::from_label(&name) {
                    Some(known) => known.label().to_string(),
                    None => {
                        println!("Unknown topic '{}', using the general persona", name);
                        name
                    }
                };
                println!("Topic set to {}", topic);
            }
            Input::Attach(path) => {
                println!("Will attach {} to the next question", path.display());
                pending_files.push(path);
            }
            Input::History => {
                for turn in session.history() {
                    println!("{}: {}\n", turn.role(), turn.content());
                }
            }
            Input::Clear => match session.clear_history() {
                Ok(()) => println!("Conversation cleared"),
                Err(e) => eprintln!("{}", e.kind()),
            },
            Input::Unknown(text) => println!("Unknown command: {} (try /help)", text),
            Input::Question(question) => {
                let attachments: Vec<UploadedAsset> =
                    match load_attachments(&std::mem::take(&mut pending_files)) {
                        Ok(assets) => assets,
                        Err(e) => {
                            eprintln!("{}", e);
                            continue;
                        }
                    };

                let cancel = CancellationToken::new();
                let mut surface = TerminalSurface::new();
                let submit = session.submit_question_streaming(
                    &topic,
                    &question,
                    attachments,
                    parameters,
                    &mut surface,
                    &cancel,
                );
                tokio::pin!(submit);
                let result = loop {
                    tokio::select! {
                        result = &mut submit => break result,
                        _ = tokio::signal::ctrl_c() => {
                            debug!("Interrupt; cancelling the answer");
                            cancel.cancel();
                        }
                    }
                };

                if let Err(e) = result {
                    match e.kind() {
                        ExplorerErrorKind::Session(err) => eprintln!("{}", err.kind()),
                        ExplorerErrorKind::Generation(err) => eprintln!("{}", err.kind()),
                        other => {
                            warn!(error = %other, "Question refused");
                            eprintln!("{}", other);
                        }
                    }
                }
                println!();
            }
        }
    }

    Ok(())
}

/// Next line typed at the prompt, or `None` once input ends or `interrupt`
/// fires first.
async fn read_line<R>(
    lines: &mut Lines<R>,
    interrupt: impl Future<Output = ()>,
) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    tokio::select! {
        line = lines.next_line() => line,
        _ = interrupt => {
            println!();
            Ok(None)
        }
    }
}
