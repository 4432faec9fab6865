//! `explorer ask`: one question, one answer.

use super::terminal::TerminalSurface;
use super::{AskArgs, load_attachments, resolve_topic};
use anyhow::Result;
use explorer::{ChatSession, ExplorerConfig};
use explorer_interface::{FileStore, GenerativeDriver};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Ask one question, printing the answer as it arrives.
///
/// Ctrl+C cancels the request. Returns an error when the question was
/// refused or the answer failed, so the process exits non-zero.
pub async fn run<D, F>(
    session: &ChatSession<D, F>,
    args: AskArgs,
    config: &ExplorerConfig,
) -> Result<()>
where
    D: GenerativeDriver + ?Sized + 'static,
    F: FileStore + ?Sized,
{
    let topic = resolve_topic(args.topic.as_deref(), config);
    let question = args.question.join(" ");
    let attachments = load_attachments(&args.files)?;
    let parameters = args.sampling.resolve(config.parameters());

    let cancel = CancellationToken::new();
    let watcher = spawn_interrupt_watcher(cancel.clone());

    let mut surface = TerminalSurface::new();
    let outcome = if args.no_stream {
        session
            .ask(&topic, &question, attachments, parameters, &mut surface, &cancel)
            .await
    } else {
        session
            .submit_question_streaming(
                &topic,
                &question,
                attachments,
                parameters,
                &mut surface,
                &cancel,
            )
            .await
    };
    watcher.abort();
    let outcome = outcome?;

    info!(state = %outcome.final_state(), elapsed_secs = outcome.elapsed_secs(), "Ask finished");
    match outcome.error_message() {
        Some(message) => Err(anyhow::anyhow!("{}", message)),
        None => Ok(()),
    }
}

/// Cancel `token` on the first Ctrl+C.
fn spawn_interrupt_watcher(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    })
}
