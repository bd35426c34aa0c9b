use crate::render::paint;
use anyhow::Context;
use marketlens_core::chat::{reveal_chunks, ChatSession, SendOutcome};
use marketlens_core::domain::chat::ChatMessage;
use marketlens_core::llm::gemini::GeminiClient;
use marketlens_core::view::BadgeColor;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

const REVEAL_DELAY: Duration = Duration::from_millis(30);

pub async fn ask_once(client: GeminiClient, text: &str) -> anyhow::Result<()> {
    let mut session = ChatSession::new(Arc::new(client));
    turn(&mut session, text).await
}

/// Line-oriented chat until EOF, `/quit` or Ctrl-C.
pub async fn repl(client: GeminiClient) -> anyhow::Result<()> {
    let mut session = ChatSession::new(Arc::new(client));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Ask about stocks, sectors or market news. /quit to exit.");
    loop {
        prompt()?;
        let line = match interruptible(lines.next_line(), tokio::signal::ctrl_c()).await {
            Some(line) => line.context("failed to read stdin")?,
            None => None,
        };
        let Some(line) = line else {
            break;
        };

        let line = line.trim();
        if matches!(line, "/quit" | "/exit") {
            break;
        }
        // A turn can sit in backoff for several seconds; Ctrl-C abandons it.
        match interruptible(turn(&mut session, line), tokio::signal::ctrl_c()).await {
            Some(res) => res?,
            None => {
                println!();
                break;
            }
        }
    }

    tracing::info!(turns = session.transcript().len(), "chat session ended");
    Ok(())
}

/// Runs `work` unless `interrupt` completes first.
async fn interruptible<T, I>(work: impl Future<Output = T>, interrupt: I) -> Option<T>
where
    I: Future,
{
    tokio::select! {
        out = work => Some(out),
        _ = interrupt => None,
    }
}

/// Sends one turn and prints the reply. Failures are reported to Sentry here only;
/// the session logs them below error level.
async fn turn(session: &mut ChatSession, text: &str) -> anyhow::Result<()> {
    let outcome = session.send(text).await;
    if let Some(err) = outcome.error() {
        sentry_anyhow::capture_anyhow(err);
    }
    if matches!(outcome, SendOutcome::Ignored) {
        return Ok(());
    }

    if let Some(reply) = session.last() {
        tracing::debug!(message_id = %reply.id, sources = reply.sources.len(), "chat turn finished");
        print_reply(reply).await?;
    }
    Ok(())
}

async fn print_reply(reply: &ChatMessage) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}: ", reply.role.label())?;
    if reply.is_error {
        writeln!(stdout, "{}", paint(&reply.text, BadgeColor::Red))?;
        return Ok(());
    }

    for chunk in reveal_chunks(&reply.text) {
        write!(stdout, "{chunk}")?;
        stdout.flush()?;
        tokio::time::sleep(REVEAL_DELAY).await;
    }
    writeln!(stdout)?;

    if !reply.sources.is_empty() {
        writeln!(stdout, "{}", paint("Sources:", BadgeColor::Gray))?;
        for (idx, source) in reply.sources.iter().enumerate() {
            writeln!(stdout, "  [{}] {} {}", idx + 1, source.title, paint(&source.uri, BadgeColor::Gray))?;
        }
    }
    Ok(())
}

fn prompt() -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "\n> ")?;
    stdout.flush()?;
    Ok(())
}
