//! `chat` and `chat-image`.

use std::path::Path;

use anyhow::{Result, bail};
use daybook_api::ApiClient;
use daybook_core::{ChatSession, Clock, Inbox, OperationCard};

use super::FramePrinter;
use crate::app::App;

/// Builds a chat session with the stored history restored.
pub async fn open_session(app: &App) -> Result<ChatSession<ApiClient>> {
    let user_id = app.user_id().await?;
    let session = ChatSession::new(app.client.clone(), user_id, app.session_context())
        .with_store(app.store.clone())
        .with_interval(app.settings.typewriter_interval());
    session.restore().await?;
    Ok(session)
}

pub async fn chat(app: &App, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("nothing to send");
    }

    let session = open_session(app).await?;
    show_pending(app, &session).await?;
    show_operation_card(app).await?;

    let mut printer = FramePrinter::default();
    session.send(text, |frame| printer.frame(frame)).await?;
    printer.finish();
    Ok(())
}

pub async fn chat_image(app: &App, path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("{} is not a file", path.display());
    }

    let session = open_session(app).await?;
    let mut printer = FramePrinter::default();
    session.send_image(path, |frame| printer.frame(frame)).await?;
    printer.finish();
    Ok(())
}

async fn show_pending(app: &App, session: &ChatSession<ApiClient>) -> Result<()> {
    let inbox = Inbox::new(app.store.clone());
    let pending = inbox.take_all().await?;
    for message in &pending {
        println!("[while you were away] {}", message.text);
    }
    session.absorb(pending);
    Ok(())
}

async fn show_operation_card(app: &App) -> Result<()> {
    let card = OperationCard::new(app.store.clone())
        .with_interval(app.settings.operation_card_interval());
    let now = app.clock.now();
    if card.should_show(now).await? {
        println!("Tip: `daybook diary generate` turns today's chat into a diary.");
        card.mark_shown(now).await?;
    }
    Ok(())
}
