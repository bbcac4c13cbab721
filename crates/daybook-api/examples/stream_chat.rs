//! Example: stream one assistant reply to the terminal
//!
//! ## Prerequisites
//!
//! ```bash
//! export DAYBOOK_BASE_URL="https://daybook.example.com"
//! export DAYBOOK_USERNAME="lin"
//! export DAYBOOK_PASSWORD="secret"
//! ```
//!
//! ## Running
//!
//! ```bash
//! cargo run --example stream_chat -- "I finally finished the book today"
//! ```

use std::env;
use std::io::Write;

use daybook_api::{ApiClient, HistoryEntry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = env::var("DAYBOOK_BASE_URL")?;
    let username = env::var("DAYBOOK_USERNAME")?;
    let password = env::var("DAYBOOK_PASSWORD")?;
    let text = env::args().skip(1).collect::<Vec<_>>().join(" ");

    let mut client = ApiClient::new(&base_url)?;
    let login = client.login(&username, &password).await?;
    println!("Signed in as {}\n", login.user.display_name());
    client.set_token(Some(login.token));

    let history: Vec<HistoryEntry> = Vec::new();
    let reply = client
        .chat(login.user.id, &text, &history, |token| {
            print!("{token}");
            let _ = std::io::stdout().flush();
        })
        .await?;

    println!("\n\n({} chars)", reply.chars().count());
    Ok(())
}
