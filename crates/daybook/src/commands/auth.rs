//! `login`, `logout` and `whoami`.

use std::io::BufRead;

use anyhow::{Context, Result, bail};

use crate::app::App;

pub async fn login(app: &App, username: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => read_password()?,
    };

    let response = app.auth().login(username, &password).await?;
    println!("Signed in as {}", response.user.display_name());
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.auth().logout().await?;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    let Some(user) = app.auth().check_auth().await? else {
        bail!("not signed in");
    };

    println!("{} (id {})", user.display_name(), user.id);
    if let Some(phone) = &user.phone {
        println!("phone: {phone}");
    }
    if user.is_vip_active(app.now()) {
        match user.vip_expire_time {
            Some(expires) => println!("VIP until {}", expires.format("%Y-%m-%d")),
            None => println!("VIP"),
        }
    }
    if user.has_diary_lock() {
        println!("diary lock: on");
    }
    Ok(())
}

fn read_password() -> Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading password")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("empty password");
    }
    Ok(password)
}
