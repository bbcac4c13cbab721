//! `transcribe` and `locate`.

use std::path::Path;

use anyhow::{Result, bail};

use daybook_core::recording::transcribe_file;

use crate::app::App;

pub async fn transcribe(app: &App, path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("{} is not a file", path.display());
    }
    let text = transcribe_file(&app.client, path).await?;
    println!("{text}");
    Ok(())
}

pub async fn locate(app: &App, lat: f64, lng: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        bail!("coordinates out of range: {lat}, {lng}");
    }
    let address = app.client.reverse_geocode(lat, lng).await?;
    println!("{address}");
    Ok(())
}
