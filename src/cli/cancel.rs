use std::io::{self, Write};

use anyhow::{Result, bail};

use crate::appointments::Locale;
use crate::appointments::render::render_item;
use crate::core::AppConfig;

fn confirm(locale: Locale) -> Result<bool> {
    print!("{} [y/N]: ", locale.confirm_prompt());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes" | "e" | "evet"))
}

pub async fn run(id: String, yes: bool) -> Result<()> {
    super::init_cli_tracing();

    let config = AppConfig::default();
    let locale = config.locale;
    let mut dashboard = super::dashboard(&config)?;

    let Some(line) = dashboard
        .load()
        .await
        .iter()
        .find(|view| view.id == id)
        .map(|view| render_item(view, locale))
    else {
        bail!("No upcoming appointment with id {}", id);
    };
    println!("{}", line);

    dashboard.select_for_cancel(&id)?;
    if !yes && !confirm(locale)? {
        dashboard.abandon()?;
        println!("{}", locale.abandoned());
        return Ok(());
    }

    dashboard.confirm_cancel().await?;
    println!("{}", locale.cancelled());
    Ok(())
}
