use anyhow::Result;

use crate::appointments::render::render_list;
use crate::core::AppConfig;

pub async fn run(take: Option<usize>, json: bool) -> Result<()> {
    super::init_cli_tracing();

    let mut config = AppConfig::default();
    if let Some(take) = take {
        config.upcoming_take = take;
    }

    let mut dashboard = super::dashboard(&config)?;
    let views = dashboard.load().await;

    if json {
        println!("{}", serde_json::to_string_pretty(views)?);
    } else {
        println!("{}", render_list(views, config.locale));
    }

    Ok(())
}
