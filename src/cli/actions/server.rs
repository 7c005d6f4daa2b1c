use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::vikio;
use anyhow::{Context, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server { port, dsn } => {
            // Fail early on a malformed connection string instead of at pool time
            let dsn = Url::parse(&dsn).context("Invalid database connection string")?;

            vikio::new(port, dsn.to_string(), globals).await?;
        }
    }

    Ok(())
}
