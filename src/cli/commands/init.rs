use anyhow::{Context, Result};
use clap::Args;

use crate::domain::models::Config;
use crate::infrastructure::config::{ConfigLoader, CONFIG_DIR, CONFIG_FILE};

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Create the project configuration directory, write the default config, and
/// initialize the database schema.
pub async fn execute(args: InitArgs, json: bool) -> Result<()> {
    std::fs::create_dir_all(CONFIG_DIR)
        .with_context(|| format!("failed to create {}", CONFIG_DIR))?;

    let config_path = std::path::Path::new(CONFIG_FILE);
    let wrote_config = if config_path.exists() && !args.force {
        false
    } else {
        let yaml = serde_yaml::to_string(&Config::default())
            .context("failed to serialize default config")?;
        std::fs::write(config_path, yaml)
            .with_context(|| format!("failed to write {}", CONFIG_FILE))?;
        true
    };

    let config = ConfigLoader::load()?;
    let db = super::open_database(&config).await?;
    db.close().await;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "status": "success",
                "config_file": CONFIG_FILE,
                "config_written": wrote_config,
                "database": config.database.path,
            })
        );
    } else {
        if wrote_config {
            println!("Wrote {}", CONFIG_FILE);
        } else {
            println!("{} already exists, keeping it (use --force to overwrite)", CONFIG_FILE);
        }
        println!("Database ready at {}", config.database.path);
    }

    Ok(())
}
