//! Migrate command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_migrate(config: &Config) -> anyhow::Result<()> {
    let store = Store::from_config(&config.database).await?;

    let seeded = store
        .bootstrap_admin(&config.auth, &config.security)
        .await?;

    println!("Migrations applied.");
    if seeded {
        println!("Seeded admin user '{}'.", config.auth.admin_username);
    }

    Ok(())
}
