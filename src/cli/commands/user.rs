//! User command handlers

use anyhow::Context;
use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthError, AuthService, SeaOrmAuthService, TokenSigner};

pub async fn cmd_user_add(
    config: &Config,
    username: &str,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };

    let store = Store::from_config(&config.database).await?;
    let (secret, _) = config.auth.signing_secret();
    let auth = SeaOrmAuthService::new(
        store,
        TokenSigner::new(secret, config.auth.token_ttl_hours),
        config.security.clone(),
    );

    match auth.register(username, &password, "cli").await {
        Ok(user) => {
            println!("Created user '{}' (id {})", user.username, user.user_id);
            Ok(())
        }
        Err(AuthError::DuplicateIdentity(name)) => {
            anyhow::bail!("User '{name}' already exists")
        }
        Err(e) => Err(e.into()),
    }
}

fn prompt_password() -> anyhow::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
