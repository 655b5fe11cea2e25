use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::config::AppConfig;

/// Print a signed token for `id`. The account is only checked when the
/// token is presented to the server.
pub fn handle(config: &AppConfig, id: Uuid, username: &str) -> anyhow::Result<()> {
    let claims = Claims::new(id, username, config.security.jwt_expiry_hours);
    let token = generate_jwt(&claims, &config.security.jwt_secret)?;
    println!("{}", token);
    Ok(())
}
