use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Secret used to sign and verify bearer tokens.
    pub jwt_secret: String,
    /// Payment-provider API key. Empty when unset; provider calls then
    /// fail as upstream errors instead of blocking startup.
    pub stripe_secret_key: String,
    /// Payment-provider API base URL. Overridable so tests can point the
    /// client at a local mock server.
    pub stripe_api_base: String,
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let jwt_secret = std::env::var("ACCESS_TOKEN_SECRET").map_err(|_| {
        anyhow::anyhow!(
            "ACCESS_TOKEN_SECRET is not set. Refusing to start: every protected \
             route would reject its requests."
        )
    })?;

    let stripe_secret_key = std::env::var("STRIPE_SECRET_KEY").unwrap_or_else(|_| {
        eprintln!("⚠️  STRIPE_SECRET_KEY is not set. Payment-intent calls will fail until it is configured.");
        String::new()
    });

    Ok(Config {
        port: std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .unwrap_or(5000),
        jwt_secret,
        stripe_secret_key,
        stripe_api_base: std::env::var("STRIPE_API_BASE")
            .unwrap_or_else(|_| "https://api.stripe.com".into()),
    })
}
