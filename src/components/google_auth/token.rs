use crate::config::Config;
use crate::error::{google_calendar_error, SummaryResult};
use chrono::Utc;
use redis::{AsyncCommands, Client as RedisClient};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Redis key holding the OAuth token
pub const TOKEN_KEY: &str = "calendar_summary:google_token";

/// OAuth token endpoint
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Scopes needed to read calendars and write spreadsheets into Drive
pub const SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/calendar.readonly",
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/spreadsheets",
];

/// Refresh this many seconds before the token actually expires
const EXPIRY_MARGIN_SECONDS: i64 = 60;

/// Token as persisted in Redis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp in seconds
    pub expires_at: i64,
}

impl StoredToken {
    pub fn is_fresh(&self, now: i64) -> bool {
        self.expires_at - EXPIRY_MARGIN_SECONDS > now
    }
}

/// Response of the token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Clone)]
pub struct TokenManager {
    client_id: String,
    client_secret: String,
    client: Client,
    redis: RedisClient,
}

impl TokenManager {
    pub fn new(config: &Config) -> SummaryResult<Self> {
        let redis = RedisClient::open(config.redis_url.as_str())?;

        Ok(Self {
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            client: Client::new(),
            redis,
        })
    }

    /// Get a valid access token, refreshing it when expired
    pub async fn access_token(&self) -> SummaryResult<String> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let stored: Option<String> = conn.get(TOKEN_KEY).await?;
        let stored = stored.ok_or_else(|| {
            google_calendar_error("No token found. Run the `authorize` binary first.")
        })?;
        let token: StoredToken = serde_json::from_str(&stored)?;

        if token.is_fresh(Utc::now().timestamp()) {
            return Ok(token.access_token);
        }

        debug!("Access token expired, refreshing");
        let refreshed = self.refresh(&token).await?;
        Ok(refreshed.access_token)
    }

    /// Refresh an expired token and persist the result
    async fn refresh(&self, token: &StoredToken) -> SummaryResult<StoredToken> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", token.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self.request_token(&params).await?;
        let refreshed = StoredToken {
            access_token: response.access_token,
            refresh_token: response
                .refresh_token
                .unwrap_or_else(|| token.refresh_token.clone()),
            expires_at: Utc::now().timestamp() + response.expires_in.unwrap_or(3600),
        };

        self.set_token(&refreshed).await?;
        Ok(refreshed)
    }

    /// Exchange an authorization code for a token and persist it
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> SummaryResult<StoredToken> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        let response = self.request_token(&params).await?;
        let refresh_token = response.refresh_token.ok_or_else(|| {
            google_calendar_error("Token response missing 'refresh_token' field")
        })?;
        let token = StoredToken {
            access_token: response.access_token,
            refresh_token,
            expires_at: Utc::now().timestamp() + response.expires_in.unwrap_or(3600),
        };

        self.set_token(&token).await?;
        info!("Stored new Google token in Redis");
        Ok(token)
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> SummaryResult<TokenResponse> {
        let response = self.client.post(TOKEN_ENDPOINT).form(params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Token request failed: HTTP {} - {}",
                status, error_body
            )));
        }

        Ok(response.json::<TokenResponse>().await?)
    }

    /// Store a token in Redis
    pub async fn set_token(&self, token: &StoredToken) -> SummaryResult<()> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(TOKEN_KEY, serde_json::to_string(token)?)
            .await?;
        Ok(())
    }
}
