use calendar_summary::components::google_auth::token::{TokenManager, SCOPES};
use calendar_summary::config::Config;
use calendar_summary::error::{other_error, SummaryResult};
use url::Url;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const REDIRECT_URI: &str = "http://localhost:8080";

/// Extract the authorization code from the callback path, checking `state`
fn callback_code(request_url: &str, state: &str) -> SummaryResult<String> {
    let url = Url::parse(REDIRECT_URI)
        .and_then(|base| base.join(request_url))
        .map_err(|e| other_error(&format!("Invalid callback URL: {}", e)))?;

    let mut code = None;
    let mut returned_state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => returned_state = Some(value.into_owned()),
            "error" => return Err(other_error(&format!("Authorization denied: {}", value))),
            _ => {}
        }
    }

    if returned_state.as_deref() != Some(state) {
        return Err(other_error("Authorization state mismatch"));
    }
    code.ok_or_else(|| other_error("No authorization code found in callback"))
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let config = Config::load()?;
    let token_manager = TokenManager::new(&config)?;

    // Random state guards against forged callbacks
    let state = uuid::Uuid::new_v4().to_string();
    let scope = SCOPES.join(" ");

    let auth_url = Url::parse_with_params(
        AUTH_ENDPOINT,
        &[
            ("client_id", config.google_client_id.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("response_type", "code"),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("scope", scope.as_str()),
            ("state", state.as_str()),
        ],
    )
    .map_err(|e| other_error(&format!("Failed to build authorization URL: {}", e)))?;

    println!("Opening browser for Google authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Open this URL manually: {}", auth_url);
    }

    let server = tiny_http::Server::http("0.0.0.0:8080")
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    let request = server.recv().map_err(calendar_summary::error::Error::from)?;
    let code = match callback_code(request.url(), &state) {
        Ok(code) => code,
        Err(e) => {
            let response = tiny_http::Response::from_string(format!("Authorization failed: {}", e));
            request.respond(response).map_err(calendar_summary::error::Error::from)?;
            return Err(e.into());
        }
    };

    token_manager.exchange_code(&code, REDIRECT_URI).await?;

    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response).map_err(calendar_summary::error::Error::from)?;

    println!("Token successfully saved to Redis!");
    Ok(())
}
