//! OAuth installed-app flow with a local callback receiver.
//!
//! Tokens are held in memory for the life of the process; every run signs
//! in again through the browser.

use anyhow::{Context, Result, anyhow};
use calgen_core::TokenSource;
use calgen_core::config::AppConfig;
use google_calendar::Client;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::calendar::GoogleCalendar;
use crate::credentials::Credentials;

const CALLBACK_PATH: &str = "/callback";

/// Everything needed to send the user through Google's consent screen.
#[derive(Debug, Clone)]
pub struct OAuthFlow {
    creds: Credentials,
    scopes: Vec<String>,
    port: u16,
    application_name: String,
}

/// A signed-in session.
pub struct Session {
    creds: Credentials,
    redirect_uri: String,
    access_token: String,
    refresh_token: String,
}

impl OAuthFlow {
    pub fn new(creds: Credentials, scopes: Vec<String>, port: u16, application_name: String) -> Self {
        OAuthFlow {
            creds,
            scopes,
            port,
            application_name,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let creds = Credentials::load(config.credentials_path()?)?;

        Ok(Self::new(
            creds,
            config.scopes.clone(),
            config.oauth_port,
            config.application_name.clone(),
        ))
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}{}", self.port, CALLBACK_PATH)
    }

    fn redirect_address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Open the consent page, wait for the redirect, and exchange the code for tokens.
    pub async fn authorize(&self) -> Result<Session> {
        let redirect_uri = self.redirect_uri();

        let mut client = Client::new(
            self.creds.client_id.clone(),
            self.creds.client_secret.clone(),
            redirect_uri.clone(),
            String::new(),
            String::new(),
        );

        let auth_url = client.user_consent_url(&self.scopes);

        // Bind before opening the browser so a fast redirect isn't missed
        let listener = TcpListener::bind(self.redirect_address())
            .await
            .with_context(|| format!("Failed to bind OAuth callback listener on port {}", self.port))?;

        info!("Open this URL in your browser to authenticate:\n\n{}\n", auth_url);

        if open::that(&auth_url).is_err() {
            warn!("Could not open browser automatically, please copy the URL above");
        }

        let (code, state) = self.wait_for_callback(&listener).await?;

        debug!("Received authorization code, exchanging for tokens");

        let tokens = client
            .get_access_token(&code, &state)
            .await
            .context("Failed to exchange code for tokens")?;

        if tokens.access_token.is_empty() {
            return Err(anyhow!("Google returned an empty access token"));
        }

        info!("✅ Authenticated with Google Calendar");

        Ok(Session {
            creds: self.creds.clone(),
            redirect_uri,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    async fn wait_for_callback(&self, listener: &TcpListener) -> Result<(String, String)> {
        loop {
            let (stream, _) = listener
                .accept()
                .await
                .context("Failed to accept OAuth callback")?;

            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader
                .read_line(&mut request_line)
                .await
                .context("Failed to read OAuth callback request line")?;

            let mut stream = reader.into_inner();
            let callback = parse_callback(&request_line);

            let response = match &callback {
                Ok(Some(_)) => ok_page(&format!(
                    "<h1>{} is authorized</h1>\
                    <p>You can close this window and return to the terminal.</p>",
                    self.application_name
                )),
                Ok(None) => not_found_page(),
                Err(e) => ok_page(&format!("<h1>Authentication failed</h1><p>{}</p>", e)),
            };

            stream
                .write_all(response.as_bytes())
                .await
                .context("Failed to write OAuth callback response")?;
            stream.flush().await?;

            if let Some(code_and_state) = callback? {
                return Ok(code_and_state);
            }
        }
    }
}

/// Pull `code` and `state` out of the callback request line.
///
/// `Ok(None)` means the request was for some other path (a favicon, say).
fn parse_callback(request_line: &str) -> Result<Option<(String, String)>> {
    let url_part = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| anyhow!("Invalid HTTP request"))?;

    let url = url::Url::parse(&format!("http://localhost{}", url_part))?;

    if url.path() != CALLBACK_PATH {
        return Ok(None);
    }

    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.to_string())
    };

    if let Some(error) = param("error") {
        return Err(anyhow!("Authorization was denied: {}", error));
    }

    let code = param("code").ok_or_else(|| anyhow!("No code in callback"))?;
    let state = param("state").ok_or_else(|| anyhow!("No state in callback"))?;

    Ok(Some((code, state)))
}

fn ok_page(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
        Content-Type: text/html\r\n\
        Connection: close\r\n\
        \r\n\
        <html><body>{}</body></html>",
        body
    )
}

fn not_found_page() -> String {
    "HTTP/1.1 404 Not Found\r\nConnection: close\r\n\r\n".to_string()
}

impl Session {
    /// Calendar handle using this session's tokens.
    pub fn calendar(&self) -> GoogleCalendar {
        GoogleCalendar::new(Client::new(
            self.creds.client_id.clone(),
            self.creds.client_secret.clone(),
            self.redirect_uri.clone(),
            self.access_token.clone(),
            self.refresh_token.clone(),
        ))
    }
}

impl TokenSource for Session {
    async fn access_token(&self) -> Result<String> {
        Ok(self.access_token.clone())
    }
}

/// Each token request runs the full sign-in flow.
impl TokenSource for OAuthFlow {
    async fn access_token(&self) -> Result<String> {
        Ok(self.authorize().await?.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow(port: u16) -> OAuthFlow {
        OAuthFlow::new(
            Credentials {
                client_id: "id".into(),
                client_secret: "secret".into(),
            },
            vec!["https://www.googleapis.com/auth/calendar".into()],
            port,
            "calgen".into(),
        )
    }

    #[test]
    fn redirect_uri_uses_configured_port() {
        assert_eq!(flow(8888).redirect_uri(), "http://localhost:8888/callback");
        assert_eq!(flow(9000).redirect_address(), "127.0.0.1:9000");
    }

    #[test]
    fn parses_code_and_state() {
        let line = "GET /callback?state=xyz&code=4%2F0Abc&scope=calendar HTTP/1.1\r\n";

        let parsed = parse_callback(line).unwrap();

        assert_eq!(parsed, Some(("4/0Abc".to_string(), "xyz".to_string())));
    }

    #[test]
    fn other_paths_are_ignored() {
        assert_eq!(parse_callback("GET /favicon.ico HTTP/1.1").unwrap(), None);
    }

    #[test]
    fn denied_consent_is_an_error() {
        let err = parse_callback("GET /callback?error=access_denied HTTP/1.1").unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn missing_code_is_an_error() {
        assert!(parse_callback("GET /callback?state=s HTTP/1.1").is_err());
        assert!(parse_callback("garbage").is_err());
    }
}
