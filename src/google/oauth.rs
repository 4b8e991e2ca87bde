use oauth2::{
    basic::{
        BasicClient, BasicErrorResponse, BasicRevocationErrorResponse,
        BasicTokenIntrospectionResponse, BasicTokenResponse,
    },
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, RedirectUrl, RevocationUrl, Scope, StandardRevocableToken, TokenResponse,
    TokenUrl,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use webbrowser;

pub struct OAuth2Client {
    client: oauth2::Client<
        BasicErrorResponse,
        BasicTokenResponse,
        BasicTokenIntrospectionResponse,
        StandardRevocableToken,
        BasicRevocationErrorResponse,
        EndpointSet,    // Auth URL
        EndpointNotSet, // Device auth
        EndpointNotSet, // Introspection (not used)
        EndpointSet,    // Revocation (not used)
        EndpointSet,    // Token URL
    >,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
}

fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

impl Token {
    pub fn from_token_response(response: &BasicTokenResponse) -> Self {
        Token {
            access_token: response.access_token().secret().clone(),
            refresh_token: response.refresh_token().map(|r| r.secret().clone()),
            expires_at: response
                .expires_in()
                .map(|duration| now_unix() + duration.as_secs() as i64),
        }
    }

    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => exp <= now_unix(),
            None => false,
        }
    }
}

impl OAuth2Client {
    pub fn new(client_id: &str, client_secret: &str, redirect_url: &str) -> Self {
        Self {
            client: BasicClient::new(ClientId::new(client_id.to_string()))
                .set_client_secret(ClientSecret::new(client_secret.to_string()))
                .set_auth_uri(
                    AuthUrl::new("https://accounts.google.com/o/oauth2/v2/auth".to_string())
                        .expect("Invalid authorization endpoint URL"),
                )
                .set_token_uri(
                    TokenUrl::new("https://www.googleapis.com/oauth2/v3/token".to_string())
                        .expect("Invalid token endpoint URL"),
                )
                .set_redirect_uri(
                    RedirectUrl::new(redirect_url.to_string()).expect("Invalid redirect URL"),
                )
                .set_revocation_url(
                    RevocationUrl::new("https://oauth2.googleapis.com/revoke".to_string())
                        .expect("Invalid revocation endpoint URL"),
                ),
        }
    }

    /// Runs the browser consent flow with a loopback listener and exchanges
    /// the returned code for a token.
    pub async fn oauth_flow(&self, scopes: &[String]) -> anyhow::Result<Token> {
        let http_client = reqwest::Client::new();

        let (pkce_code_challenge, pkce_code_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut auth_request = self.client.authorize_url(CsrfToken::new_random);
        for scope in scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }
        let (authorize_url, _csrf_state) =
            auth_request.set_pkce_challenge(pkce_code_challenge).url();

        let redirect_url = self
            .client
            .redirect_uri()
            .ok_or_else(|| anyhow::anyhow!("redirect url not configured"))?
            .to_string();
        let redirect_url_host = redirect_url
            .strip_prefix("http://")
            .unwrap_or(&redirect_url);

        let listener = tokio::net::TcpListener::bind(redirect_url_host).await?;
        webbrowser::open(authorize_url.as_ref())?;

        let (mut stream, _) = listener.accept().await?;

        let mut reader = AsyncBufReader::new(&mut stream);
        let mut redirect_request_line = String::new();

        reader.read_line(&mut redirect_request_line).await?;

        let request_path = redirect_request_line
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| anyhow::anyhow!("malformed redirect request"))?;
        let redirect_url_and_path = Url::parse(&format!("http://localhost{}", request_path))?;

        let code = redirect_url_and_path
            .query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, code)| AuthorizationCode::new(code.into_owned()))
            .ok_or(anyhow::anyhow!("no code"))?;

        let message = "Go back to your terminal :)";
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-length: {}\r\n\r\n{}",
            message.len(),
            message
        );
        stream.write_all(response.as_bytes()).await?;

        let token_response = self
            .client
            .exchange_code(code)
            .set_pkce_verifier(pkce_code_verifier)
            .request_async(&http_client)
            .await?;

        Ok(Token::from_token_response(&token_response))
    }

    pub async fn refresh_token(&self, refresh_token: String) -> anyhow::Result<Token> {
        let refresh_token = oauth2::RefreshToken::new(refresh_token);
        let http_client = reqwest::Client::new();
        let token_response = self
            .client
            .exchange_refresh_token(&refresh_token)
            .request_async(&http_client)
            .await?;

        Ok(Token::from_token_response(&token_response))
    }
}
