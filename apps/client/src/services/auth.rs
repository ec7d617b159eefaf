use chrono::Utc;
use tracing::{debug, info};

use crate::api::{endpoints, ApiClient};
use crate::auth::{BearerToken, LOGIN_ROUTE};
use crate::errors::ClientError;
use crate::models::user::{RegisterRequest, RegisteredUser, TokenResponse, User};

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// POST auth/login (OAuth2 password form) and store the returned token.
    /// Any previous session is dropped first.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
        self.client.credentials().clear().await?;

        let token: TokenResponse = self
            .client
            .post_form(
                endpoints::auth::LOGIN,
                &[("username", email), ("password", password)],
            )
            .await?;

        self.client.credentials().store(&token.access_token).await?;
        info!("Logged in as {email}");
        Ok(token)
    }

    /// POST auth/register. The backend logs the new user in straight away;
    /// its token is stored when present.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<RegisteredUser, ClientError> {
        self.client.credentials().clear().await?;

        let registered: RegisteredUser = self
            .client
            .post(
                endpoints::auth::REGISTER,
                &RegisterRequest {
                    email,
                    password,
                    full_name,
                },
            )
            .await?;

        if let Some(token) = &registered.access_token {
            self.client.credentials().store(token).await?;
            debug!("Stored token issued at registration");
        }
        info!("Registered user {}", registered.user.id);
        Ok(registered)
    }

    /// Drops the stored token and returns to the login page.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.client.credentials().clear().await?;
        self.client.navigator().navigate(LOGIN_ROUTE);
        Ok(())
    }

    /// GET auth/me
    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.client.get(endpoints::auth::ME).await
    }

    /// Local check only: a token is stored and has not expired.
    pub async fn is_authenticated(&self) -> Result<bool, ClientError> {
        let Some(raw) = self.client.credentials().token().await? else {
            return Ok(false);
        };
        Ok(BearerToken::parse(&raw)
            .map(|t| !t.is_expired_at(Utc::now()))
            .unwrap_or(false))
    }

    /// Asks the backend whether the stored session is still accepted.
    /// Rejected or unusable credentials read as `false`; other failures are
    /// returned.
    pub async fn verify_session(&self) -> Result<bool, ClientError> {
        match self.current_user().await {
            Ok(_) => Ok(true),
            Err(ClientError::AuthExpired { .. }) | Err(ClientError::Token(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
