use async_trait::async_trait;
use serde::Deserialize;

/// What the identity provider knows about a signed-in account.
#[derive(Clone, Debug)]
pub struct Identity {
    /// Stable opaque id; document key for the cached profile.
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity token rejected")]
    Rejected,
    #[error("identity provider unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
}

/// Seam to the external identity provider. The application never stores
/// credentials; it only verifies tokens the client obtained from the
/// provider's own sign-in flow.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<Identity, IdentityError>;
}

/// Verifies Google ID tokens against the tokeninfo endpoint and checks the
/// audience matches our OAuth client.
pub struct GoogleIdentityProvider {
    client: reqwest::Client,
    client_id: String,
    endpoint: String,
}

#[derive(Deserialize)]
struct TokenInfo {
    sub: String,
    aud: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

impl GoogleIdentityProvider {
    const TOKENINFO_URL: &'static str = "https://oauth2.googleapis.com/tokeninfo";

    pub fn new(client_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id,
            endpoint: Self::TOKENINFO_URL.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn verify(&self, id_token: &str) -> Result<Identity, IdentityError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IdentityError::Rejected);
        }

        let info: TokenInfo = response.json().await?;
        if info.aud != self.client_id {
            tracing::warn!("Identity token with foreign audience rejected");
            return Err(IdentityError::Rejected);
        }

        Ok(Identity {
            uid: info.sub,
            display_name: info.name,
            email: info.email,
            photo_url: info.picture,
        })
    }
}
