//! Identity from the hosted auth service.
//!
//! Two hops: `GET /auth/v1/user` turns the bearer token into an auth user
//! ID, then the `users` table supplies the marketplace role.

use crate::config::Config;
use crate::error::ConfigError;
use crate::store::PostgrestStore;
use basecamp_core::providers::{IdentityProvider, RecordStore};
use basecamp_core::state::Role;
use basecamp_core::{
    AccessToken, MarketplaceError, Principal, Query, Result, StoreError, Table, UserId,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: UserId,
}

#[derive(Debug, Deserialize)]
struct RoleRow {
    role: Role,
}

/// Resolves bearer tokens through the auth endpoint and the `users` table.
#[derive(Debug, Clone)]
pub struct AuthIdentityProvider {
    client: Client,
    auth_url: String,
    api_key: String,
    store: PostgrestStore,
}

impl AuthIdentityProvider {
    /// Build a provider from `config`.
    ///
    /// # Errors
    ///
    /// `ConfigError::Client` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> std::result::Result<Self, ConfigError> {
        let client = config.http_client()?;
        Ok(Self {
            store: PostgrestStore::with_client(client.clone(), config),
            client,
            auth_url: config.auth_url(),
            api_key: config.anon_key.clone(),
        })
    }

    async fn auth_user(&self, token: &AccessToken) -> Result<AuthUser> {
        let response = self
            .client
            .get(format!("{}/user", self.auth_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => response.json::<AuthUser>().await.map_err(|e| {
                MarketplaceError::Store(StoreError::Decode {
                    table: "auth.users".into(),
                    reason: e.to_string(),
                })
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(MarketplaceError::Unauthenticated)
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StoreError::Status {
                    status: status.as_u16(),
                    message: body,
                }
                .into())
            }
        }
    }
}

impl IdentityProvider for AuthIdentityProvider {
    async fn resolve(&self, token: &AccessToken) -> Result<Principal> {
        if token.is_empty() {
            return Err(MarketplaceError::Unauthenticated);
        }

        let user = self.auth_user(token).await?;
        let query = Query::from(Table::Users).eq("id", user.id).limit(1);
        let row = self
            .store
            .clone()
            .authenticated(token)
            .select(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MarketplaceError::NotFound {
                entity: "user",
                id: user.id.to_string(),
            })?;

        let RoleRow { role } = serde_json::from_value(row).map_err(|e| StoreError::Decode {
            table: Table::Users.name().to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(user = %user.id, role = %role, "resolved identity");
        Ok(Principal::new(user.id, role))
    }
}
