//! User management operations.
//!
//! [`Users`] performs the user lifecycle calls against `/api/v2/user`.
//! Group memberships on returned users are fully resolved, except for
//! [`Users::find`] whose results carry group IDs only.

mod types;

use std::sync::Arc;

use reqwest::Method;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::search::SearchCondition;
use crate::transport::{ApiRequest, Transport};

pub use types::*;

/// Base path of the user API.
pub const BASE_USER_PATH: &str = "/api/v2/user";

/// Entity type passed to the search API.
const USER_SEARCH_TYPE: &str = "user";

/// Create responses wrap the user in `{"response": ...}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

/// Performs user-related operations against the Wavefront API.
#[derive(Clone)]
pub struct Users {
    client: Arc<dyn Transport>,
}

impl Users {
    pub fn new(client: Arc<dyn Transport>) -> Self {
        Self { client }
    }

    /// Refresh `user` from Wavefront. The identifier must be set.
    pub async fn get(&self, user: &mut User) -> ApiResult<()> {
        require_id(user)?;
        let request = self
            .client
            .new_request(Method::GET, &user_path(&user.id)?, &[], None)?;
        *user = self.send_for_user(request).await?;
        Ok(())
    }

    /// All users matching every condition in `filter`; an empty filter
    /// matches all users.
    pub async fn find(&self, filter: &[SearchCondition]) -> ApiResult<Vec<User>> {
        let mut results = Vec::new();
        let mut offset = 0;

        loop {
            let page = self
                .client
                .search(USER_SEARCH_TYPE, filter, offset)
                .await?;
            let users: Option<Vec<User>> = serde_json::from_value(page.items)?;
            results.extend(users.unwrap_or_default());

            if !page.more_items {
                break;
            }
            offset = page.next_offset;
        }

        Ok(results)
    }

    /// Create a user and return it as stored by Wavefront.
    ///
    /// When `send_email` is set Wavefront emails the new user an invitation.
    pub async fn create(&self, new_user: &NewUserRequest, send_email: bool) -> ApiResult<User> {
        if new_user.email_address.is_empty() {
            return Err(ApiError::validation(
                "a valid email address must be specified",
            ));
        }

        let payload = serde_json::to_vec(new_user)?;
        let request = self.client.new_request(
            Method::POST,
            BASE_USER_PATH,
            &[("sendEmail", send_email.to_string())],
            Some(payload),
        )?;
        let body = self.client.execute(request).await?;
        let envelope: Envelope<User> = serde_json::from_slice(&body)?;
        Ok(envelope.response)
    }

    /// Replace the stored user with `user`, then refresh `user` from the
    /// response. Setting `credential` changes the user's password.
    pub async fn update(&self, user: &mut User) -> ApiResult<()> {
        require_id(user)?;
        let payload = serde_json::to_vec(user)?;
        let path = user_path(&user.id)?;
        let request = self
            .client
            .new_request(Method::PUT, &path, &[], Some(payload))?;
        *user = self.send_for_user(request).await?;
        Ok(())
    }

    /// Delete `user`. On success its identifier is cleared.
    pub async fn delete(&self, user: &mut User) -> ApiResult<()> {
        require_id(user)?;
        let request = self
            .client
            .new_request(Method::DELETE, &user_path(&user.id)?, &[], None)?;
        self.client.execute(request).await?;
        user.id.clear();
        Ok(())
    }

    async fn send_for_user(&self, request: ApiRequest) -> ApiResult<User> {
        let body = self.client.execute(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn require_id(user: &User) -> ApiResult<()> {
    if user.id.is_empty() {
        return Err(ApiError::validation("user ID field is not set"));
    }
    Ok(())
}

/// Path of a single user. The identifier is always one escaped segment.
fn user_path(id: &str) -> ApiResult<String> {
    if id == "." || id == ".." {
        return Err(ApiError::validation(format!("invalid user ID: {id}")));
    }
    Ok(format!("{BASE_USER_PATH}/{}", urlencoding::encode(id)))
}
