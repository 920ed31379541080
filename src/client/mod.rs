//! HTTP client for the dashboard API.
//!
//! One method per REST operation. The bearer token, once set (or obtained via
//! [`ApiClient::login`]), is attached to every request. Non-2xx responses are
//! surfaced as [`ClientError::Api`] carrying the server's `message`.

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::errors::ErrorResponse;
use crate::models::{
    AuthResponse, ChangePasswordRequest, CreateLinkRequest, CreatePostCategoryRequest,
    CreatePostRequest, CreateQuizCategoryRequest, CreateQuizRequest, CreateSettingRequest, Link,
    LoginRequest, MessageResponse, Post, PostCategory, Quiz, QuizCategory, RegisterRequest,
    Setting, UpdateLinkRequest, UpdatePostCategoryRequest, UpdatePostRequest,
    UpdateProfileRequest, UpdateQuizCategoryRequest, UpdateQuizRequest, UpdateSettingRequest,
    User,
};

/// Error type for client calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status of an API error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the dashboard REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for the server at `base_url`, e.g. `http://localhost:5000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(base_url).map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            http: Client::new(),
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Forget the stored token. Later calls are anonymous.
    pub fn logout(&mut self) {
        self.token = None;
    }

    /// `{base}/api/{segments...}`, with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        handle(self.request(Method::GET, url).send().await?).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        handle(self.request(method, url).json(body).send().await?).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<MessageResponse, ClientError> {
        let url = self.endpoint(segments)?;
        handle(self.request(Method::DELETE, url).send().await?).await
    }

    // Quizzes

    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>, ClientError> {
        self.get(&["quizzes"]).await
    }

    pub async fn get_quiz(&self, id: &str) -> Result<Quiz, ClientError> {
        self.get(&["quizzes", id]).await
    }

    pub async fn create_quiz(&self, request: &CreateQuizRequest) -> Result<Quiz, ClientError> {
        self.send_json(Method::POST, &["quizzes"], request).await
    }

    pub async fn update_quiz(
        &self,
        id: &str,
        request: &UpdateQuizRequest,
    ) -> Result<Quiz, ClientError> {
        self.send_json(Method::PUT, &["quizzes", id], request).await
    }

    pub async fn delete_quiz(&self, id: &str) -> Result<MessageResponse, ClientError> {
        self.delete(&["quizzes", id]).await
    }

    // Quiz categories

    pub async fn list_quiz_categories(&self) -> Result<Vec<QuizCategory>, ClientError> {
        self.get(&["quiz-categories"]).await
    }

    pub async fn get_quiz_category(&self, id: &str) -> Result<QuizCategory, ClientError> {
        self.get(&["quiz-categories", id]).await
    }

    pub async fn create_quiz_category(
        &self,
        request: &CreateQuizCategoryRequest,
    ) -> Result<QuizCategory, ClientError> {
        self.send_json(Method::POST, &["quiz-categories"], request)
            .await
    }

    pub async fn update_quiz_category(
        &self,
        id: &str,
        request: &UpdateQuizCategoryRequest,
    ) -> Result<QuizCategory, ClientError> {
        self.send_json(Method::PUT, &["quiz-categories", id], request)
            .await
    }

    pub async fn delete_quiz_category(&self, id: &str) -> Result<MessageResponse, ClientError> {
        self.delete(&["quiz-categories", id]).await
    }

    // Posts

    pub async fn list_posts(&self) -> Result<Vec<Post>, ClientError> {
        self.get(&["posts"]).await
    }

    pub async fn get_post(&self, id: &str) -> Result<Post, ClientError> {
        self.get(&["posts", id]).await
    }

    pub async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, ClientError> {
        self.send_json(Method::POST, &["posts"], request).await
    }

    pub async fn update_post(
        &self,
        id: &str,
        request: &UpdatePostRequest,
    ) -> Result<Post, ClientError> {
        self.send_json(Method::PUT, &["posts", id], request).await
    }

    pub async fn delete_post(&self, id: &str) -> Result<MessageResponse, ClientError> {
        self.delete(&["posts", id]).await
    }

    // Post categories

    pub async fn list_post_categories(&self) -> Result<Vec<PostCategory>, ClientError> {
        self.get(&["post-categories"]).await
    }

    pub async fn get_post_category(&self, id: &str) -> Result<PostCategory, ClientError> {
        self.get(&["post-categories", id]).await
    }

    pub async fn create_post_category(
        &self,
        request: &CreatePostCategoryRequest,
    ) -> Result<PostCategory, ClientError> {
        self.send_json(Method::POST, &["post-categories"], request)
            .await
    }

    pub async fn update_post_category(
        &self,
        id: &str,
        request: &UpdatePostCategoryRequest,
    ) -> Result<PostCategory, ClientError> {
        self.send_json(Method::PUT, &["post-categories", id], request)
            .await
    }

    pub async fn delete_post_category(&self, id: &str) -> Result<MessageResponse, ClientError> {
        self.delete(&["post-categories", id]).await
    }

    // Links

    pub async fn list_links(&self) -> Result<Vec<Link>, ClientError> {
        self.get(&["links"]).await
    }

    pub async fn get_link(&self, id: &str) -> Result<Link, ClientError> {
        self.get(&["links", id]).await
    }

    pub async fn create_link(&self, request: &CreateLinkRequest) -> Result<Link, ClientError> {
        self.send_json(Method::POST, &["links"], request).await
    }

    pub async fn update_link(
        &self,
        id: &str,
        request: &UpdateLinkRequest,
    ) -> Result<Link, ClientError> {
        self.send_json(Method::PUT, &["links", id], request).await
    }

    pub async fn delete_link(&self, id: &str) -> Result<MessageResponse, ClientError> {
        self.delete(&["links", id]).await
    }

    // Settings, addressed by key

    pub async fn list_settings(&self) -> Result<Vec<Setting>, ClientError> {
        self.get(&["settings"]).await
    }

    pub async fn get_setting(&self, key: &str) -> Result<Setting, ClientError> {
        self.get(&["settings", key]).await
    }

    pub async fn create_setting(
        &self,
        request: &CreateSettingRequest,
    ) -> Result<Setting, ClientError> {
        self.send_json(Method::POST, &["settings"], request).await
    }

    pub async fn update_setting(
        &self,
        key: &str,
        request: &UpdateSettingRequest,
    ) -> Result<Setting, ClientError> {
        self.send_json(Method::PUT, &["settings", key], request)
            .await
    }

    pub async fn delete_setting(&self, key: &str) -> Result<MessageResponse, ClientError> {
        self.delete(&["settings", key]).await
    }

    // Account

    /// Register a new account and keep its token.
    pub async fn register(&mut self, request: &RegisterRequest) -> Result<AuthResponse, ClientError> {
        let response: AuthResponse = self
            .send_json(Method::POST, &["auth", "register"], request)
            .await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    /// Log in and keep the issued token.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self
            .send_json(Method::POST, &["auth", "login"], &request)
            .await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    pub async fn get_profile(&self) -> Result<User, ClientError> {
        self.get(&["auth", "profile"]).await
    }

    /// Update the profile and switch to the freshly issued token.
    pub async fn update_profile(
        &mut self,
        request: &UpdateProfileRequest,
    ) -> Result<AuthResponse, ClientError> {
        let response: AuthResponse = self
            .send_json(Method::PUT, &["auth", "profile"], request)
            .await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ClientError> {
        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.send_json(Method::PUT, &["auth", "password"], &request)
            .await
    }
}

/// Decode a success body, or turn the error body into [`ClientError::Api`].
async fn handle<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };

    tracing::debug!("API call failed with {}: {}", status, message);
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
