#![allow(dead_code)]

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

use deportes_api::{app, config::AppConfig, AppState};

/// An in-process server on its own port with its own in-memory datastore.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    client: Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<Response> {
        Ok(self
            .post("/api/auth/register")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Response> {
        Ok(self
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?)
    }

    /// Register `username` and return a bearer token for it.
    pub async fn token_for(&self, username: &str) -> Result<String> {
        let registered = self.register(username, "secreto").await?;
        anyhow::ensure!(
            registered.status() == StatusCode::CREATED,
            "register returned {}",
            registered.status()
        );

        let body: Value = self.login(username, "secreto").await?.json().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login reply has no token")
    }

    /// POST `body` with a bearer token and return the created entity.
    pub async fn create(&self, token: &str, path: &str, body: Value) -> Result<Value> {
        let resp = self.post(path).bearer_auth(token).json(&body).send().await?;
        anyhow::ensure!(
            resp.status() == StatusCode::CREATED,
            "POST {} returned {}",
            path,
            resp.status()
        );
        Ok(resp.json().await?)
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(AppConfig::in_memory()).await
}

pub async fn spawn_server_with(mut config: AppConfig) -> Result<TestServer> {
    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    config.server.port = port;
    config.api.enable_request_logging = false;

    let state = AppState::in_memory(config)?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    let server = TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        client: Client::builder().timeout(Duration::from_secs(10)).build()?,
    };
    Ok(server)
}
