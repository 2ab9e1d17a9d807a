mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use common::spawn_server;

#[tokio::test]
async fn health_reports_memory_backend() -> Result<()> {
    let server = spawn_server().await?;

    let resp = server.get("/health").send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "memory");

    Ok(())
}

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let server = spawn_server().await?;

    let body: Value = server.get("/").send().await?.json().await?;
    assert_eq!(body["name"], "Deportes API");
    assert!(body["endpoints"]["ligas"].is_string());

    Ok(())
}

#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let server = spawn_server().await?;

    let resp = server.get("/api/estadios").send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn openapi_document_lists_the_api() -> Result<()> {
    let server = spawn_server().await?;

    let resp = server.get("/api-docs/openapi.json").send().await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc: Value = resp.json().await?;

    let paths = &doc["paths"];
    assert!(paths.get("/api/ligas").is_some());
    assert!(paths.get("/api/auth/login").is_some());
    assert!(paths["/api/ligas"].get("post").is_some());
    assert!(doc["components"]["securitySchemes"].get("bearer_auth").is_some());

    let ui = server.get("/swagger-ui/").send().await?;
    assert_eq!(ui.status(), StatusCode::OK);

    Ok(())
}
