mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::spawn_server;

#[tokio::test]
async fn coach_crud_lifecycle() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token_for("u1").await?;

    let coach = server
        .create(
            &token,
            "/api/entrenadores",
            json!({ "nombre": "Luis", "experiencia": 12, "nacionalidad": "España" }),
        )
        .await?;
    assert_eq!(coach["experiencia"], 12);

    let path = format!("/api/entrenadores/{}", coach["id"]);
    let fetched: Value = server.get(&path).send().await?.json().await?;
    assert_eq!(fetched, coach);

    let resp = server
        .put(&path)
        .bearer_auth(&token)
        .json(&json!({ "nombre": "Luis Enrique", "experiencia": 13 }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await?;
    assert_eq!(updated["id"], coach["id"]);
    assert_eq!(updated["nombre"], "Luis Enrique");

    let resp = server.delete(&path).bearer_auth(&token).send().await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = server.get(&path).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.json::<Value>().await?["mensaje"],
        "No se encontró un entrenador con el ID proporcionado"
    );

    Ok(())
}

#[tokio::test]
async fn coach_leads_at_most_one_team() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token_for("u1").await?;

    let coach = server.create(&token, "/api/coaches", json!({ "nombre": "Xavi" })).await?;
    let team = server
        .create(&token, "/api/equipos", json!({ "nombre": "Barça", "entrenadorId": coach["id"] }))
        .await?;
    assert_eq!(team["entrenadorId"], coach["id"]);

    let resp = server
        .post("/api/equipos")
        .bearer_auth(&token)
        .json(&json!({ "nombre": "Otro", "entrenadorId": coach["id"] }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // A coach in charge of a team cannot be removed
    let resp = server
        .delete(&format!("/api/entrenadores/{}", coach["id"]))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}
