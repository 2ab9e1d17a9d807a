mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::spawn_server;

#[tokio::test]
async fn league_lists_its_teams() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token_for("u1").await?;

    let league = server
        .create(&token, "/api/ligas", json!({ "nombre": "LaLiga", "pais": "España" }))
        .await?;
    let team = server
        .create(
            &token,
            "/api/equipos",
            json!({ "nombre": "Sevilla", "ciudad": "Sevilla", "ligaId": league["id"] }),
        )
        .await?;
    assert_eq!(team["ligaId"], league["id"]);

    let fetched: Value = server
        .get(&format!("/api/ligas/{}", league["id"]))
        .send()
        .await?
        .json()
        .await?;
    let teams = fetched["equipos"].as_array().cloned().unwrap_or_default();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0]["nombre"], "Sevilla");
    assert_eq!(teams[0]["ligaId"], league["id"]);

    Ok(())
}

#[tokio::test]
async fn team_roster_lists_players() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token_for("u1").await?;

    let team = server.create(&token, "/api/equipos", json!({ "nombre": "Betis" })).await?;
    let other = server.create(&token, "/api/equipos", json!({ "nombre": "Celta" })).await?;

    let signings = [("Joaquín", &team["id"]), ("Isco", &team["id"]), ("Aspas", &other["id"])];
    for (name, team_id) in signings {
        server
            .create(
                &token,
                "/api/jugadores",
                json!({ "nombre": name, "posicion": "Medio", "equipoId": team_id }),
            )
            .await?;
    }

    let resp = server
        .get(&format!("/api/equipos/{}/jugadores", team["id"]))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let roster: Value = resp.json().await?;
    let names: Vec<&str> = roster
        .as_array()
        .map(|players| players.iter().filter_map(|p| p["nombre"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Joaquín", "Isco"]);

    let resp = server.get("/api/equipos/4040/jugadores").send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn player_update_and_delete() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token_for("u1").await?;

    let player = server
        .create(&token, "/api/jugadores", json!({ "nombre": "Pedri", "posicion": "Medio" }))
        .await?;
    let path = format!("/api/jugadores/{}", player["id"]);

    let resp = server
        .put(&path)
        .bearer_auth(&token)
        .json(&json!({ "nombre": "Pedri", "posicion": "Delantero", "nacionalidad": "España" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await?;
    assert_eq!(updated["id"], player["id"]);
    assert_eq!(updated["posicion"], "Delantero");

    let resp = server.delete(&path).bearer_auth(&token).send().await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = server.delete(&path).bearer_auth(&token).send().await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        resp.json::<Value>().await?["mensaje"],
        "No se encontró un jugador con el ID especificado"
    );

    Ok(())
}

#[tokio::test]
async fn unknown_reference_is_bad_request() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token_for("u1").await?;

    let resp = server
        .post("/api/jugadores")
        .bearer_auth(&token)
        .json(&json!({ "nombre": "Nadie", "equipoId": 4040 }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn duplicate_team_name_is_bad_request() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token_for("u1").await?;

    server.create(&token, "/api/equipos", json!({ "nombre": "Betis" })).await?;
    let resp = server
        .post("/api/teams")
        .bearer_auth(&token)
        .json(&json!({ "nombre": "Betis" }))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn referenced_team_cannot_be_deleted() -> Result<()> {
    let server = spawn_server().await?;
    let token = server.token_for("u1").await?;

    let team = server.create(&token, "/api/equipos", json!({ "nombre": "Betis" })).await?;
    server
        .create(&token, "/api/jugadores", json!({ "nombre": "Isco", "equipoId": team["id"] }))
        .await?;

    let resp = server
        .delete(&format!("/api/equipos/{}", team["id"]))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        resp.json::<Value>().await?,
        json!({ "estado": "Error", "mensaje": "No se pudo eliminar el equipo" })
    );

    // Still there
    let resp = server.get(&format!("/api/equipos/{}", team["id"])).send().await?;
    assert_eq!(resp.status(), StatusCode::OK);

    Ok(())
}
