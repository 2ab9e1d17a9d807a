use axum::extract::State;

use super::EntityId;
use crate::database::models::{Entity, Player, Team};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Roster of one team
#[utoipa::path(
    get,
    path = "/api/equipos/{id}/jugadores",
    tag = "equipos",
    params(("id" = i64, Path, description = "Identificador del equipo")),
    responses(
        (status = 200, description = "Jugadores del equipo", body = [Player]),
        (status = 404, description = "El equipo no existe"),
        (status = 500, description = "Error interno")
    )
)]
pub async fn team_players(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Vec<Player>> {
    let exists = state
        .teams
        .exists(id)
        .await
        .map_err(|e| ApiError::from_store(e, "Error al buscar el equipo"))?;
    if !exists {
        return Err(ApiError::entity_not_found(&Team::LABELS));
    }

    let players = state
        .player_lookup()
        .find_by_team(id)
        .await
        .map_err(|e| {
            let fallback = format!("Error al obtener la lista de {}", Player::LABELS.plural);
            ApiError::from_store(e, fallback)
        })?;
    Ok(ApiResponse::success(players))
}
