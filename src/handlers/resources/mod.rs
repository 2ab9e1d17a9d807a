// handlers/resources/mod.rs - CRUD handlers shared by every entity kind
//
// One generic set of handlers serves ligas, equipos, jugadores and
// entrenadores. Each is instantiated per entity through `CrudService<T>`,
// which axum resolves from `AppState` via `FromRef`. The `documented!`
// modules below bind them to concrete entities so each route carries its
// OpenAPI description and its own guard wiring.

pub mod roster;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Path, State},
    http::request::Parts,
    Extension,
};

use crate::database::models::Entity;
use crate::database::repository::StoreError;
use crate::error::{ApiError, JsonBody};
use crate::middleware::{ApiResponse, ApiResult, Principal};
use crate::services::CrudService;
use crate::state::AppState;

/// Numeric `:id` path segment; anything else is a 400.
#[derive(Debug, Clone, Copy)]
pub struct EntityId(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for EntityId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_argument(e.body_text()))?;

        raw.parse::<i64>().map(EntityId).map_err(|_| {
            ApiError::invalid_argument(format!("El ID '{}' no es un número válido", raw))
        })
    }
}

/// GET /api/<plural>
pub async fn list<T>(State(service): State<CrudService<T>>) -> ApiResult<Vec<T>>
where
    T: Entity,
    CrudService<T>: FromRef<AppState>,
{
    let labels = T::LABELS;
    let entities = service.find_all().await.map_err(|e| {
        ApiError::from_store(e, format!("Error al obtener la lista de {}", labels.plural))
    })?;
    Ok(ApiResponse::success(entities))
}

/// GET /api/<plural>/:id
pub async fn show<T>(
    State(service): State<CrudService<T>>,
    EntityId(id): EntityId,
) -> ApiResult<T>
where
    T: Entity,
    CrudService<T>: FromRef<AppState>,
{
    let labels = T::LABELS;
    let entity = service
        .find_by_id(id)
        .await
        .map_err(|e| ApiError::from_store(e, format!("Error al buscar {}", labels.definite)))?
        .ok_or_else(|| ApiError::entity_not_found(&labels))?;
    Ok(ApiResponse::success(entity))
}

/// POST /api/<plural> (authenticated)
pub async fn create<T>(
    State(service): State<CrudService<T>>,
    Extension(principal): Extension<Principal>,
    JsonBody(entity): JsonBody<T>,
) -> ApiResult<T>
where
    T: Entity,
    CrudService<T>: FromRef<AppState>,
{
    let labels = T::LABELS;
    let created = service.create(entity).await.map_err(|e| {
        ApiError::from_write(e, &labels, format!("Error al crear {}", labels.definite))
    })?;

    tracing::info!(
        "{} created {} {:?}",
        principal.username,
        labels.definite,
        created.id()
    );
    Ok(ApiResponse::created(created))
}

/// PUT /api/<plural>/:id (authenticated)
pub async fn update<T>(
    State(service): State<CrudService<T>>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
    JsonBody(entity): JsonBody<T>,
) -> ApiResult<T>
where
    T: Entity,
    CrudService<T>: FromRef<AppState>,
{
    let labels = T::LABELS;
    let fallback = format!("Error inesperado al actualizar {}", labels.definite);

    let exists = service
        .exists(id)
        .await
        .map_err(|e| ApiError::from_store(e, fallback.clone()))?;
    if !exists {
        return Err(ApiError::entity_not_found(&labels));
    }

    let updated = service
        .update(id, entity)
        .await
        .map_err(|e| ApiError::from_write(e, &labels, fallback))?;

    tracing::info!("{} updated {} {}", principal.username, labels.definite, id);
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/<plural>/:id (authenticated)
pub async fn delete<T>(
    State(service): State<CrudService<T>>,
    Extension(principal): Extension<Principal>,
    EntityId(id): EntityId,
) -> ApiResult<()>
where
    T: Entity,
    CrudService<T>: FromRef<AppState>,
{
    let labels = T::LABELS;
    let not_found = || {
        ApiError::not_found(format!(
            "No se encontró {} con el ID especificado",
            labels.indefinite
        ))
    };
    let failure = format!("No se pudo eliminar {}", labels.definite);

    let exists = service
        .exists(id)
        .await
        .map_err(|e| ApiError::from_store(e, failure.clone()))?;
    if !exists {
        return Err(not_found());
    }

    match service.delete_by_id(id).await {
        Ok(()) => {
            tracing::info!("{} deleted {} {}", principal.username, labels.definite, id);
            Ok(ApiResponse::<()>::no_content())
        }
        Err(StoreError::NotFound) => Err(not_found()),
        Err(StoreError::Constraint(msg)) => {
            tracing::warn!("Delete of {} {} blocked: {}", labels.definite, id, msg);
            Err(ApiError::internal(failure))
        }
        Err(e) => Err(ApiError::from_store(e, failure)),
    }
}

/// Concrete, documented handlers and routes for one entity kind.
///
/// Reads are public; writes sit behind `require_authentication`.
macro_rules! documented {
    ($module:ident, $entity:ident, $tag:tt, $collection:tt, $item:tt) => {
        pub mod $module {
            use axum::{
                extract::State,
                middleware,
                routing::{get, post, put},
                Extension, Router,
            };

            use super::EntityId;
            use crate::database::models::$entity;
            #[allow(unused_imports)]
            use crate::error::{ErrorReply, JsonBody};
            use crate::middleware::{require_authentication, ApiResult, Principal};
            use crate::services::CrudService;
            use crate::state::AppState;

            #[utoipa::path(
                get,
                path = $collection,
                tag = $tag,
                responses(
                    (status = 200, description = "Listado completo", body = [$entity]),
                    (status = 500, description = "Error interno", body = ErrorReply)
                )
            )]
            pub async fn list(service: State<CrudService<$entity>>) -> ApiResult<Vec<$entity>> {
                super::list(service).await
            }

            #[utoipa::path(
                get,
                path = $item,
                tag = $tag,
                params(("id" = i64, Path, description = "Identificador numérico")),
                responses(
                    (status = 200, description = "Registro encontrado", body = $entity),
                    (status = 400, description = "ID no numérico", body = ErrorReply),
                    (status = 404, description = "No existe", body = ErrorReply)
                )
            )]
            pub async fn show(
                service: State<CrudService<$entity>>,
                id: EntityId,
            ) -> ApiResult<$entity> {
                super::show(service, id).await
            }

            #[utoipa::path(
                post,
                path = $collection,
                tag = $tag,
                request_body = $entity,
                security(("bearer_auth" = [])),
                responses(
                    (status = 201, description = "Creado", body = $entity),
                    (status = 400, description = "Petición inválida", body = ErrorReply),
                    (status = 401, description = "Falta un token válido")
                )
            )]
            pub async fn create(
                service: State<CrudService<$entity>>,
                principal: Extension<Principal>,
                body: JsonBody<$entity>,
            ) -> ApiResult<$entity> {
                super::create(service, principal, body).await
            }

            #[utoipa::path(
                put,
                path = $item,
                tag = $tag,
                request_body = $entity,
                params(("id" = i64, Path, description = "Identificador numérico")),
                security(("bearer_auth" = [])),
                responses(
                    (status = 200, description = "Actualizado", body = $entity),
                    (status = 400, description = "Petición inválida", body = ErrorReply),
                    (status = 401, description = "Falta un token válido"),
                    (status = 404, description = "No existe", body = ErrorReply)
                )
            )]
            pub async fn update(
                service: State<CrudService<$entity>>,
                principal: Extension<Principal>,
                id: EntityId,
                body: JsonBody<$entity>,
            ) -> ApiResult<$entity> {
                super::update(service, principal, id, body).await
            }

            #[utoipa::path(
                delete,
                path = $item,
                tag = $tag,
                params(("id" = i64, Path, description = "Identificador numérico")),
                security(("bearer_auth" = [])),
                responses(
                    (status = 204, description = "Eliminado"),
                    (status = 401, description = "Falta un token válido"),
                    (status = 404, description = "No existe", body = ErrorReply),
                    (status = 500, description = "Aún referenciado", body = ErrorReply)
                )
            )]
            pub async fn delete(
                service: State<CrudService<$entity>>,
                principal: Extension<Principal>,
                id: EntityId,
            ) -> ApiResult<()> {
                super::delete(service, principal, id).await
            }

            /// Collection and item routes under `/api/<plural>`.
            pub fn routes(plural: &str) -> Router<AppState> {
                let collection = format!("/api/{}", plural);
                let item = format!("/api/{}/:id", plural);

                Router::new()
                    .route(
                        &collection,
                        get(list).merge(
                            post(create).route_layer(middleware::from_fn(require_authentication)),
                        ),
                    )
                    .route(
                        &item,
                        get(show).merge(
                            put(update)
                                .delete(delete)
                                .route_layer(middleware::from_fn(require_authentication)),
                        ),
                    )
            }
        }
    };
}

documented!(leagues, League, "ligas", "/api/ligas", "/api/ligas/{id}");
documented!(teams, Team, "equipos", "/api/equipos", "/api/equipos/{id}");
documented!(players, Player, "jugadores", "/api/jugadores", "/api/jugadores/{id}");
documented!(coaches, Coach, "entrenadores", "/api/entrenadores", "/api/entrenadores/{id}");
