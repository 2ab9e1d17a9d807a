use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{Entity, Labels};

/// Coach and league are referenced by id only, which keeps the league -> team
/// nesting acyclic on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Team {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "ciudad", default)]
    pub city: Option<String>,
    #[serde(rename = "entrenadorId", default)]
    pub coach_id: Option<i64>,
    #[serde(rename = "ligaId", default)]
    pub league_id: Option<i64>,
}

impl Entity for Team {
    const LABELS: Labels = Labels {
        plural: "equipos",
        indefinite: "un equipo",
        definite: "el equipo",
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}
