use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{Entity, Labels};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Player {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "posicion", default)]
    pub position: Option<String>,
    #[serde(rename = "nacionalidad", default)]
    pub nationality: Option<String>,
    #[serde(rename = "equipoId", default)]
    pub team_id: Option<i64>,
}

impl Entity for Player {
    const LABELS: Labels = Labels {
        plural: "jugadores",
        indefinite: "un jugador",
        definite: "el jugador",
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}
