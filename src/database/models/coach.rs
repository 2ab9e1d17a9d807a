use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{Entity, Labels};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Coach {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "nombre")]
    pub name: String,
    /// Years of experience.
    #[serde(rename = "experiencia", default)]
    pub experience: Option<i32>,
    #[serde(rename = "nacionalidad", default)]
    pub nationality: Option<String>,
}

impl Entity for Coach {
    const LABELS: Labels = Labels {
        plural: "entrenadores",
        indefinite: "un entrenador",
        definite: "el entrenador",
    };

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}
