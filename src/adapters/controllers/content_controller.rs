use axum::{extract::Path, Json};

use crate::{application::error::ApplicationError, domain::content::Section};

pub struct ContentController;

impl ContentController {
    /// GET /api/v1/sections/{section}
    pub async fn get_section(
        Path(section): Path<String>,
    ) -> Result<Json<Section>, ApplicationError> {
        Section::by_slug(&section)
            .map(Json)
            .ok_or(ApplicationError::NotFound)
    }
}
