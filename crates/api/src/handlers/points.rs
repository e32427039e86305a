//! Handlers for collection point registration, detail, and search.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ecoleta_core::error::CoreError;
use ecoleta_core::image_store::ImageUpload;
use ecoleta_core::point::{parse_coordinate, parse_item_ids, NewPoint};
use ecoleta_core::search::PointFilter;
use ecoleta_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::registry::{CreatedPoint, PointDetail};
use crate::services::search::PointSummary;
use crate::state::AppState;

/// Multipart field carrying the optional point photo.
const IMAGE_FIELD: &str = "image";

/// Query parameters for `GET /points`.
#[derive(Debug, Deserialize)]
pub struct PointQuery {
    pub uf: Option<String>,
    pub city: Option<String>,
    /// Comma-separated item ids, e.g. `1,2`.
    pub items: Option<String>,
}

/// GET /points
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<PointQuery>,
) -> AppResult<Json<Vec<PointSummary>>> {
    let filter = PointFilter::from_query(
        params.uf.as_deref(),
        params.city.as_deref(),
        params.items.as_deref(),
    )?;
    let points = state.search.search(&filter).await?;
    Ok(Json(points))
}

/// GET /points/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PointDetail>> {
    let detail = state.registry.get(id).await?;
    Ok(Json(detail))
}

/// POST /points
///
/// Accepts `multipart/form-data` with the point's text fields, `items` as a
/// comma-separated id list, and an optional `image` file.
pub async fn create(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<CreatedPoint>)> {
    let (form, image) = read_point_form(multipart).await?;
    let input = form.into_new_point()?;

    let created = state.registry.create(input, image).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ---------------------------------------------------------------------------
// Multipart parsing
// ---------------------------------------------------------------------------

/// Raw text fields of the registration form.
#[derive(Debug, Default)]
struct PointForm {
    name: Option<String>,
    email: Option<String>,
    whatsapp: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    city: Option<String>,
    uf: Option<String>,
    items: Option<String>,
}

impl PointForm {
    fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "whatsapp" => &mut self.whatsapp,
            "latitude" => &mut self.latitude,
            "longitude" => &mut self.longitude,
            "city" => &mut self.city,
            "uf" => &mut self.uf,
            "items" => &mut self.items,
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
                return;
            }
        };
        *slot = Some(value);
    }

    /// Parse numeric fields. Text fields are left for [`NewPoint::validated`].
    fn into_new_point(self) -> Result<NewPoint, CoreError> {
        let latitude = parse_coordinate("latitude", &required("latitude", self.latitude)?)?;
        let longitude = parse_coordinate("longitude", &required("longitude", self.longitude)?)?;
        let item_ids = parse_item_ids(self.items.as_deref().unwrap_or_default())?;

        Ok(NewPoint {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            whatsapp: self.whatsapp.unwrap_or_default(),
            latitude,
            longitude,
            city: self.city.unwrap_or_default(),
            uf: self.uf.unwrap_or_default(),
            item_ids,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, CoreError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CoreError::invalid_field(field, "is required"))
}

async fn read_point_form(
    mut multipart: Multipart,
) -> AppResult<(PointForm, Option<ImageUpload>)> {
    let mut form = PointForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == IMAGE_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await.map_err(multipart_error)?;

            // Browsers send an empty, unnamed part when no file was chosen.
            if bytes.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
                continue;
            }

            image = Some(ImageUpload {
                bytes: bytes.to_vec(),
                content_type,
                file_name,
            });
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.set(&name, value);
        }
    }

    Ok((form, image))
}

/// Oversized bodies are reported against the image field; anything else is
/// a malformed request.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Core(CoreError::invalid_field(
            IMAGE_FIELD,
            "upload exceeds the maximum allowed size",
        ))
    } else {
        AppError::BadRequest(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn complete_form() -> PointForm {
        PointForm {
            name: Some("Ponto Centro".into()),
            email: Some("contato@ponto.org".into()),
            whatsapp: Some("35999990000".into()),
            latitude: Some("-21.78".into()),
            longitude: Some("-46.56".into()),
            city: Some("Poços de Caldas".into()),
            uf: Some("MG".into()),
            items: Some("1, 2".into()),
        }
    }

    #[test]
    fn complete_form_parses() {
        let point = complete_form().into_new_point().unwrap();
        assert_eq!(point.item_ids, vec![1, 2]);
        assert_eq!(point.latitude, -21.78);
    }

    #[test]
    fn missing_latitude_is_a_field_error() {
        let form = PointForm {
            latitude: None,
            ..complete_form()
        };
        assert_matches!(
            form.into_new_point(),
            Err(CoreError::InvalidField { field, .. }) if field == "latitude"
        );
    }

    #[test]
    fn missing_items_parse_to_empty_list() {
        let form = PointForm {
            items: None,
            ..complete_form()
        };
        assert!(form.into_new_point().unwrap().item_ids.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut form = PointForm::default();
        form.set("color", "green".into());
        form.set("uf", "SP".into());
        assert_eq!(form.uf.as_deref(), Some("SP"));
    }
}
