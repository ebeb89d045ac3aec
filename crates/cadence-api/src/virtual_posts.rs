use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;

use cadence_engine::fetch_virtual_posts;
use cadence_types::api::{VirtualPost, VirtualPostQuery};

use crate::error::ApiError;
use crate::state::{AppState, with_db};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualPostParams {
    /// Comma-separated channel ids.
    #[serde(default)]
    pub channel_ids: String,
    pub from_date: String,
    pub to_date: String,
}

impl From<VirtualPostParams> for VirtualPostQuery {
    fn from(params: VirtualPostParams) -> Self {
        VirtualPostQuery {
            channel_ids: params
                .channel_ids
                .split(',')
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            from_date: params.from_date,
            to_date: params.to_date,
        }
    }
}

pub async fn list_virtual_posts(
    State(state): State<AppState>,
    params: Result<Query<VirtualPostParams>, QueryRejection>,
) -> Result<Json<Vec<VirtualPost>>, ApiError> {
    let Query(params) = params?;
    let query = VirtualPostQuery::from(params);
    let posts = with_db(&state, move |db| Ok(fetch_virtual_posts(db, &query)?)).await?;
    Ok(Json(posts))
}
