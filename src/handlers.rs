use crate::errors::{AppError, KpiError};
use crate::models::{DashboardParams, DatasetInfo, DerivedView, NpsBreakdown};
use crate::state::AppState;
use crate::stats::{location_options, nps_breakdown, on_parameters_changed};
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use tracing::{debug, warn};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let params = DashboardParams::default();
    let options = location_options(&state.dataset.rows);
    let nps = nps_breakdown(&state.dataset.rows);
    let initial = on_parameters_changed(&state.dataset, &params, state.downtime_policy);
    let page = render_index(&state.dataset, &options, &nps, &params, &initial)
        .map_err(AppError::internal)?;
    Ok(Html(page))
}

pub async fn get_view(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DerivedView>, AppError> {
    derive(&state, params).map(Json)
}

pub async fn post_view(
    State(state): State<AppState>,
    Json(params): Json<DashboardParams>,
) -> Result<Json<DerivedView>, AppError> {
    derive(&state, params).map(Json)
}

pub async fn get_locations(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(location_options(&state.dataset.rows))
}

pub async fn get_nps(State(state): State<AppState>) -> Json<Vec<NpsBreakdown>> {
    Json(nps_breakdown(&state.dataset.rows))
}

pub async fn get_dataset(State(state): State<AppState>) -> Json<DatasetInfo> {
    Json(DatasetInfo {
        source: state.dataset.source.display().to_string(),
        row_count: state.dataset.rows.len(),
        loaded_at: state.dataset.loaded_at.clone(),
    })
}

fn derive(state: &AppState, params: DashboardParams) -> Result<DerivedView, AppError> {
    debug!(
        location = params.location.as_str(),
        min_satisfaction = params.min_satisfaction,
        show_table = params.show_table,
        "parameters changed"
    );

    match on_parameters_changed(&state.dataset, &params, state.downtime_policy) {
        Ok(view) => Ok(view),
        Err(err @ KpiError::EmptyResult) => {
            warn!(
                location = params.location.as_str(),
                min_satisfaction = params.min_satisfaction,
                "{err}"
            );
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
