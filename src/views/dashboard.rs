use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::error::AppError;
use crate::merchant::aggregate::{self, ResponseCounts};
use crate::models::SheetData;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    error: Option<String>,
    counts: ResponseCounts,
    slices: Vec<SliceView>,
    pie_gradient: String,
    bars: Vec<BarView>,
}

struct SliceView {
    name: String,
    count: usize,
    percent: String,
    color: String,
}

struct BarView {
    date: String,
    count: usize,
    height: String,
}

impl DashboardTemplate {
    fn loaded(data: &SheetData) -> Self {
        let counts = ResponseCounts::tally(&data.rows);
        let slices = aggregate::response_slices(&counts);
        let bars = aggregate::scale_bars(&aggregate::group_by_date(&data.rows));

        DashboardTemplate {
            error: None,
            counts,
            pie_gradient: aggregate::conic_gradient(&slices),
            slices: slices
                .iter()
                .map(|s| SliceView {
                    name: s.name.to_string(),
                    count: s.count,
                    percent: format!("{:.0}%", s.percent),
                    color: aggregate::slice_color(s.name).to_string(),
                })
                .collect(),
            bars: bars
                .into_iter()
                .map(|b| BarView {
                    date: b.date,
                    count: b.count,
                    height: format!("{:.1}%", b.height_percent),
                })
                .collect(),
        }
    }

    fn failed(message: String) -> Self {
        DashboardTemplate {
            error: Some(message),
            counts: ResponseCounts::default(),
            slices: Vec::new(),
            pie_gradient: String::new(),
            bars: Vec::new(),
        }
    }
}

pub async fn index(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let template = match state.sheet_client.fetch().await {
        Ok(data) => DashboardTemplate::loaded(&data),
        Err(e) => {
            tracing::warn!("Dashboard failed to load sheet data: {e}");
            DashboardTemplate::failed(e)
        }
    };
    Ok(Html(template.render()?))
}
