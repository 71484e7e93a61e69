//! Sorter: stable merge sort of a comma-separated integer list
//!
//! ## Routes
//! - `/` - input form
//! - `/sort?array=5,1,9` - input and sorted output
//! - anything else - static files

pub mod merge;
pub mod pages;

use barehttp_core::{Request, Response, ServerState, StaticFiles};

pub const NAME: &str = "Sorter";
pub const DEFAULT_URL: &str = "http://localhost:8082/";
pub const DEFAULT_PORT: u16 = 8082;

/// Parse the `array` parameter. Empty pieces are skipped.
pub fn parse_array(raw: Option<&str>) -> Result<Vec<i32>, &'static str> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Err("Query parameter 'array' is required"),
    };
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| piece.parse::<i32>().map_err(|_| "All elements must be integers"))
        .collect()
}

pub fn join(values: &[i32]) -> String {
    values
        .iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn sort(req: &Request) -> Response {
    let params = req.query_params();
    let raw = params.get("array");
    let values = match parse_array(raw) {
        Ok(values) => values,
        Err(message) => return Response::bad_request(message),
    };

    let sorted = merge::merge_sort(&values);
    tracing::info!("sorted {} numbers", sorted.len());
    Response::ok_html(pages::result(raw.unwrap_or(""), &join(&sorted), sorted.len()))
}

/// Route table for the sorter
pub fn routes(files: StaticFiles) -> ServerState {
    ServerState::new(NAME)
        .route("/", |req: Request| async move {
            Ok(Response::ok_html(pages::home(&req.base_url(DEFAULT_PORT))))
        })
        .route("/sort", |req: Request| async move { Ok(sort(&req)) })
        .static_files(files)
}
