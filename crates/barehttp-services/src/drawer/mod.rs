//! Drawer: parametric SVG shapes
//!
//! ## Routes
//! - `/` - gallery and URL builder
//! - `/drawer`, `/drawer.svg` - one shape as `image/svg+xml`
//! - anything else - static files

pub mod pages;
pub mod svg;

use barehttp_core::{
    QueryParams, Request, Response, ResponseBuilder, ServerState, StaticFiles, StatusCode,
};
use svg::{Drawing, Shape};

pub const NAME: &str = "Drawer";
pub const DEFAULT_URL: &str = "http://localhost:8081/";
pub const DEFAULT_PORT: u16 = 8081;
pub const SVG_UTF8: &str = "image/svg+xml; charset=utf-8";

/// Integer parameter; missing or empty means `default`
fn int_param(params: &QueryParams, name: &str, default: i32) -> Result<i32, String> {
    match params.get(name).map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("Parameter '{}' must be an integer", name)),
    }
}

fn positive(params: &QueryParams, name: &str, default: i32) -> Result<i32, String> {
    match int_param(params, name, default) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(format!("Parameter '{}' must be a positive integer", name)),
    }
}

fn non_negative(params: &QueryParams, name: &str, default: i32) -> Result<i32, String> {
    match int_param(params, name, default) {
        Ok(v) if v >= 0 => Ok(v),
        _ => Err(format!("Parameter '{}' must be a non-negative integer", name)),
    }
}

/// Validate the query of a `/drawer` request.
///
/// Checks run in parameter order and the first failure is reported.
pub fn parse_drawing(params: &QueryParams) -> Result<Drawing, String> {
    let shape = Shape::from_id(int_param(params, "shape", 0)?)
        .ok_or_else(|| "Unknown shape".to_string())?;
    Ok(Drawing {
        shape,
        color: int_param(params, "color", 0)?,
        width: positive(params, "width", 200)?,
        height: positive(params, "height", 200)?,
        stroke: non_negative(params, "stroke", 2)?,
        padding: non_negative(params, "padding", 0)?,
    })
}

pub fn draw(req: &Request) -> Response {
    let drawing = match parse_drawing(&req.query_params()) {
        Ok(d) => d,
        Err(message) => return Response::bad_request(&message),
    };
    tracing::info!(
        "served SVG {} {}x{}",
        drawing.shape.name(),
        drawing.width,
        drawing.height
    );
    ResponseBuilder::new(StatusCode::OK)
        .content_type(SVG_UTF8)
        .body(drawing.render())
        .build()
}

/// Route table for the drawer
pub fn routes(files: StaticFiles) -> ServerState {
    ServerState::new(NAME)
        .route("/", |req: Request| async move {
            Ok(Response::ok_html(pages::home(&req.base_url(DEFAULT_PORT))))
        })
        .route("/drawer", |req: Request| async move { Ok(draw(&req)) })
        .route("/drawer.svg", |req: Request| async move { Ok(draw(&req)) })
        .static_files(files)
}
