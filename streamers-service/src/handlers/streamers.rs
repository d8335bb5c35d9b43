use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::debug;

use crate::error::Result;
use crate::render::TemplateRenderer;
use crate::services::StreamersService;

pub struct StreamersHandlerState {
    pub streamers: Arc<StreamersService>,
    pub renderer: Arc<TemplateRenderer>,
}

/// Serve the ranked live-streamers collection.
///
/// Content negotiation follows the URL suffix: a path ending in `.json`
/// gets the JSON body, anything else gets the rendered template.
pub async fn get_streamers(
    http_req: HttpRequest,
    state: web::Data<StreamersHandlerState>,
) -> Result<HttpResponse> {
    let collection = state.streamers.get_streamers().await?;

    debug!(
        "Serving {} streams for path {}",
        collection.total,
        http_req.path()
    );

    if http_req.path().ends_with(".json") {
        return Ok(HttpResponse::Ok().json(collection));
    }

    let body = state.renderer.render(&collection)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}
