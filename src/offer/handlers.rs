use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::error::{InternalError, JsonPayloadError, UrlencodedError};
use actix_web::{web, Either, HttpRequest, HttpResponse, Responder};
use log::{error, info};

use super::identifier::is_offer_id;
use super::models::{ArtifactInfo, OfferRequest, OfferResponse};
use super::pipeline::{OfferOutcome, PipelineError};
use crate::{AppState, ErrorResponse};

impl From<&OfferOutcome> for OfferResponse {
    fn from(outcome: &OfferOutcome) -> Self {
        let offer_id = outcome.submission.offer_id.clone();
        Self {
            download_url: format!("/api/offers/{}/artifact", offer_id),
            offer_id,
            status: outcome.status,
            message: outcome.message.clone(),
            warnings: outcome.warnings.clone(),
            artifact: ArtifactInfo {
                filename: outcome.artifact.filename.clone(),
                content_type: outcome.artifact.mime_type().to_string(),
                size: outcome.artifact.size(),
            },
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Offer Service",
    post,
    path = "/offers",
    request_body = OfferRequest,
    responses(
        (status = 200, description = "Offer letter generated; check `status` for the email outcome", body = OfferResponse),
        (status = 400, description = "Rejected by validation", body = ErrorResponse),
        (status = 500, description = "Generation, storage or ledger failure", body = ErrorResponse)
    )
)]
pub async fn create_offer(
    state: web::Data<AppState>,
    body: Either<web::Json<OfferRequest>, web::Form<OfferRequest>>,
) -> impl Responder {
    let request = body.into_inner();

    match state.pipeline.process(request).await {
        Ok(outcome) => {
            info!(
                "Offer {} processed with {} warning(s)",
                outcome.submission.offer_id,
                outcome.warnings.len()
            );
            HttpResponse::Ok().json(OfferResponse::from(&outcome))
        }
        Err(PipelineError::Validation(e)) => HttpResponse::BadRequest().json(
            ErrorResponse::for_stage("validate", e.kind.as_str(), &e.to_string()),
        ),
        Err(e) => {
            error!("Offer processing failed at {}: {}", e.stage(), e);
            HttpResponse::InternalServerError().json(ErrorResponse::for_stage(
                e.stage(),
                "InternalServerError",
                &e.to_string(),
            ))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Offer Service",
    get,
    path = "/offers/{offer_id}/artifact",
    params(
        ("offer_id" = String, Path, description = "Identifier returned when the offer was created")
    ),
    responses(
        (status = 200, description = "The offer letter (PDF, or HTML when conversion fell back)"),
        (status = 400, description = "Malformed offer id", body = ErrorResponse),
        (status = 404, description = "No artifact for this offer id", body = ErrorResponse)
    )
)]
pub async fn download_artifact(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let offer_id = path.into_inner();
    if !is_offer_id(&offer_id) {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!(
            "'{}' is not a valid offer id",
            offer_id
        )));
    }

    let Some(artifact_path) = state.pipeline.store().find(&offer_id) else {
        return HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
            "No offer letter stored for {}",
            offer_id
        )));
    };

    let filename = artifact_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| format!("{}.pdf", offer_id));

    match NamedFile::open_async(&artifact_path).await {
        Ok(file) => file
            .set_content_disposition(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .into_response(&req),
        Err(e) => {
            error!("Failed to open artifact {}: {}", artifact_path.display(), e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to read offer letter"))
        }
    }
}

/// Undecodable bodies are reported as validation failures.
fn rejected_body(message: String) -> actix_web::Error {
    let body = ErrorResponse::for_stage("validate", "BadRequest", &message);
    InternalError::from_response(message, HttpResponse::BadRequest().json(body)).into()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err: JsonPayloadError, _req| rejected_body(err.to_string())),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err: UrlencodedError, _req| rejected_body(err.to_string())),
    )
    .service(web::resource("/offers").route(web::post().to(create_offer)))
    .service(web::resource("/offers/{offer_id}/artifact").route(web::get().to(download_artifact)));
}
