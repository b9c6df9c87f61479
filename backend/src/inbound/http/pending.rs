//! Ingredient proposals under `/pending`.
//!
//! Any signed-in user may propose an ingredient. Administrators review the
//! queue and either reject a proposal or approve it, optionally correcting
//! the name; approval makes the ingredient disliked by its proposer.

use actix_web::{HttpResponse, delete, get, post, web};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ADMIN_PAGE_SIZE, ApprovalName, PendingIngredientId, TagKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminUser, AuthenticatedUser};
use crate::inbound::http::dto::{MessageResponse, NameRequest, TagDto};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation;

/// Size of the review queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct QueueLength {
    #[schema(example = 3)]
    pub len: i64,
}

/// `?page=` accepted by the review queue.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParam {
    /// 1-based page number.
    pub page: Option<String>,
}

#[utoipa::path(
    get,
    path = "/pending/len",
    responses(
        (status = 200, description = "Proposals awaiting review", body = QueueLength),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["pending"],
    operation_id = "pendingLength"
)]
#[get("/len")]
pub async fn queue_length(
    state: web::Data<HttpState>,
    _admin: AdminUser,
) -> ApiResult<web::Json<QueueLength>> {
    let len = state.pending.count().await?;
    Ok(web::Json(QueueLength { len }))
}

/// Twelve proposals per page, oldest first.
#[utoipa::path(
    get,
    path = "/pending",
    params(PageParam),
    responses(
        (status = 200, description = "Proposals", body = [TagDto]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["pending"],
    operation_id = "listPending"
)]
#[get("")]
pub async fn list_pending(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    query: web::Query<PageParam>,
) -> ApiResult<web::Json<Vec<TagDto>>> {
    let page = PageRequest::parse(query.page.as_deref(), ADMIN_PAGE_SIZE);
    let proposals = state.pending.list(page).await?;
    Ok(web::Json(proposals.into_iter().map(TagDto::from).collect()))
}

/// Propose a new ingredient.
#[utoipa::path(
    post,
    path = "/pending",
    request_body = NameRequest,
    responses(
        (status = 201, description = "Proposal recorded", body = MessageResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Already an ingredient or awaiting approval", body = ErrorSchema)
    ),
    tags = ["pending"],
    operation_id = "proposeIngredient"
)]
#[post("")]
pub async fn propose(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<NameRequest>,
) -> ApiResult<HttpResponse> {
    let name = validation::tag_name(TagKind::Ingredient, payload.name.as_deref())?;
    state.pending.propose(&caller, name).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("ingredient proposed")))
}

#[utoipa::path(
    delete,
    path = "/pending/{id}",
    params(("id" = i32, Path, description = "Proposal id")),
    responses(
        (status = 200, description = "Rejected", body = MessageResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["pending"],
    operation_id = "rejectPending"
)]
#[delete("/{id}")]
pub async fn reject(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .pending
        .reject(PendingIngredientId::new(id.into_inner()))
        .await?;
    Ok(web::Json(MessageResponse::new("proposal rejected")))
}

/// Approve a proposal. A non-blank `name` replaces the proposed label.
#[utoipa::path(
    post,
    path = "/pending/{id}",
    params(("id" = i32, Path, description = "Proposal id")),
    request_body(content = NameRequest, description = "Optional name correction"),
    responses(
        (status = 200, description = "Approved", body = MessageResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Ingredient exists", body = ErrorSchema)
    ),
    tags = ["pending"],
    operation_id = "approvePending"
)]
#[post("/{id}")]
pub async fn approve(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
    payload: Option<web::Json<NameRequest>>,
) -> ApiResult<web::Json<MessageResponse>> {
    let override_name = payload.and_then(|body| body.into_inner().name);
    let naming = ApprovalName::parse(override_name.as_deref())?;
    state
        .pending
        .approve(PendingIngredientId::new(id.into_inner()), naming)
        .await?;
    Ok(web::Json(MessageResponse::new("ingredient approved")))
}

/// Mount the proposal handlers. `/len` precedes `/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pending")
            .service(queue_length)
            .service(list_pending)
            .service(propose)
            .service(reject)
            .service(approve),
    );
}
