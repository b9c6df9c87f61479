//! Dish catalogue and recommendations under `/dishes`.
//!
//! ```text
//! GET  /dishes/user?page=&search=   protected  dishes the caller can eat
//! GET  /dishes/page?page=&search=   admin      whole catalogue
//! POST /dishes                      admin
//! GET  /dishes/{id}                 admin
//! PUT  /dishes/{id}                 admin      full replacement
//! ```
//!
//! Both listings return eight dishes per page.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DISH_PAGE_SIZE, DishDraft, DishFields, DishId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{AdminUser, AuthenticatedUser};
use crate::inbound::http::dto::{DishDto, ListingQuery, MessageResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Dish fields for creation and replacement.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishRequest {
    #[schema(example = "Margherita")]
    pub name: Option<String>,
    #[schema(example = "Tomato, mozzarella, basil")]
    pub description: Option<String>,
    #[schema(example = 42.5)]
    pub price: Option<f64>,
    #[schema(example = "https://cdn.example.com/weekly/9f2c.webp")]
    pub image: Option<String>,
    pub restaurant_id: Option<i32>,
    #[serde(default)]
    pub allergy_ids: Vec<i32>,
    #[serde(default)]
    pub ingredient_ids: Vec<i32>,
}

impl DishRequest {
    fn draft(&self) -> Result<DishDraft, crate::domain::Error> {
        DishDraft::parse(DishFields {
            name: self.name.as_deref(),
            description: self.description.as_deref(),
            price: self.price,
            image: self.image.as_deref(),
            restaurant_id: self.restaurant_id,
            allergy_ids: self.allergy_ids.clone(),
            ingredient_ids: self.ingredient_ids.clone(),
        })
    }
}

/// Personalised dish page for the caller.
///
/// With declared allergies a dish must carry every one of them; without,
/// it must share an allergy with those stored for the caller. Dishes
/// containing a disliked ingredient are always excluded.
#[utoipa::path(
    get,
    path = "/dishes/user",
    params(ListingQuery),
    responses(
        (status = 200, description = "Recommended dishes", body = [DishDto]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["dishes"],
    operation_id = "recommendDishes"
)]
#[get("/user")]
pub async fn recommend_dishes(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<Vec<DishDto>>> {
    let dishes = state
        .dishes
        .recommend(&caller, &query.listing(DISH_PAGE_SIZE))
        .await?;
    Ok(web::Json(dishes.into_iter().map(DishDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/dishes/page",
    params(ListingQuery),
    responses(
        (status = 200, description = "Dishes", body = [DishDto]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["dishes"],
    operation_id = "pageDishes"
)]
#[get("/page")]
pub async fn page_dishes(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<Vec<DishDto>>> {
    let dishes = state.dishes.list(&query.listing(DISH_PAGE_SIZE)).await?;
    Ok(web::Json(dishes.into_iter().map(DishDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/dishes",
    request_body = DishRequest,
    responses(
        (status = 201, description = "Created", body = MessageResponse),
        (status = 400, description = "Invalid fields or unknown tag", body = ErrorSchema),
        (status = 404, description = "Restaurant not found", body = ErrorSchema),
        (status = 409, description = "Duplicate name", body = ErrorSchema)
    ),
    tags = ["dishes"],
    operation_id = "createDish"
)]
#[post("")]
pub async fn create_dish(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    payload: web::Json<DishRequest>,
) -> ApiResult<HttpResponse> {
    state.dishes.create(payload.draft()?).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("dish created")))
}

#[utoipa::path(
    get,
    path = "/dishes/{id}",
    params(("id" = i32, Path, description = "Dish id")),
    responses(
        (status = 200, description = "Dish", body = DishDto),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["dishes"],
    operation_id = "getDish"
)]
#[get("/{id}")]
pub async fn get_dish(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
) -> ApiResult<web::Json<DishDto>> {
    let dish = state.dishes.get(DishId::new(id.into_inner())).await?;
    Ok(web::Json(dish.into()))
}

/// Replace every field and tag of a dish.
#[utoipa::path(
    put,
    path = "/dishes/{id}",
    params(("id" = i32, Path, description = "Dish id")),
    request_body = DishRequest,
    responses(
        (status = 200, description = "Updated", body = MessageResponse),
        (status = 400, description = "Invalid fields or unknown tag", body = ErrorSchema),
        (status = 404, description = "Dish or restaurant not found", body = ErrorSchema),
        (status = 409, description = "Duplicate name", body = ErrorSchema)
    ),
    tags = ["dishes"],
    operation_id = "updateDish"
)]
#[put("/{id}")]
pub async fn update_dish(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    id: web::Path<i32>,
    payload: web::Json<DishRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    state
        .dishes
        .update(DishId::new(id.into_inner()), payload.draft()?)
        .await?;
    Ok(web::Json(MessageResponse::new("dish updated")))
}

/// Mount the dish handlers. Literal segments precede `/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dishes")
            .service(recommend_dishes)
            .service(page_dishes)
            .service(create_dish)
            .service(get_dish)
            .service(update_dish),
    );
}

#[cfg(test)]
#[path = "dishes_tests.rs"]
mod tests;
