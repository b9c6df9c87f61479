//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AllergyRepository, DishRepository, ImageTranscoder, IngredientRepository, ObjectStorage,
    PasswordHasher, PendingIngredientRepository, RestaurantRepository, TokenIssuer, UploadSpool,
    UserRepository, VerificationMailer,
};
use crate::domain::{
    AccountService, AllergyService, DishService, ImageUploadService, IngredientService,
    PendingIngredientService, RestaurantService, UserService,
};

/// Parameter object bundling every driven port the HTTP services need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub allergies: Arc<dyn AllergyRepository>,
    pub ingredients: Arc<dyn IngredientRepository>,
    pub pending: Arc<dyn PendingIngredientRepository>,
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub dishes: Arc<dyn DishRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub mailer: Arc<dyn VerificationMailer>,
    pub transcoder: Arc<dyn ImageTranscoder>,
    pub spool: Arc<dyn UploadSpool>,
    pub storage: Arc<dyn ObjectStorage>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub users: UserService,
    pub allergies: AllergyService,
    pub ingredients: IngredientService,
    pub pending: PendingIngredientService,
    pub restaurants: RestaurantService,
    pub dishes: DishService,
    pub uploads: ImageUploadService,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Wire every service from the driven ports.
    ///
    /// # Examples
    /// ```ignore
    /// use actix_web::web;
    /// use safeplate::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = web::Data::new(HttpState::new(ports));
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            allergies,
            ingredients,
            pending,
            restaurants,
            dishes,
            hasher,
            tokens,
            mailer,
            transcoder,
            spool,
            storage,
        } = ports;

        Self {
            accounts: AccountService::new(Arc::clone(&users), hasher, tokens, mailer),
            users: UserService::new(users),
            allergies: AllergyService::new(allergies),
            ingredients: IngredientService::new(Arc::clone(&ingredients)),
            pending: PendingIngredientService::new(pending, ingredients),
            restaurants: RestaurantService::new(Arc::clone(&restaurants)),
            dishes: DishService::new(dishes, restaurants),
            uploads: ImageUploadService::new(transcoder, spool, storage),
        }
    }
}
