//! Driven ports: the interfaces the domain services call to reach storage,
//! credentials, mail, and media infrastructure.

mod macros;
pub(crate) use macros::define_port_error;

mod allergy_repository;
mod credentials;
mod dish_repository;
mod ingredient_repository;
mod media;
mod pending_ingredient_repository;
mod persistence;
mod restaurant_repository;
mod user_repository;
mod verification_mailer;

#[cfg(test)]
pub use allergy_repository::MockAllergyRepository;
pub use allergy_repository::AllergyRepository;
#[cfg(test)]
pub use credentials::{MockPasswordHasher, MockTokenIssuer};
pub use credentials::{
    CredentialError, PasswordHasher, TokenClaims, TokenError, TokenIssuer, TokenSubject,
};
#[cfg(test)]
pub use dish_repository::MockDishRepository;
pub use dish_repository::DishRepository;
#[cfg(test)]
pub use ingredient_repository::MockIngredientRepository;
pub use ingredient_repository::IngredientRepository;
#[cfg(test)]
pub use media::{MockImageTranscoder, MockObjectStorage, MockUploadSpool};
pub use media::{
    ImageError, ImageTranscoder, ObjectStorage, SpoolError, SpooledFile, StorageError,
    UnconfiguredStorage, UploadSpool,
};
#[cfg(test)]
pub use pending_ingredient_repository::MockPendingIngredientRepository;
pub use pending_ingredient_repository::PendingIngredientRepository;
pub use persistence::PersistenceError;
#[cfg(test)]
pub use restaurant_repository::MockRestaurantRepository;
pub use restaurant_repository::RestaurantRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, UserCredentials, UserRepository};
#[cfg(test)]
pub use verification_mailer::MockVerificationMailer;
pub use verification_mailer::{MailerError, UnconfiguredMailer, VerificationMailer};
