//! Seeds menu data through the Diesel repositories under test.

use safeplate::domain::ports::{
    AllergyRepository, DishRepository, IngredientRepository, NewUser, RestaurantRepository,
    UserRepository,
};
use safeplate::domain::{
    AllergyId, Dish, DishDraft, EmailAddress, FullName, IngredientId, PasswordDigest,
    RestaurantDraft, RestaurantId, TagName, User,
};
use safeplate::outbound::persistence::{
    DbPool, DieselAllergyRepository, DieselDishRepository, DieselIngredientRepository,
    DieselPendingIngredientRepository, DieselRestaurantRepository, DieselUserRepository,
};

const DISH_IMAGE: &str = "https://cdn.test/images/dish.webp";
const PASSWORD_PHC: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g";

/// Every Diesel repository, sharing one pool.
pub struct Catalogue {
    pub dishes: DieselDishRepository,
    pub allergies: DieselAllergyRepository,
    pub ingredients: DieselIngredientRepository,
    pub users: DieselUserRepository,
    pub restaurants: DieselRestaurantRepository,
    pub pending: DieselPendingIngredientRepository,
}

impl Catalogue {
    pub fn new(pool: &DbPool) -> Self {
        Self {
            dishes: DieselDishRepository::new(pool.clone()),
            allergies: DieselAllergyRepository::new(pool.clone()),
            ingredients: DieselIngredientRepository::new(pool.clone()),
            users: DieselUserRepository::new(pool.clone()),
            restaurants: DieselRestaurantRepository::new(pool.clone()),
            pending: DieselPendingIngredientRepository::new(pool.clone()),
        }
    }

    pub async fn restaurant(&self, name: &str) -> RestaurantId {
        let local: String = name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase();
        self.restaurants
            .create(&RestaurantDraft {
                name: name.to_owned(),
                email: EmailAddress::from_trusted(format!("{local}@menu.test")),
                phone: "0501234567".to_owned(),
            })
            .await
            .expect("restaurant inserts")
            .id
    }

    pub async fn allergy(&self, name: &str) -> AllergyId {
        self.allergies
            .create(&TagName::from_trusted(name))
            .await
            .expect("allergy inserts")
            .id
    }

    pub async fn ingredient(&self, name: &str) -> IngredientId {
        self.ingredients
            .create(&TagName::from_trusted(name))
            .await
            .expect("ingredient inserts")
            .id
    }

    pub async fn dish(
        &self,
        restaurant: RestaurantId,
        name: &str,
        allergy_ids: &[AllergyId],
        ingredient_ids: &[IngredientId],
    ) -> Dish {
        self.dishes
            .create(&DishDraft {
                name: name.to_owned(),
                description: "House special".to_owned(),
                price: 42.0,
                image: DISH_IMAGE.to_owned(),
                restaurant_id: restaurant,
                allergy_ids: allergy_ids.to_vec(),
                ingredient_ids: ingredient_ids.to_vec(),
            })
            .await
            .expect("dish inserts")
    }

    /// Register a user with stored allergies, then set disliked ingredients.
    pub async fn user(
        &self,
        email: &str,
        allergy_ids: &[AllergyId],
        disliked: &[IngredientId],
    ) -> User {
        let user = self
            .users
            .create(&NewUser {
                email: EmailAddress::from_trusted(email),
                full_name: FullName::from_trusted("Dana Levi"),
                password: PasswordDigest::new(PASSWORD_PHC),
                allergy_ids: allergy_ids.to_vec(),
            })
            .await
            .expect("user inserts");
        if disliked.is_empty() {
            return user;
        }
        self.users
            .replace_ingredients(user.id, disliked)
            .await
            .expect("dislikes replace")
            .expect("user exists")
    }
}
