//! One in-memory database implementing every repository port.
//!
//! Unique and foreign-key constraints are enforced with the same constraint
//! names as the PostgreSQL schema, so services see the same failures they
//! would against a real database.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{
    AllergyRepository, DishRepository, IngredientRepository, NewUser,
    PendingIngredientRepository, PersistenceError, RestaurantRepository, UserCredentials,
    UserRepository,
};
use crate::domain::{
    Allergy, AllergyId, AllergyRequirement, Dish, DishDraft, DishId, EmailAddress, FullName,
    Ingredient, IngredientId, Listing, PasswordDigest, PendingIngredient, PendingIngredientId,
    RecommendationCriteria, Restaurant, RestaurantDraft, RestaurantId, RestaurantRef, Role,
    TagName, User, UserId,
};

#[derive(Debug, Clone)]
struct StoredUser {
    email: String,
    full_name: String,
    password: String,
    role: Role,
    allergies: BTreeSet<i32>,
    ingredients: BTreeSet<i32>,
}

#[derive(Debug, Clone)]
struct StoredDish {
    name: String,
    description: String,
    price: f64,
    image: String,
    restaurant_id: i32,
    allergies: BTreeSet<i32>,
    ingredients: BTreeSet<i32>,
}

#[derive(Debug, Default)]
struct Tables {
    next_id: i32,
    users: BTreeMap<i32, StoredUser>,
    allergies: BTreeMap<i32, String>,
    ingredients: BTreeMap<i32, String>,
    restaurants: BTreeMap<i32, Restaurant>,
    dishes: BTreeMap<i32, StoredDish>,
    pending: BTreeMap<i32, (String, i32)>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, id: i32) -> Option<User> {
        let stored = self.users.get(&id)?;
        Some(User {
            id: UserId::new(id),
            email: EmailAddress::from_trusted(stored.email.clone()),
            full_name: FullName::from_trusted(stored.full_name.clone()),
            role: stored.role,
            allergies: self.allergy_list(&stored.allergies),
            ingredients: self.ingredient_list(&stored.ingredients),
        })
    }

    fn dish(&self, id: i32) -> Option<Dish> {
        let stored = self.dishes.get(&id)?;
        let restaurant = self.restaurants.get(&stored.restaurant_id)?;
        Some(Dish {
            id: DishId::new(id),
            name: stored.name.clone(),
            description: stored.description.clone(),
            price: stored.price,
            image: stored.image.clone(),
            restaurant: RestaurantRef {
                id: restaurant.id,
                name: restaurant.name.clone(),
            },
            allergies: self.allergy_list(&stored.allergies),
            ingredients: self.ingredient_list(&stored.ingredients),
        })
    }

    fn allergy_list(&self, ids: &BTreeSet<i32>) -> Vec<Allergy> {
        ids.iter()
            .filter_map(|id| {
                self.allergies.get(id).map(|name| Allergy {
                    id: AllergyId::new(*id),
                    name: name.clone(),
                })
            })
            .collect()
    }

    fn ingredient_list(&self, ids: &BTreeSet<i32>) -> Vec<Ingredient> {
        ids.iter()
            .filter_map(|id| {
                self.ingredients.get(id).map(|name| Ingredient {
                    id: IngredientId::new(*id),
                    name: name.clone(),
                })
            })
            .collect()
    }

    fn check_allergies(&self, ids: &[AllergyId]) -> Result<BTreeSet<i32>, PersistenceError> {
        ids.iter()
            .map(|id| {
                if self.allergies.contains_key(&id.get()) {
                    Ok(id.get())
                } else {
                    Err(PersistenceError::foreign_key_violation(
                        "user_allergies_allergy_id_fkey",
                    ))
                }
            })
            .collect()
    }

    fn check_ingredients(&self, ids: &[IngredientId]) -> Result<BTreeSet<i32>, PersistenceError> {
        ids.iter()
            .map(|id| {
                if self.ingredients.contains_key(&id.get()) {
                    Ok(id.get())
                } else {
                    Err(PersistenceError::foreign_key_violation(
                        "user_ingredients_ingredient_id_fkey",
                    ))
                }
            })
            .collect()
    }

    fn stored_dish(&self, draft: &DishDraft) -> Result<StoredDish, PersistenceError> {
        if !self.restaurants.contains_key(&draft.restaurant_id.get()) {
            return Err(PersistenceError::foreign_key_violation(
                "dishes_restaurant_id_fkey",
            ));
        }
        let allergies = self.check_allergies(&draft.allergy_ids).map_err(|_| {
            PersistenceError::foreign_key_violation("dish_allergies_allergy_id_fkey")
        })?;
        let ingredients = self.check_ingredients(&draft.ingredient_ids).map_err(|_| {
            PersistenceError::foreign_key_violation("dish_ingredients_ingredient_id_fkey")
        })?;
        Ok(StoredDish {
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            image: draft.image.clone(),
            restaurant_id: draft.restaurant_id.get(),
            allergies,
            ingredients,
        })
    }

    fn dish_page(&self, listing: &Listing, keep: impl Fn(&Dish) -> bool) -> Vec<Dish> {
        let matching = self
            .dishes
            .keys()
            .filter_map(|id| self.dish(*id))
            .filter(|dish| {
                listing.admits([
                    dish.name.as_str(),
                    dish.description.as_str(),
                    dish.restaurant.name.as_str(),
                ])
            })
            .filter(|dish| keep(dish));
        listing.page.slice(matching)
    }
}

/// Shared in-memory tables; clones see the same data.
///
/// # Examples
/// ```
/// use safeplate::test_support::MemoryDatabase;
///
/// let db = MemoryDatabase::default();
/// let allergy = db.insert_allergy("גלוטן");
/// assert_eq!(allergy.name, "גלוטן");
/// ```
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDatabase {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed an allergy.
    pub fn insert_allergy(&self, name: &str) -> Allergy {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.allergies.insert(id, name.to_owned());
        Allergy {
            id: AllergyId::new(id),
            name: name.to_owned(),
        }
    }

    /// Seed an ingredient.
    pub fn insert_ingredient(&self, name: &str) -> Ingredient {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.ingredients.insert(id, name.to_owned());
        Ingredient {
            id: IngredientId::new(id),
            name: name.to_owned(),
        }
    }

    /// Seed a restaurant.
    pub fn insert_restaurant(&self, name: &str, email: &str) -> Restaurant {
        let mut tables = self.lock();
        let id = tables.next_id();
        let restaurant = Restaurant {
            id: RestaurantId::new(id),
            name: name.to_owned(),
            email: EmailAddress::from_trusted(email),
            phone: "0501234567".to_owned(),
        };
        tables.restaurants.insert(id, restaurant.clone());
        restaurant
    }

    /// Seed a user with a password digest.
    pub fn insert_user(
        &self,
        email: &str,
        full_name: &str,
        password: &PasswordDigest,
        role: Role,
    ) -> User {
        let mut tables = self.lock();
        let id = tables.next_id();
        tables.users.insert(
            id,
            StoredUser {
                email: email.to_owned(),
                full_name: full_name.to_owned(),
                password: password.as_str().to_owned(),
                role,
                allergies: BTreeSet::new(),
                ingredients: BTreeSet::new(),
            },
        );
        tables
            .user(id)
            .unwrap_or_else(|| panic!("user {id} was just inserted"))
    }

    /// Number of stored dishes.
    pub fn dish_count(&self) -> usize {
        self.lock().dishes.len()
    }
}

fn unique(constraint: &str) -> PersistenceError {
    PersistenceError::unique_violation(constraint)
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, PersistenceError> {
        Ok(self.lock().user(id.get()))
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, PersistenceError> {
        let tables = self.lock();
        Ok(tables
            .users
            .iter()
            .find(|(_, stored)| stored.email == email.as_str())
            .and_then(|(id, stored)| {
                tables.user(*id).map(|user| UserCredentials {
                    user,
                    password: PasswordDigest::new(stored.password.clone()),
                })
            }))
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, PersistenceError> {
        Ok(self
            .lock()
            .users
            .values()
            .any(|stored| stored.email == email.as_str()))
    }

    async fn create(&self, user: &NewUser) -> Result<User, PersistenceError> {
        let mut tables = self.lock();
        if tables
            .users
            .values()
            .any(|stored| stored.email == user.email.as_str())
        {
            return Err(unique("users_email_key"));
        }
        let allergies = tables.check_allergies(&user.allergy_ids)?;
        let id = tables.next_id();
        tables.users.insert(
            id,
            StoredUser {
                email: user.email.as_str().to_owned(),
                full_name: user.full_name.as_str().to_owned(),
                password: user.password.as_str().to_owned(),
                role: Role::User,
                allergies,
                ingredients: BTreeSet::new(),
            },
        );
        tables
            .user(id)
            .ok_or_else(|| PersistenceError::query("inserted user vanished"))
    }

    async fn list(&self, listing: &Listing) -> Result<Vec<User>, PersistenceError> {
        let tables = self.lock();
        let matching = tables
            .users
            .iter()
            .filter(|(_, stored)| listing.admits([stored.full_name.as_str(), stored.email.as_str()]))
            .filter_map(|(id, _)| tables.user(*id));
        Ok(listing.page.slice(matching))
    }

    async fn delete(&self, id: UserId) -> Result<bool, PersistenceError> {
        let mut tables = self.lock();
        tables.pending.retain(|_, (_, user_id)| *user_id != id.get());
        Ok(tables.users.remove(&id.get()).is_some())
    }

    async fn replace_allergies(
        &self,
        id: UserId,
        allergy_ids: &[AllergyId],
    ) -> Result<Option<User>, PersistenceError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(&id.get()) {
            return Ok(None);
        }
        let allergies = tables.check_allergies(allergy_ids)?;
        if let Some(stored) = tables.users.get_mut(&id.get()) {
            stored.allergies = allergies;
        }
        Ok(tables.user(id.get()))
    }

    async fn replace_ingredients(
        &self,
        id: UserId,
        ingredient_ids: &[IngredientId],
    ) -> Result<Option<User>, PersistenceError> {
        let mut tables = self.lock();
        if !tables.users.contains_key(&id.get()) {
            return Ok(None);
        }
        let ingredients = tables.check_ingredients(ingredient_ids)?;
        if let Some(stored) = tables.users.get_mut(&id.get()) {
            stored.ingredients = ingredients;
        }
        Ok(tables.user(id.get()))
    }

    async fn set_role(&self, id: UserId, role: Role) -> Result<bool, PersistenceError> {
        Ok(match self.lock().users.get_mut(&id.get()) {
            Some(stored) => {
                stored.role = role;
                true
            }
            None => false,
        })
    }

    async fn set_password(
        &self,
        email: &EmailAddress,
        password: &PasswordDigest,
    ) -> Result<bool, PersistenceError> {
        let mut tables = self.lock();
        Ok(
            match tables
                .users
                .values_mut()
                .find(|stored| stored.email == email.as_str())
            {
                Some(stored) => {
                    stored.password = password.as_str().to_owned();
                    true
                }
                None => false,
            },
        )
    }
}

/// Generate the allergy and ingredient repository impls over one table.
macro_rules! memory_tag_repository {
    ($port:ident, $entity:ident, $id:ident, $table:ident, $links:ident, $constraint:literal) => {
        #[async_trait]
        impl $port for MemoryDatabase {
            async fn list_all(&self) -> Result<Vec<$entity>, PersistenceError> {
                let tables = self.lock();
                Ok(tables
                    .$table
                    .iter()
                    .map(|(id, name)| $entity {
                        id: $id::new(*id),
                        name: name.clone(),
                    })
                    .collect())
            }

            async fn list(&self, listing: &Listing) -> Result<Vec<$entity>, PersistenceError> {
                let tables = self.lock();
                let matching = tables
                    .$table
                    .iter()
                    .filter(|(_, name)| listing.admits([name.as_str()]))
                    .map(|(id, name)| $entity {
                        id: $id::new(*id),
                        name: name.clone(),
                    });
                Ok(listing.page.slice(matching))
            }

            async fn find(&self, id: $id) -> Result<Option<$entity>, PersistenceError> {
                Ok(self.lock().$table.get(&id.get()).map(|name| $entity {
                    id,
                    name: name.clone(),
                }))
            }

            async fn name_taken(
                &self,
                name: &TagName,
                except: Option<$id>,
            ) -> Result<bool, PersistenceError> {
                let except = except.map($id::get);
                Ok(self
                    .lock()
                    .$table
                    .iter()
                    .any(|(id, stored)| stored == name.as_str() && Some(*id) != except))
            }

            async fn create(&self, name: &TagName) -> Result<$entity, PersistenceError> {
                let mut tables = self.lock();
                if tables.$table.values().any(|stored| stored == name.as_str()) {
                    return Err(unique($constraint));
                }
                let id = tables.next_id();
                tables.$table.insert(id, name.as_str().to_owned());
                Ok($entity {
                    id: $id::new(id),
                    name: name.as_str().to_owned(),
                })
            }

            async fn rename(&self, id: $id, name: &TagName) -> Result<bool, PersistenceError> {
                let mut tables = self.lock();
                if tables
                    .$table
                    .iter()
                    .any(|(other, stored)| stored == name.as_str() && *other != id.get())
                {
                    return Err(unique($constraint));
                }
                Ok(match tables.$table.get_mut(&id.get()) {
                    Some(stored) => {
                        *stored = name.as_str().to_owned();
                        true
                    }
                    None => false,
                })
            }

            async fn delete(&self, id: $id) -> Result<bool, PersistenceError> {
                let mut tables = self.lock();
                let raw = id.get();
                for user in tables.users.values_mut() {
                    user.$links.remove(&raw);
                }
                for dish in tables.dishes.values_mut() {
                    dish.$links.remove(&raw);
                }
                Ok(tables.$table.remove(&raw).is_some())
            }
        }
    };
}

memory_tag_repository!(
    AllergyRepository,
    Allergy,
    AllergyId,
    allergies,
    allergies,
    "allergies_name_key"
);
memory_tag_repository!(
    IngredientRepository,
    Ingredient,
    IngredientId,
    ingredients,
    ingredients,
    "ingredients_name_key"
);

#[async_trait]
impl PendingIngredientRepository for MemoryDatabase {
    async fn count(&self) -> Result<i64, PersistenceError> {
        Ok(self.lock().pending.len() as i64)
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<PendingIngredient>, PersistenceError> {
        let tables = self.lock();
        let all = tables
            .pending
            .iter()
            .map(|(id, (name, user_id))| PendingIngredient {
                id: PendingIngredientId::new(*id),
                name: name.clone(),
                proposed_by: UserId::new(*user_id),
            });
        Ok(page.slice(all))
    }

    async fn find(
        &self,
        id: PendingIngredientId,
    ) -> Result<Option<PendingIngredient>, PersistenceError> {
        Ok(self
            .lock()
            .pending
            .get(&id.get())
            .map(|(name, user_id)| PendingIngredient {
                id,
                name: name.clone(),
                proposed_by: UserId::new(*user_id),
            }))
    }

    async fn name_taken(&self, name: &TagName) -> Result<bool, PersistenceError> {
        Ok(self
            .lock()
            .pending
            .values()
            .any(|(stored, _)| stored == name.as_str()))
    }

    async fn create(
        &self,
        name: &TagName,
        proposed_by: UserId,
    ) -> Result<PendingIngredient, PersistenceError> {
        let mut tables = self.lock();
        if tables.pending.values().any(|(stored, _)| stored == name.as_str()) {
            return Err(unique("pending_ingredients_name_key"));
        }
        if !tables.users.contains_key(&proposed_by.get()) {
            return Err(PersistenceError::foreign_key_violation(
                "pending_ingredients_user_id_fkey",
            ));
        }
        let id = tables.next_id();
        tables
            .pending
            .insert(id, (name.as_str().to_owned(), proposed_by.get()));
        Ok(PendingIngredient {
            id: PendingIngredientId::new(id),
            name: name.as_str().to_owned(),
            proposed_by,
        })
    }

    async fn delete(&self, id: PendingIngredientId) -> Result<bool, PersistenceError> {
        Ok(self.lock().pending.remove(&id.get()).is_some())
    }

    async fn approve(
        &self,
        id: PendingIngredientId,
        name: &TagName,
    ) -> Result<Option<Ingredient>, PersistenceError> {
        let mut tables = self.lock();
        if tables.ingredients.values().any(|stored| stored == name.as_str()) {
            return Err(unique("ingredients_name_key"));
        }
        let Some((_, proposer)) = tables.pending.remove(&id.get()) else {
            return Ok(None);
        };
        let ingredient_id = tables.next_id();
        tables
            .ingredients
            .insert(ingredient_id, name.as_str().to_owned());
        if let Some(user) = tables.users.get_mut(&proposer) {
            user.ingredients.insert(ingredient_id);
        }
        Ok(Some(Ingredient {
            id: IngredientId::new(ingredient_id),
            name: name.as_str().to_owned(),
        }))
    }
}

#[async_trait]
impl RestaurantRepository for MemoryDatabase {
    async fn list(&self, listing: &Listing) -> Result<Vec<Restaurant>, PersistenceError> {
        let tables = self.lock();
        let matching = tables
            .restaurants
            .values()
            .filter(|restaurant| {
                listing.admits([restaurant.name.as_str(), restaurant.email.as_str()])
            })
            .cloned();
        Ok(listing.page.slice(matching))
    }

    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, PersistenceError> {
        Ok(self
            .lock()
            .restaurants
            .values()
            .any(|restaurant| restaurant.email == *email))
    }

    async fn exists(&self, id: RestaurantId) -> Result<bool, PersistenceError> {
        Ok(self.lock().restaurants.contains_key(&id.get()))
    }

    async fn create(&self, draft: &RestaurantDraft) -> Result<Restaurant, PersistenceError> {
        let mut tables = self.lock();
        if tables
            .restaurants
            .values()
            .any(|restaurant| restaurant.email == draft.email)
        {
            return Err(unique("restaurants_email_key"));
        }
        let id = tables.next_id();
        let restaurant = Restaurant {
            id: RestaurantId::new(id),
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
        };
        tables.restaurants.insert(id, restaurant.clone());
        Ok(restaurant)
    }
}

#[async_trait]
impl DishRepository for MemoryDatabase {
    async fn list(&self, listing: &Listing) -> Result<Vec<Dish>, PersistenceError> {
        Ok(self.lock().dish_page(listing, |_| true))
    }

    async fn recommend(
        &self,
        criteria: &RecommendationCriteria,
        listing: &Listing,
    ) -> Result<Vec<Dish>, PersistenceError> {
        let tables = self.lock();
        let stored_allergies: BTreeSet<AllergyId> = match &criteria.allergies {
            AllergyRequirement::SharesUserAllergy(user) => tables
                .users
                .get(&user.get())
                .map(|stored| stored.allergies.iter().copied().map(AllergyId::new).collect())
                .unwrap_or_default(),
            AllergyRequirement::TaggedWithAll(_) => BTreeSet::new(),
        };
        Ok(tables.dish_page(listing, |dish| criteria.admits(dish, &stored_allergies)))
    }

    async fn find(&self, id: DishId) -> Result<Option<Dish>, PersistenceError> {
        Ok(self.lock().dish(id.get()))
    }

    async fn name_taken(
        &self,
        name: &str,
        except: Option<DishId>,
    ) -> Result<bool, PersistenceError> {
        let except = except.map(DishId::get);
        Ok(self
            .lock()
            .dishes
            .iter()
            .any(|(id, dish)| dish.name == name && Some(*id) != except))
    }

    async fn create(&self, draft: &DishDraft) -> Result<Dish, PersistenceError> {
        let mut tables = self.lock();
        if tables.dishes.values().any(|dish| dish.name == draft.name) {
            return Err(unique("dishes_name_key"));
        }
        let stored = tables.stored_dish(draft)?;
        let id = tables.next_id();
        tables.dishes.insert(id, stored);
        tables
            .dish(id)
            .ok_or_else(|| PersistenceError::query("inserted dish vanished"))
    }

    async fn update(&self, id: DishId, draft: &DishDraft) -> Result<bool, PersistenceError> {
        let mut tables = self.lock();
        if !tables.dishes.contains_key(&id.get()) {
            return Ok(false);
        }
        if tables
            .dishes
            .iter()
            .any(|(other, dish)| dish.name == draft.name && *other != id.get())
        {
            return Err(unique("dishes_name_key"));
        }
        let stored = tables.stored_dish(draft)?;
        tables.dishes.insert(id.get(), stored);
        Ok(true)
    }
}
