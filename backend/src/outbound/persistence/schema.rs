//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int4,
        #[max_length = 254]
        email -> Varchar,
        #[max_length = 50]
        full_name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// `USER` or `ADMIN`.
        #[max_length = 16]
        role -> Varchar,
    }
}

diesel::table! {
    allergies (id) {
        id -> Int4,
        #[max_length = 25]
        name -> Varchar,
    }
}

diesel::table! {
    ingredients (id) {
        id -> Int4,
        #[max_length = 25]
        name -> Varchar,
    }
}

diesel::table! {
    restaurants (id) {
        id -> Int4,
        #[max_length = 50]
        name -> Varchar,
        #[max_length = 254]
        email -> Varchar,
        #[max_length = 50]
        phone -> Varchar,
    }
}

diesel::table! {
    dishes (id) {
        id -> Int4,
        #[max_length = 50]
        name -> Varchar,
        #[max_length = 500]
        description -> Varchar,
        price -> Float8,
        image -> Text,
        restaurant_id -> Int4,
    }
}

diesel::table! {
    /// Ingredient proposals awaiting review.
    pending_ingredients (id) {
        id -> Int4,
        #[max_length = 25]
        name -> Varchar,
        /// Proposing user.
        user_id -> Int4,
    }
}

diesel::table! {
    user_allergies (user_id, allergy_id) {
        user_id -> Int4,
        allergy_id -> Int4,
    }
}

diesel::table! {
    /// Ingredients a user dislikes.
    user_ingredients (user_id, ingredient_id) {
        user_id -> Int4,
        ingredient_id -> Int4,
    }
}

diesel::table! {
    /// Allergies a dish triggers.
    dish_allergies (dish_id, allergy_id) {
        dish_id -> Int4,
        allergy_id -> Int4,
    }
}

diesel::table! {
    /// Ingredients a dish contains.
    dish_ingredients (dish_id, ingredient_id) {
        dish_id -> Int4,
        ingredient_id -> Int4,
    }
}

diesel::joinable!(dishes -> restaurants (restaurant_id));
diesel::joinable!(pending_ingredients -> users (user_id));
diesel::joinable!(user_allergies -> users (user_id));
diesel::joinable!(user_allergies -> allergies (allergy_id));
diesel::joinable!(user_ingredients -> users (user_id));
diesel::joinable!(user_ingredients -> ingredients (ingredient_id));
diesel::joinable!(dish_allergies -> dishes (dish_id));
diesel::joinable!(dish_allergies -> allergies (allergy_id));
diesel::joinable!(dish_ingredients -> dishes (dish_id));
diesel::joinable!(dish_ingredients -> ingredients (ingredient_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    allergies,
    ingredients,
    restaurants,
    dishes,
    pending_ingredients,
    user_allergies,
    user_ingredients,
    dish_allergies,
    dish_ingredients,
);
