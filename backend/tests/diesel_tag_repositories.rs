//! Integration tests for the Diesel allergy, ingredient, and pending
//! ingredient repositories against embedded PostgreSQL.
//!
//! The schema has no cascading deletes, so these suites pin down that the
//! adapters unlink dependent rows inside the delete transaction.

use pagination::{PageQuery, PageRequest};
use rstest::{fixture, rstest};
use safeplate::domain::ports::{
    AllergyRepository, DishRepository, IngredientRepository, PendingIngredientRepository,
    PersistenceError, UserRepository,
};
use safeplate::domain::{ADMIN_PAGE_SIZE, Listing, TagName};

mod support;

use support::catalogue::Catalogue;
use support::{PgWorld, pg_world};

#[fixture]
fn world() -> Option<PgWorld> {
    pg_world()
}

fn search(term: &str) -> Listing {
    Listing::from_query(
        &PageQuery {
            page: None,
            search: Some(term.to_owned()),
        },
        ADMIN_PAGE_SIZE,
    )
}

#[rstest]
fn deleting_an_allergy_unlinks_users_and_dishes(world: Option<PgWorld>) {
    let Some(world) = world else {
        return;
    };
    let catalogue = Catalogue::new(&world.pool);
    world.run(async {
        let kitchen = catalogue.restaurant("Trattoria Roma").await;
        let gluten = catalogue.allergy("גלוטן").await;
        let nuts = catalogue.allergy("אגוזים").await;
        let dish = catalogue.dish(kitchen, "Focaccia", &[gluten, nuts], &[]).await;
        let user = catalogue.user("dana@example.com", &[gluten, nuts], &[]).await;

        assert!(catalogue.allergies.delete(gluten).await.expect("delete"));

        assert_eq!(catalogue.allergies.find(gluten).await.expect("find"), None);
        let user = catalogue
            .users
            .find_by_id(user.id)
            .await
            .expect("find user")
            .expect("user kept");
        assert_eq!(user.allergy_ids().into_iter().collect::<Vec<_>>(), vec![nuts]);
        let dish = catalogue
            .dishes
            .find(dish.id)
            .await
            .expect("find dish")
            .expect("dish kept");
        assert_eq!(dish.allergy_ids().into_iter().collect::<Vec<_>>(), vec![nuts]);

        assert!(!catalogue.allergies.delete(gluten).await.expect("second delete"));
    });
}

#[rstest]
fn deleting_an_ingredient_unlinks_dislikes_and_dishes(world: Option<PgWorld>) {
    let Some(world) = world else {
        return;
    };
    let catalogue = Catalogue::new(&world.pool);
    world.run(async {
        let kitchen = catalogue.restaurant("Cafe Noir").await;
        let onion = catalogue.ingredient("בצל").await;
        let basil = catalogue.ingredient("בזיליקום").await;
        let dish = catalogue.dish(kitchen, "Onion tart", &[], &[onion, basil]).await;
        let user = catalogue.user("noam@example.com", &[], &[onion]).await;

        assert!(catalogue.ingredients.delete(onion).await.expect("delete"));

        let user = catalogue
            .users
            .find_by_id(user.id)
            .await
            .expect("find user")
            .expect("user kept");
        assert!(user.ingredients.is_empty());
        let dish = catalogue
            .dishes
            .find(dish.id)
            .await
            .expect("find dish")
            .expect("dish kept");
        assert_eq!(
            dish.ingredient_ids().into_iter().collect::<Vec<_>>(),
            vec![basil]
        );
    });
}

#[rstest]
fn renaming_onto_a_taken_name_is_a_unique_violation(world: Option<PgWorld>) {
    let Some(world) = world else {
        return;
    };
    let catalogue = Catalogue::new(&world.pool);
    world.run(async {
        let gluten = catalogue.allergy("גלוטן").await;
        catalogue.allergy("אגוזים").await;

        let err = catalogue
            .allergies
            .rename(gluten, &TagName::from_trusted("אגוזים"))
            .await
            .expect_err("duplicate name rejected");
        assert_eq!(err, PersistenceError::unique_violation("allergies_name_key"));

        assert!(
            catalogue
                .allergies
                .rename(gluten, &TagName::from_trusted("חיטה"))
                .await
                .expect("free name accepted")
        );
    });
}

#[rstest]
fn tag_search_escapes_wildcards(world: Option<PgWorld>) {
    let Some(world) = world else {
        return;
    };
    let catalogue = Catalogue::new(&world.pool);
    world.run(async {
        catalogue.ingredient("בצל").await;
        catalogue.ingredient("בצל ירוק").await;

        let wildcard = catalogue.ingredients.list(&search("%")).await.expect("list");
        assert!(wildcard.is_empty());

        let green = catalogue.ingredients.list(&search("ירוק")).await.expect("list");
        assert_eq!(green.len(), 1);
        assert_eq!(green[0].name, "בצל ירוק");
    });
}

#[rstest]
fn approving_a_proposal_creates_and_links_the_ingredient(world: Option<PgWorld>) {
    let Some(world) = world else {
        return;
    };
    let catalogue = Catalogue::new(&world.pool);
    world.run(async {
        let user = catalogue.user("maya@example.com", &[], &[]).await;
        let proposal = catalogue
            .pending
            .create(&TagName::from_trusted("כוסברה"), user.id)
            .await
            .expect("propose");

        let ingredient = catalogue
            .pending
            .approve(proposal.id, &TagName::from_trusted("כוסברה"))
            .await
            .expect("approve")
            .expect("proposal exists");
        assert_eq!(ingredient.name, "כוסברה");

        assert_eq!(catalogue.pending.count().await.expect("count"), 0);
        let user = catalogue
            .users
            .find_by_id(user.id)
            .await
            .expect("find user")
            .expect("user kept");
        assert_eq!(user.ingredients, vec![ingredient]);

        let again = catalogue
            .pending
            .approve(proposal.id, &TagName::from_trusted("כוסברה"))
            .await
            .expect("approve twice");
        assert_eq!(again, None);
    });
}

#[rstest]
fn a_failed_approval_keeps_the_proposal(world: Option<PgWorld>) {
    let Some(world) = world else {
        return;
    };
    let catalogue = Catalogue::new(&world.pool);
    world.run(async {
        let user = catalogue.user("lior@example.com", &[], &[]).await;
        catalogue.ingredient("כוסברה").await;
        let proposal = catalogue
            .pending
            .create(&TagName::from_trusted("כוסברה טרייה"), user.id)
            .await
            .expect("propose");

        let err = catalogue
            .pending
            .approve(proposal.id, &TagName::from_trusted("כוסברה"))
            .await
            .expect_err("ingredient name already taken");
        assert_eq!(err, PersistenceError::unique_violation("ingredients_name_key"));

        let kept = catalogue
            .pending
            .list(PageRequest::first(ADMIN_PAGE_SIZE))
            .await
            .expect("list proposals");
        assert_eq!(kept, vec![proposal]);
    });
}

#[rstest]
fn deleting_a_user_removes_links_and_proposals(world: Option<PgWorld>) {
    let Some(world) = world else {
        return;
    };
    let catalogue = Catalogue::new(&world.pool);
    world.run(async {
        let gluten = catalogue.allergy("גלוטן").await;
        let onion = catalogue.ingredient("בצל").await;
        let user = catalogue.user("omer@example.com", &[gluten], &[onion]).await;
        catalogue
            .pending
            .create(&TagName::from_trusted("שמיר"), user.id)
            .await
            .expect("propose");

        assert!(catalogue.users.delete(user.id).await.expect("delete user"));

        assert_eq!(catalogue.users.find_by_id(user.id).await.expect("find"), None);
        assert_eq!(catalogue.pending.count().await.expect("count"), 0);
        assert!(!catalogue.users.delete(user.id).await.expect("second delete"));
    });
}
