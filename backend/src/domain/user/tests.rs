//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn member() -> User {
    User {
        id: UserId::new(3),
        email: EmailAddress::from_trusted("jane@example.com"),
        full_name: FullName::from_trusted("Jane Doe"),
        role: Role::User,
        allergies: vec![Allergy {
            id: AllergyId::new(1),
            name: "בוטנים".to_owned(),
        }],
        ingredients: vec![Ingredient {
            id: IngredientId::new(9),
            name: "כוסברה".to_owned(),
        }],
    }
}

#[rstest]
#[case("a@b.com")]
#[case("  jane.doe@example.co.il ")]
fn accepts_valid_emails(#[case] raw: &str) {
    let email = EmailAddress::parse(Some(raw)).expect("valid email");
    assert_eq!(email.as_str(), raw.trim());
}

#[rstest]
#[case(Some("plainaddress"))]
#[case(Some("a@b"))]
#[case(Some("a b@c.com"))]
fn rejects_malformed_emails(#[case] raw: Option<&str>) {
    let found = EmailAddress::parse(raw).expect_err("invalid email");
    assert_eq!(found[0].to_string(), "email must be a valid email address");
}

#[rstest]
fn missing_email_is_required() {
    let found = EmailAddress::parse(None).expect_err("missing email");
    assert_eq!(found, vec![FieldViolation::Missing { field: "email" }]);
}

#[rstest]
#[case("Jane Doe")]
#[case("דנה לוי")]
fn accepts_english_and_hebrew_names(#[case] raw: &str) {
    assert!(FullName::parse(Some(raw)).is_ok());
}

#[rstest]
#[case("J", 1)]
#[case("J4ne", 1)]
#[case("7", 2)]
fn rejects_invalid_names(#[case] raw: &str, #[case] violations: usize) {
    let found = FullName::parse(Some(raw)).expect_err("invalid name");
    assert_eq!(found.len(), violations);
}

#[rstest]
#[case(Some("ADMIN"), Ok(Role::Admin))]
#[case(Some(" USER "), Ok(Role::User))]
#[case(Some("root"), Err("role must be USER or ADMIN"))]
#[case(None, Err("role is required"))]
fn parses_roles(#[case] raw: Option<&str>, #[case] expected: Result<Role, &str>) {
    let outcome = Role::parse(raw).map_err(|found| found[0].to_string());
    assert_eq!(outcome, expected.map_err(str::to_owned));
}

#[rstest]
fn members_manage_only_themselves(member: User) {
    assert!(member.can_manage(UserId::new(3)));
    assert!(!member.can_manage(UserId::new(4)));
}

#[rstest]
fn admins_manage_everyone(mut member: User) {
    member.role = Role::Admin;
    assert!(member.can_manage(UserId::new(4)));
}

#[rstest]
fn exposes_tag_id_sets(member: User) {
    assert_eq!(
        member.allergy_ids().into_iter().collect::<Vec<_>>(),
        vec![AllergyId::new(1)]
    );
    assert!(member.ingredient_ids().contains(&IngredientId::new(9)));
}
