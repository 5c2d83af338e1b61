//! Integration tests for the account service against a real database.
//!
//! Covers validation order, boundaries, canonical email storage, duplicate
//! handling under concurrency, and credential checks.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;
use storyhub_api::account::{Credentials, NewAccount, EMAIL_TAKEN, USERNAME_TAKEN};
use storyhub_api::auth::password::verify_password;
use storyhub_core::email::DomainLookup;
use storyhub_core::error::CoreError;
use storyhub_db::repositories::UserRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn account(username: &str, password: &str, email: &str) -> NewAccount {
    NewAccount {
        username: Some(username.to_string()),
        password: Some(password.to_string()),
        email: Some(email.to_string()),
        ..Default::default()
    }
}

fn credentials(email: &str, password: &str) -> Credentials {
    Credentials {
        email: Some(email.to_string()),
        password: Some(password.to_string()),
    }
}

// ---------------------------------------------------------------------------
// create_user
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_user_persists_hashed_password_and_returns_identity(pool: PgPool) {
    let service = common::account_service(pool.clone());

    let created = service
        .create_user(NewAccount {
            name: Some("Alice".into()),
            bio: Some("Writes about dragons".into()),
            ..account("alice123", "hunter22", "alice@example.com")
        })
        .await
        .expect("creation should succeed");

    let by_username = UserRepo::find_by_username(&pool, "alice123")
        .await
        .unwrap()
        .expect("user should be found by username");
    let by_email = UserRepo::find_by_email(&pool, "alice@example.com")
        .await
        .unwrap()
        .expect("user should be found by email");

    assert_eq!(by_username.id, created.id);
    assert_eq!(by_email.id, created.id);
    assert_eq!(by_username.name.as_deref(), Some("Alice"));
    assert_eq!(by_username.bio.as_deref(), Some("Writes about dragons"));
    assert!(by_username.profile_picture.is_none());
    assert_ne!(by_username.password_hash, "hunter22");
    assert!(verify_password("hunter22", &by_username.password_hash).unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_user_stores_canonical_email(pool: PgPool) {
    let service = common::account_service(pool.clone());

    let created = service
        .create_user(account("carol99", "longenough", " Carol@Example.COM "))
        .await
        .unwrap();

    assert_eq!(created.email, "Carol@example.com");
    let stored = UserRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(stored.email, "Carol@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_fields_reported_in_order(pool: PgPool) {
    let service = common::account_service(pool);

    let err = service.create_user(NewAccount::default()).await.unwrap_err();
    assert_eq!(err, CoreError::MissingField("username"));

    let err = service
        .create_user(NewAccount {
            username: Some("dave1".into()),
            email: Some("dave@example.com".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::MissingField("password"));

    let err = service
        .create_user(account("dave1", "password1", ""))
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::MissingField("email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_username_conflicts(pool: PgPool) {
    let service = common::account_service(pool);

    service
        .create_user(account("alice123", "hunter22", "alice@example.com"))
        .await
        .unwrap();

    let err = service
        .create_user(account("alice123", "different1", "bob@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::Conflict(USERNAME_TAKEN.into()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_conflicts(pool: PgPool) {
    let service = common::account_service(pool);

    service
        .create_user(account("alice123", "hunter22", "alice@example.com"))
        .await
        .unwrap();

    let err = service
        .create_user(account("bobby", "hunter22", "alice@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::Conflict(EMAIL_TAKEN.into()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn email_differing_only_in_domain_case_conflicts(pool: PgPool) {
    let service = common::account_service(pool);

    service
        .create_user(account("alice123", "hunter22", "alice@example.com"))
        .await
        .unwrap();

    let err = service
        .create_user(account("bobby", "hunter22", "alice@EXAMPLE.com"))
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::Conflict(EMAIL_TAKEN.into()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn email_conflict_in_other_case_wins_over_short_username(pool: PgPool) {
    let service = common::account_service(pool);

    service
        .create_user(account("alice123", "hunter22", "alice@example.com"))
        .await
        .unwrap();

    let err = service
        .create_user(account("abc", "hunter22", " alice@Example.COM"))
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::Conflict(EMAIL_TAKEN.into()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn username_conflict_wins_over_invalid_email(pool: PgPool) {
    let service = common::account_service(pool);

    service
        .create_user(account("alice123", "hunter22", "alice@example.com"))
        .await
        .unwrap();

    let err = service
        .create_user(account("alice123", "hunter22", "not-an-email"))
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Conflict(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_email_checked_before_username_length(pool: PgPool) {
    let service = common::account_service(pool);

    let err = service
        .create_user(account("abc", "hunter22", "not-an-email"))
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::InvalidEmail(_));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn undeliverable_email_checked_before_username_length(pool: PgPool) {
    let service = common::account_service_with_dns(pool.clone(), DomainLookup::NoRecords);

    let err = service
        .create_user(account("abc", "hunter22", "abc@example.com"))
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::InvalidEmail(msg) if msg.contains("does not accept email"));
    assert!(UserRepo::find_by_email(&pool, "abc@example.com")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn null_mx_and_missing_domain_rejected(pool: PgPool) {
    for answer in [DomainLookup::NullMx, DomainLookup::NotFound] {
        let service = common::account_service_with_dns(pool.clone(), answer);
        assert_matches!(
            service
                .create_user(account("alice123", "hunter22", "alice@example.com"))
                .await,
            Err(CoreError::InvalidEmail(_)),
            "{answer:?}"
        );
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deliverable_email_moves_on_to_later_checks(pool: PgPool) {
    let service = common::account_service_with_dns(pool, DomainLookup::AcceptsMail);

    assert_matches!(
        service
            .create_user(account("abc", "hunter22", "abc@example.com"))
            .await,
        Err(CoreError::InvalidUsername(_))
    );
    assert!(service
        .create_user(account("alice123", "hunter22", "alice@example.com"))
        .await
        .is_ok());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_deliverability_accepts_signup(pool: PgPool) {
    let service = common::account_service_with_dns(pool, DomainLookup::Unknown);

    assert!(service
        .create_user(account("alice123", "hunter22", "alice@example.com"))
        .await
        .is_ok());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn username_length_boundaries(pool: PgPool) {
    let service = common::account_service(pool);

    let four = "abcd";
    let nineteen = "a".repeat(19);
    let three = "abc";
    let twenty = "b".repeat(20);

    assert!(service
        .create_user(account(four, "hunter22", "four@example.com"))
        .await
        .is_ok());
    assert!(service
        .create_user(account(&nineteen, "hunter22", "nineteen@example.com"))
        .await
        .is_ok());

    assert_matches!(
        service
            .create_user(account(three, "hunter22", "three@example.com"))
            .await,
        Err(CoreError::InvalidUsername(_))
    );
    assert_matches!(
        service
            .create_user(account(&twenty, "hunter22", "twenty@example.com"))
            .await,
        Err(CoreError::InvalidUsername(_))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn password_length_boundary(pool: PgPool) {
    let service = common::account_service(pool);

    assert_matches!(
        service
            .create_user(account("seven", "1234567", "seven@example.com"))
            .await,
        Err(CoreError::WeakPassword(_))
    );
    assert!(service
        .create_user(account("eight", "12345678", "eight@example.com"))
        .await
        .is_ok());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejected_create_writes_nothing(pool: PgPool) {
    let service = common::account_service(pool.clone());

    let _ = service
        .create_user(account("weakling", "short", "weak@example.com"))
        .await
        .unwrap_err();

    assert!(UserRepo::find_by_username(&pool, "weakling")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_profile_picture_conflicts(pool: PgPool) {
    let service = common::account_service(pool);
    let picture = Some("https://cdn.example.com/a.png".to_string());

    service
        .create_user(NewAccount {
            profile_picture: picture.clone(),
            ..account("alice123", "hunter22", "alice@example.com")
        })
        .await
        .unwrap();

    let err = service
        .create_user(NewAccount {
            profile_picture: picture,
            ..account("bobby", "hunter22", "bob@example.com")
        })
        .await
        .unwrap_err();
    assert_matches!(err, CoreError::Conflict(msg) if msg.contains("profile picture"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_duplicate_usernames_insert_once(pool: PgPool) {
    let service = common::account_service(pool.clone());

    let (a, b) = tokio::join!(
        service.create_user(account("racer", "hunter22", "racer1@example.com")),
        service.create_user(account("racer", "hunter22", "racer2@example.com")),
    );

    let outcomes = [a, b];
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one create must win: {outcomes:?}");
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(CoreError::Conflict(msg)) if msg == USERNAME_TAKEN)));

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = 'racer'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

// ---------------------------------------------------------------------------
// authenticate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticate_accepts_only_the_right_password(pool: PgPool) {
    let service = common::account_service(pool);

    let created = service
        .create_user(account("alice123", "hunter22", "alice@example.com"))
        .await
        .unwrap();

    let identity = service
        .authenticate(credentials("alice@example.com", "hunter22"))
        .await
        .expect("correct password should authenticate");
    assert_eq!(identity.user_id, created.id);

    let err = service
        .authenticate(credentials("alice@example.com", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::InvalidCredentials);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticate_canonicalizes_lookup_email(pool: PgPool) {
    let service = common::account_service(pool);

    let created = service
        .create_user(account("alice123", "hunter22", "alice@example.com"))
        .await
        .unwrap();

    let identity = service
        .authenticate(credentials("alice@EXAMPLE.COM", "hunter22"))
        .await
        .unwrap();
    assert_eq!(identity.user_id, created.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticate_unknown_email_is_not_found(pool: PgPool) {
    let service = common::account_service(pool);

    let err = service
        .authenticate(credentials("ghost@example.com", "whatever1"))
        .await
        .unwrap_err();
    assert_eq!(err, CoreError::NotFound { entity: "User" });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticate_requires_both_fields(pool: PgPool) {
    let service = common::account_service(pool);

    assert_eq!(
        service.authenticate(Credentials::default()).await.unwrap_err(),
        CoreError::MissingField("email")
    );
    assert_eq!(
        service
            .authenticate(Credentials {
                email: Some("alice@example.com".into()),
                password: None,
            })
            .await
            .unwrap_err(),
        CoreError::MissingField("password")
    );
}
