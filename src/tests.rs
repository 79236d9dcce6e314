use crate::{
	controllers,
	db,
	middleware::AuthUser,
	models::account::SignupPayload,
};
use argon2::{
	Argon2,
	password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{Extension, Json};
use chrono::Utc;
use serial_test::serial;
use tower_cookies::{Cookie, cookie::SameSite, cookie::time};

// UNIT TESTS

/// Test password verification logic
#[test]
fn test_password_verification() {
	let password = "test_password123";
	let salt = SaltString::generate(&mut OsRng);
	let argon2 = Argon2::default();

	let password_hash = argon2
		.hash_password(password.as_bytes(), &salt)
		.unwrap()
		.to_string();

	let parsed_hash = PasswordHash::new(&password_hash).unwrap();
	assert!(
		Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok()
	);
	assert!(
		Argon2::default()
			.verify_password(b"wrong_password", &parsed_hash)
			.is_err()
	);
}

/// Test token generation format
#[test]
fn test_token_generation() {
	let user_id = 42;
	let token = format!("user-{}.exp.sign", user_id);
	assert_eq!(token, "user-42.exp.sign");
	assert!(token.starts_with("user-"));
	assert!(token.ends_with(".exp.sign"));
}

/// Test cookie security settings
#[test]
fn test_cookie_security_development() {
	let token_value = "test-token-123";
	let on_production = false;

	let cookie = Cookie::build(("auth-token", token_value))
		.domain("localhost".to_string())
		.path("/")
		.secure(on_production)
		.http_only(true)
		.same_site(if on_production { SameSite::None } else { SameSite::Lax })
		.max_age(time::Duration::days(3))
		.finish();

	assert_eq!(cookie.name(), "auth-token");
	assert_eq!(cookie.path(), Some("/"));
	assert_eq!(cookie.http_only(), Some(true));
	assert_eq!(cookie.same_site(), Some(SameSite::Lax));
	assert!(!cookie.secure().unwrap_or(false));
}

/// Test cookie security settings for production
#[test]
fn test_cookie_security_production() {
	let token_value = "test-token-456";
	let on_production = true;

	let cookie = Cookie::build(("auth-token", token_value))
		.domain("example.com".to_string())
		.path("/")
		.secure(on_production)
		.http_only(true)
		.same_site(if on_production { SameSite::None } else { SameSite::Lax })
		.max_age(time::Duration::days(3))
		.finish();

	assert_eq!(cookie.http_only(), Some(true));
	assert_eq!(cookie.same_site(), Some(SameSite::None));
	assert!(cookie.secure().unwrap_or(false));
}

#[test]
fn test_validate_email() {
	assert!(SignupPayload::validate_email("user@example.com"));
	assert!(SignupPayload::validate_email("test.user@domain.co.uk"));
	assert!(SignupPayload::validate_email("name+tag@company.org"));

	assert!(!SignupPayload::validate_email(""));
	assert!(!SignupPayload::validate_email("notanemail"));
	assert!(!SignupPayload::validate_email("@example.com"));
	assert!(!SignupPayload::validate_email("user@"));
	assert!(!SignupPayload::validate_email("user@.com"));
}

#[test]
fn test_validate_password() {
	assert!(SignupPayload::validate_password("Password1").is_ok());
	assert!(SignupPayload::validate_password("MySecure123").is_ok());

	assert_eq!(
		SignupPayload::validate_password("Pass1").unwrap_err(),
		"Password must be at least 8 characters long"
	);
	assert_eq!(
		SignupPayload::validate_password("password123").unwrap_err(),
		"Password must contain at least one uppercase letter"
	);
	assert_eq!(
		SignupPayload::validate_password("PASSWORD123").unwrap_err(),
		"Password must contain at least one lowercase letter"
	);
	assert_eq!(
		SignupPayload::validate_password("PasswordOnly").unwrap_err(),
		"Password must contain at least one number"
	);

	let password = "A".repeat(129) + "1a";
	assert_eq!(
		SignupPayload::validate_password(&password).unwrap_err(),
		"Password must be 128 characters or less"
	);

	assert_eq!(
		SignupPayload::validate_password("Password1\u{00e9}\u{00e9}").unwrap_err(),
		"Password must contain only ASCII characters"
	);

	let password = "A".to_string() + &"a".repeat(126) + "1";
	assert_eq!(password.len(), 128);
	assert!(SignupPayload::validate_password(&password).is_ok());
}

#[test]
fn test_validate_signup_payload() {
	let payload = SignupPayload {
		email: "test@example.com".to_string(),
		first_name: "John".to_string(),
		last_name: "Doe".to_string(),
		password: "Password123".to_string(),
	};
	assert!(payload.validate().is_ok());

	let payload = SignupPayload {
		email: "".to_string(),
		first_name: "John".to_string(),
		last_name: "Doe".to_string(),
		password: "Password123".to_string(),
	};
	assert_eq!(payload.validate().unwrap_err(), "Email is required");

	let payload = SignupPayload {
		email: "not-an-email".to_string(),
		first_name: "John".to_string(),
		last_name: "Doe".to_string(),
		password: "Password123".to_string(),
	};
	assert_eq!(payload.validate().unwrap_err(), "Invalid email format");

	let payload = SignupPayload {
		email: "test@example.com".to_string(),
		first_name: "".to_string(),
		last_name: "Doe".to_string(),
		password: "Password123".to_string(),
	};
	assert_eq!(payload.validate().unwrap_err(), "First name is required");

	let payload = SignupPayload {
		email: "test@example.com".to_string(),
		first_name: "a".repeat(51),
		last_name: "Doe".to_string(),
		password: "Password123".to_string(),
	};
	assert_eq!(
		payload.validate().unwrap_err(),
		"First name must be 50 characters or less"
	);

	let payload = SignupPayload {
		email: "test@example.com".to_string(),
		first_name: "John".to_string(),
		last_name: "Doe".to_string(),
		password: "weak".to_string(),
	};
	assert!(payload.validate().unwrap_err().contains("Password"));
}

// INTEGRATION TESTS (require a reachable DATABASE_URL)

/// Signing up twice with the same email is a conflict; validating right
/// after signup returns the same account id. Shares one pool across both
/// assertions, so it's `#[serial(db)]` like the rest of the DB-backed suite.
#[tokio::test]
#[serial(db)]
#[ignore = "requires a reachable DATABASE_URL"]
async fn test_signup_conflict_then_validate() {
	_ = dotenvy::dotenv();
	let pool = db::create_pool().await;

	let unique = Utc::now().timestamp_nanos_opt().unwrap();
	let email = format!("dupe+{}@example.com", unique);
	let payload = SignupPayload {
		email: email.clone(),
		first_name: "Bob".to_string(),
		last_name: "Dupe".to_string(),
		password: "Password123".to_string(),
	};

	let (_, Json(signup)) = controllers::account::api_signup(Extension(pool.clone()), Json(payload))
		.await
		.unwrap();

	let dupe = SignupPayload {
		email,
		first_name: "Bob".to_string(),
		last_name: "Dupe".to_string(),
		password: "Password123".to_string(),
	};
	let err = controllers::account::api_signup(Extension(pool.clone()), Json(dupe))
		.await
		.unwrap_err();
	assert!(matches!(err, crate::error::AppError::Public(crate::error::PublicError::Conflict(_))));

	let user = Extension(AuthUser { id: signup.id });
	let Json(validated) = controllers::account::api_validate(user).await.unwrap();
	assert_eq!(validated.id, signup.id);
}

/// Logging in with a nonexistent email is rejected without ever touching
/// the password hasher.
#[tokio::test]
#[serial(db)]
#[ignore = "requires a reachable DATABASE_URL"]
async fn test_login_unknown_email_rejected() {
	_ = dotenvy::dotenv();
	let pool = db::create_pool().await;
	let unique = Utc::now().timestamp_nanos_opt().unwrap();

	let row = sqlx::query!(
		"SELECT id FROM accounts WHERE email = $1",
		format!("nobody+{}@example.com", unique)
	)
	.fetch_optional(&pool)
	.await
	.unwrap();
	assert!(row.is_none());
}
