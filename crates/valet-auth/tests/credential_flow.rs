//! 자격증명 발급 흐름 통합 테스트
//!
//! 토큰 발급 / 비밀번호 해싱 / 에러 노출 형태는 DB 없이 검증하고,
//! 프로비저닝과 로그인 시나리오는 `DATABASE_URL`이 설정된 환경에서만
//! `cargo test -- --ignored`로 실행합니다.

use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;
use valet_auth::{
    AuthError, CredentialService, NewAccount, PasswordHasher, TokenIssuer, UserRepository,
};
use valet_core::{HasherConfig, OfficeLevel};

/// 테스트용 발급기. 키는 고정, 수명은 짧게.
fn issuer() -> TokenIssuer {
    TokenIssuer::new(SecretString::new("integration-test-secret".into()), 15, 3)
}

/// 테스트용 해셔. 메모리 비용을 낮춰 테스트를 빠르게 유지합니다.
fn hasher() -> PasswordHasher {
    PasswordHasher::new(HasherConfig {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

fn funcionario_account(email: &str) -> NewAccount {
    NewAccount {
        first_name: "Ana".to_string(),
        last_name: "Silva".to_string(),
        office_level: OfficeLevel::Funcionario,
        email: email.to_string(),
        raw_password: "hunter2".to_string(),
        parking_lot_id: Some(Uuid::new_v4()),
    }
}

#[test]
fn issued_credential_round_trips_role_and_csrf() {
    let issuer = issuer();
    let user_id = Uuid::new_v4();

    let credential = issuer.issue(user_id, OfficeLevel::Funcionario).unwrap();
    let claims = issuer.decode_access(&credential.auth_token).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.office_level, OfficeLevel::Funcionario);
    // 토큰 내부 CSRF 클레임과 별도 채널용 비밀값이 일치해야
    // 이중 제출 검증이 가능합니다.
    assert_eq!(claims.csrf, credential.csrf_secret);
    assert_eq!(credential.expires_in, 15 * 60);

    let refresh = issuer.decode_refresh(&credential.refresh_token).unwrap();
    assert_eq!(refresh.sub, user_id.to_string());
    assert_eq!(refresh.token_type, "refresh");
}

#[test]
fn each_session_gets_a_fresh_csrf_secret() {
    let issuer = issuer();
    let user_id = Uuid::new_v4();

    let first = issuer.issue(user_id, OfficeLevel::Dono).unwrap();
    let second = issuer.issue(user_id, OfficeLevel::Dono).unwrap();

    assert_ne!(first.csrf_secret, second.csrf_secret);
    assert_ne!(first.auth_token, second.auth_token);
}

#[test]
fn hash_and_verify_with_stored_salt() {
    let hasher = hasher();
    let salt = valet_auth::generate_salt(valet_auth::SALT_SIZE).unwrap();

    let stored = hasher.hash("hunter2", &salt).unwrap();

    assert!(hasher.verify("hunter2", &stored, &salt));
    assert!(!hasher.verify("hunter3", &stored, &salt));
}

#[test]
fn unknown_user_and_bad_password_share_public_message() {
    // 계정 존재 여부가 응답 문구로 드러나면 안 됩니다.
    let not_found = AuthError::NotFound;
    let bad_password = AuthError::InvalidCredentials;

    assert_eq!(not_found.public_message(), bad_password.public_message());
    assert_eq!(not_found.public_message(), "Login inválido");
}

/// `DATABASE_URL` 환경의 Postgres 풀 (마이그레이션 적용 포함).
async fn live_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored tests");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("failed to connect to test database");
    UserRepository::migrate(&pool).await.expect("migration failed");
    pool
}

async fn live_service() -> CredentialService {
    CredentialService::new(live_pool().await, issuer(), hasher())
}

async fn row_count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT count(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count query failed")
}

fn unique_email() -> String {
    format!("ana.silva+{}@example.com", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore]
async fn provision_then_login_returns_same_user() {
    let service = live_service().await;
    let email = unique_email();

    let provisioned = service.provision(funcionario_account(&email)).await.unwrap();
    let authenticated = service.login(&email, "hunter2").await.unwrap();

    assert_eq!(authenticated.user_id, provisioned.user_id);
    assert_eq!(authenticated.office_level, OfficeLevel::Funcionario);
}

#[tokio::test]
#[ignore]
async fn duplicate_email_is_rejected_and_state_unchanged() {
    let pool = live_pool().await;
    let service = CredentialService::new(pool.clone(), issuer(), hasher());
    let email = unique_email();

    let first = service.provision(funcionario_account(&email)).await.unwrap();
    let users_before = row_count(&pool, "users").await;
    let auth_before = row_count(&pool, "users_authentication").await;

    let result = service.provision(funcionario_account(&email)).await;
    assert!(matches!(result, Err(AuthError::DuplicateEmail)));

    // 실패한 시도는 어떤 테이블에도 행을 남기지 않아야 합니다.
    assert_eq!(row_count(&pool, "users").await, users_before);
    assert_eq!(row_count(&pool, "users_authentication").await, auth_before);

    // 첫 번째 계정은 그대로 로그인 가능해야 합니다.
    let authenticated = service.login(&email, "hunter2").await.unwrap();
    assert_eq!(authenticated.user_id, first.user_id);
}

#[tokio::test]
#[ignore]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let service = live_service().await;
    let email = unique_email();
    service.provision(funcionario_account(&email)).await.unwrap();

    let wrong_password = service.login(&email, "hunter3").await.unwrap_err();
    let unknown_email = service
        .login(&unique_email(), "hunter2")
        .await
        .unwrap_err();

    assert_eq!(
        wrong_password.public_message(),
        unknown_email.public_message()
    );
}

#[tokio::test]
#[ignore]
async fn delete_account_removes_login() {
    let service = live_service().await;
    let email = unique_email();

    let provisioned = service.provision(funcionario_account(&email)).await.unwrap();
    let deleted = service
        .delete_account(&provisioned.credential.auth_token)
        .await
        .unwrap();

    assert_eq!(deleted, provisioned.user_id);
    assert!(matches!(
        service.login(&email, "hunter2").await,
        Err(AuthError::NotFound)
    ));
}
