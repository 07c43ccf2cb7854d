//! 자격증명 저장소 어댑터.
//!
//! 사용자, 인증 레코드, 주차장 소속에 대한 데이터베이스 작업을
//! 처리합니다. 쓰기 작업은 호출자가 연 트랜잭션 안에서 수행되어
//! 원자성이 보장됩니다. 이메일 유일 인덱스가 동시 프로비저닝의
//! 직렬화 지점입니다.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// 사용자 레코드.
///
/// users 테이블의 데이터베이스 표현입니다. 직급은 텍스트로
/// 저장되며 서비스 경계에서 닫힌 집합으로 파싱됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub office_level: String,
}

/// 인증 레코드.
///
/// 사용자와 1:1 관계입니다. 솔트는 hex 인코딩 문자열로,
/// 해시는 불투명 인코딩 문자열로 저장됩니다. 평문 비밀번호는
/// 어떤 형태로도 저장되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthRecord {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
}

/// 주차장 소속 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MembershipRecord {
    pub user_id: Uuid,
    pub parking_lot_id: Uuid,
}

/// 사용자 저장소.
pub struct UserRepository;

impl UserRepository {
    /// 마이그레이션 적용.
    pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(pool).await
    }

    /// 사용자 삽입 (트랜잭션 내).
    pub async fn insert_user(
        tx: &mut Transaction<'_, Postgres>,
        user: &UserRecord,
    ) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, office_level)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.office_level)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// 인증 레코드 삽입 (트랜잭션 내).
    ///
    /// 이메일 유일 제약 위반은 [`AuthError::DuplicateEmail`]로
    /// 매핑됩니다. 동시 삽입의 패자는 조용한 덮어쓰기가 아니라
    /// 이 에러를 관찰합니다.
    pub async fn insert_auth_record(
        tx: &mut Transaction<'_, Postgres>,
        record: &AuthRecord,
    ) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users_authentication (user_id, email, password_hash, salt)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.user_id)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.salt)
        .execute(&mut **tx)
        .await
        .map_err(map_unique_violation)?;

        Ok(())
    }

    /// 주차장 소속 삽입 (트랜잭션 내).
    pub async fn insert_membership(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        parking_lot_id: Uuid,
    ) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO parking_lot_employees (user_id, parking_lot_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(parking_lot_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// 이메일 정확 일치로 인증 레코드 조회.
    pub async fn find_auth_by_email(pool: &PgPool, email: &str) -> AuthResult<Option<AuthRecord>> {
        let record = sqlx::query_as::<_, AuthRecord>(
            r#"
            SELECT user_id, email, password_hash, salt
            FROM users_authentication
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// ID로 사용자 조회.
    pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> AuthResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, first_name, last_name, office_level
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// 전체 사용자 목록.
    pub async fn list_users(pool: &PgPool) -> AuthResult<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, first_name, last_name, office_level
            FROM users
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// 사용자 삭제.
    ///
    /// users_authentication, parking_lot_employees 행은
    /// ON DELETE CASCADE로 함께 제거됩니다.
    pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> AuthResult<()> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AuthError::NotFound);
        }

        tx.commit().await?;

        tracing::info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}

/// 이메일 유일 제약 위반을 도메인 에러로 매핑합니다.
fn map_unique_violation(e: sqlx::Error) -> AuthError {
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        AuthError::DuplicateEmail
    } else {
        AuthError::Persistence(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_unique_errors_pass_through() {
        let mapped = map_unique_violation(sqlx::Error::RowNotFound);
        assert!(matches!(mapped, AuthError::Persistence(_)));
    }
}
