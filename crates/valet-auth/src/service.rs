//! 자격증명 서비스.
//!
//! 사용자 프로비저닝과 로그인 검증을 오케스트레이션합니다.
//! 두 경로 모두 성공 시 세션 토큰 발급으로 끝납니다.
//!
//! 전송 계층은 구조 검증이 끝난 필드 값을 전달하고, 발급된
//! 자격증명 또는 타입화된 에러를 돌려받습니다.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;
use valet_core::{AuthConfig, OfficeLevel};

use crate::error::{AuthError, AuthResult};
use crate::password::PasswordHasher;
use crate::salt::{generate_salt, SALT_SIZE};
use crate::store::{AuthRecord, UserRecord, UserRepository};
use crate::token::{SessionCredential, TokenIssuer};

/// 계정 생성 요청 값 객체.
///
/// 사용자 필드, 인증 필드, 평문 비밀번호를 하나로 묶어
/// 요청 수준에서 한 번만 검증합니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAccount {
    /// 이름
    #[validate(length(min = 1, max = 100, message = "Nome é obrigatório"))]
    pub first_name: String,
    /// 성
    #[validate(length(min = 1, max = 100, message = "Sobrenome é obrigatório"))]
    pub last_name: String,
    /// 직급
    pub office_level: OfficeLevel,
    /// 이메일 (전역 유일)
    #[validate(email(message = "Email inválido"))]
    pub email: String,
    /// 평문 비밀번호. 해싱 후에는 어디에도 남지 않습니다.
    #[validate(length(min = 1, message = "Senha é obrigatória"))]
    pub raw_password: String,
    /// 소속 주차장 (소유자는 생략 가능)
    pub parking_lot_id: Option<Uuid>,
}

/// 프로비저닝 결과.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedAccount {
    pub user_id: Uuid,
    pub credential: SessionCredential,
}

/// 로그인 결과.
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub office_level: OfficeLevel,
    pub credential: SessionCredential,
}

/// 균일 실패 타이밍을 위한 더미 자격증명.
///
/// 존재하지 않는 이메일에 대해서도 해시 한 번을 수행해
/// "레코드 없음"과 "비밀번호 불일치"의 소요 시간을 비슷하게
/// 유지합니다.
const DUMMY_SALT: &[u8] = &[0u8; SALT_SIZE];
const DUMMY_HASH: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// 자격증명 서비스.
///
/// 저장소 풀, 토큰 발급기, 비밀번호 해셔를 생성 시점에
/// 명시적으로 주입받습니다. 요청 간 공유되는 가변 상태는
/// 없습니다.
pub struct CredentialService {
    pool: PgPool,
    issuer: TokenIssuer,
    hasher: PasswordHasher,
}

impl CredentialService {
    /// 새 서비스를 생성합니다.
    pub fn new(pool: PgPool, issuer: TokenIssuer, hasher: PasswordHasher) -> Self {
        Self {
            pool,
            issuer,
            hasher,
        }
    }

    /// 인증 설정에서 서비스를 생성합니다.
    pub fn from_config(pool: PgPool, config: &AuthConfig) -> AuthResult<Self> {
        Ok(Self {
            pool,
            issuer: TokenIssuer::from_config(config),
            hasher: PasswordHasher::new(config.hasher)?,
        })
    }

    /// 사용자 프로비저닝.
    ///
    /// 사용자 → 인증 레코드 → (비소유자라면) 주차장 소속을
    /// 하나의 트랜잭션으로 삽입합니다. 어느 단계가 실패하든
    /// 전체가 롤백되어 부분 상태가 노출되지 않습니다.
    ///
    /// 토큰은 커밋이 완료된 뒤에만 발급됩니다. 발급된 토큰은
    /// 항상 영속 커밋된 신원에 대응합니다.
    pub async fn provision(&self, account: NewAccount) -> AuthResult<ProvisionedAccount> {
        account.validate()?;

        // 역할/테넌트 일관성 재확인: 소유자가 아니면 주차장이 필요함
        if !account.office_level.is_owner() && account.parking_lot_id.is_none() {
            return Err(AuthError::Validation(
                "Can't create non-owner user without a parking lot".to_string(),
            ));
        }

        let user_id = Uuid::new_v4();
        let salt = generate_salt(SALT_SIZE)?;
        let password_hash = self.hasher.hash(&account.raw_password, &salt)?;

        let user = UserRecord {
            id: user_id,
            first_name: account.first_name,
            last_name: account.last_name,
            office_level: account.office_level.as_str().to_string(),
        };
        let auth = AuthRecord {
            user_id,
            email: account.email,
            password_hash,
            salt: hex::encode(&salt),
        };

        // 중도 실패 시 트랜잭션은 드롭되며 롤백된다
        let mut tx = self.pool.begin().await?;
        UserRepository::insert_user(&mut tx, &user).await?;
        UserRepository::insert_auth_record(&mut tx, &auth).await?;
        if let Some(parking_lot_id) = account.parking_lot_id {
            if !account.office_level.is_owner() {
                UserRepository::insert_membership(&mut tx, user_id, parking_lot_id).await?;
            }
        }
        tx.commit().await?;

        let credential = self.issuer.issue(user_id, account.office_level)?;

        tracing::info!(
            user_id = %user_id,
            office_level = %account.office_level,
            "User provisioned"
        );

        Ok(ProvisionedAccount {
            user_id,
            credential,
        })
    }

    /// 로그인 검증.
    ///
    /// 레코드 부재와 비밀번호 불일치는 내부적으로 구분해 로깅하되
    /// 외부로는 같은 형태로 노출됩니다 ([`AuthError::public_message`]).
    pub async fn login(&self, email: &str, raw_password: &str) -> AuthResult<AuthenticatedUser> {
        let record = UserRepository::find_auth_by_email(&self.pool, email)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Auth record lookup failed"))?;

        let Some(record) = record else {
            // 계정 열거 방지: 더미 해시로 타이밍을 평준화한 뒤
            // 불일치와 같은 외형으로 실패
            let _ = self.hasher.verify(raw_password, DUMMY_HASH, DUMMY_SALT);
            tracing::debug!("Login attempt for unknown email");
            return Err(AuthError::NotFound);
        };

        let salt = hex::decode(&record.salt).map_err(|_| sqlx::Error::ColumnDecode {
            index: "salt".to_string(),
            source: "stored salt is not valid hex".into(),
        })?;

        if !self.hasher.verify(raw_password, &record.password_hash, &salt) {
            tracing::debug!(user_id = %record.user_id, "Password verification failed");
            return Err(AuthError::InvalidCredentials);
        }

        // 인증 레코드가 있으면 사용자도 반드시 존재함 (원자적 생성)
        let user = UserRepository::find_user_by_id(&self.pool, record.user_id)
            .await?
            .ok_or(AuthError::Persistence(sqlx::Error::RowNotFound))?;

        let office_level =
            OfficeLevel::parse(&user.office_level).ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "office_level".to_string(),
                source: "office level outside the known set".into(),
            })?;

        let credential = self.issuer.issue(user.id, office_level)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthenticatedUser {
            user_id: user.id,
            office_level,
            credential,
        })
    }

    /// 계정 삭제.
    ///
    /// Access Token에서 사용자 ID를 추출한 뒤 연쇄 삭제합니다.
    pub async fn delete_account(&self, auth_token: &str) -> AuthResult<Uuid> {
        let user_id = self.issuer.user_id_from_token(auth_token)?;
        UserRepository::delete_user(&self.pool, user_id).await?;
        Ok(user_id)
    }
}
