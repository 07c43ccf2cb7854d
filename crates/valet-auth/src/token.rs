//! 세션 토큰 발급.
//!
//! Access Token / Refresh Token / CSRF 비밀값 생성 및 검증.
//! 토큰은 자기완결형(stateless)이며 서버 측 세션 테이블은 없습니다.
//! 유효한 세션 자격증명의 형태는 이 모듈이 단일 기준입니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use valet_core::{AuthConfig, OfficeLevel};

use crate::salt::{generate_csrf_secret, EntropyError};

/// JWT Access Token 페이로드.
///
/// 직급 클레임과 CSRF 바인딩 클레임을 포함합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: String,
    /// 사용자 직급
    pub office_level: OfficeLevel,
    /// CSRF 바인딩 값 (double-submit 검증용)
    pub csrf: String,
    /// Issued At (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 토큰 고유 식별자
    pub jti: String,
}

impl Claims {
    /// 토큰이 만료되었는지 확인.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Refresh Token 페이로드.
///
/// Access Token 재발급에만 사용됩니다. 재발급 플로우 자체는
/// 전송 계층의 몫이지만 여기서 표현 가능해야 합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject - 사용자 ID
    pub sub: String,
    /// Issued At
    pub iat: i64,
    /// Expiration
    pub exp: i64,
    /// JWT ID
    pub jti: String,
    /// Token type (항상 "refresh")
    pub token_type: String,
}

/// 발급된 세션 자격증명.
///
/// 영속화되지 않는 값입니다. CSRF 비밀값은 서명된 토큰과 별도
/// 채널로 전달되어 상태 변경 요청 시 다시 제출됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCredential {
    /// Access Token (단기)
    pub auth_token: String,
    /// Refresh Token (장기)
    pub refresh_token: String,
    /// 세션별 CSRF 비밀값
    pub csrf_secret: String,
    /// Access Token 만료 시간 (초)
    pub expires_in: i64,
}

/// 토큰 발급/검증 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// 서명 실패 (키 사용 불가 포함)
    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    /// CSRF 비밀값 생성 실패
    #[error(transparent)]
    Entropy(#[from] EntropyError),
    /// 토큰 만료
    #[error("Token expired")]
    Expired,
    /// 형식이 잘못된 토큰
    #[error("Invalid token")]
    Invalid,
    /// 디코딩 실패
    #[error("Token decoding failed")]
    Decoding,
}

/// 세션 토큰 발급기.
///
/// 프로세스 전역 서명 키 하나를 사용하며(초기화 후 읽기 전용),
/// 키는 생성 시점에 설정으로부터 명시적으로 주입됩니다.
/// 저장소에는 접근하지 않습니다.
pub struct TokenIssuer {
    secret: SecretString,
    access_minutes: i64,
    refresh_days: i64,
}

impl TokenIssuer {
    /// 새 발급기를 생성합니다.
    pub fn new(secret: SecretString, access_minutes: i64, refresh_days: i64) -> Self {
        Self {
            secret,
            access_minutes,
            refresh_days,
        }
    }

    /// 인증 설정에서 발급기를 생성합니다.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            config.access_token_minutes,
            config.refresh_token_days,
        )
    }

    /// (사용자 ID, 직급)에 바인딩된 세션 자격증명 발급.
    ///
    /// Access Token에는 직급 클레임과 CSRF 바인딩 클레임이 들어가고,
    /// 같은 CSRF 비밀값이 별도 채널용으로 함께 반환됩니다.
    pub fn issue(
        &self,
        user_id: Uuid,
        office_level: OfficeLevel,
    ) -> Result<SessionCredential, TokenError> {
        let csrf_secret = generate_csrf_secret()?;
        let now = Utc::now();

        let claims = Claims {
            sub: user_id.to_string(),
            office_level,
            csrf: csrf_secret.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.access_minutes)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };
        let refresh_claims = RefreshClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.refresh_days)).timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type: "refresh".to_string(),
        };

        let key = EncodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let auth_token = encode(&Header::default(), &claims, &key)?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &key)?;

        tracing::debug!(user_id = %user_id, office_level = %office_level, "Session credential issued");

        Ok(SessionCredential {
            auth_token,
            refresh_token,
            csrf_secret,
            expires_in: self.access_minutes * 60,
        })
    }

    /// Access Token 디코딩 및 검증.
    pub fn decode_access(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(map_decode_error)
    }

    /// Refresh Token 디코딩 및 검증.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(map_decode_error)
    }

    /// Access Token에서 사용자 ID 추출.
    pub fn user_id_from_token(&self, token: &str) -> Result<Uuid, TokenError> {
        let claims = self.decode_access(token)?;
        Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Invalid)
    }
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> TokenError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidToken => TokenError::Invalid,
        _ => TokenError::Decoding,
    }
}
