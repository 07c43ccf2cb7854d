//! 인증 서브시스템의 에러 타입.
//!
//! 내부적으로는 원인별로 구분해 로깅하고, 외부로는 계정 존재 여부를
//! 누설하지 않는 균일한 형태만 노출합니다.

use thiserror::Error;

use crate::password::PasswordError;
use crate::salt::EntropyError;
use crate::token::TokenError;

/// 인증 작업 에러.
#[derive(Debug, Error)]
pub enum AuthError {
    /// 엔트로피 소스 실패
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// 비밀번호 해싱 실패
    #[error(transparent)]
    Hash(#[from] PasswordError),

    /// 토큰 서명/검증 실패
    #[error(transparent)]
    Signing(#[from] TokenError),

    /// 입력 값 제약 위반
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 이메일 유일성 제약 위반
    #[error("Email already registered")]
    DuplicateEmail,

    /// 이메일에 해당하는 인증 레코드 없음 (내부 구분용)
    #[error("No auth record for email")]
    NotFound,

    /// 레코드는 있으나 비밀번호 불일치 (내부 구분용)
    #[error("Password verification failed")]
    InvalidCredentials,

    /// 저장소 작업 실패
    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// 인증 작업을 위한 Result 타입.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// 호출자에게 노출할 메시지.
    ///
    /// `NotFound`와 `InvalidCredentials`는 계정 열거를 막기 위해
    /// 같은 형태로 합쳐집니다. 내부 실패는 상세를 숨깁니다.
    /// 사용자 노출 문구는 프런트엔드 카피(pt-BR)를 따릅니다.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::NotFound | AuthError::InvalidCredentials => "Login inválido".to_string(),
            AuthError::DuplicateEmail => "Este email não está disponível".to_string(),
            AuthError::Validation(msg) => msg.clone(),
            AuthError::Entropy(_)
            | AuthError::Hash(_)
            | AuthError::Signing(_)
            | AuthError::Persistence(_) => "internal server error".to_string(),
        }
    }

    /// 호출자 재량으로 재시도 가능한 에러인지 확인합니다.
    ///
    /// 내부에서는 재시도하지 않습니다. 비일시적 단계가 실행된 뒤의
    /// 맹목적 재시도는 멱등하지 않기 때문입니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Persistence(_))
    }

    /// 상세 로깅 후 불투명하게 노출해야 하는 내부 실패인지 확인합니다.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::Entropy(_)
                | AuthError::Hash(_)
                | AuthError::Signing(_)
                | AuthError::Persistence(_)
        )
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_login_failure_shape() {
        // 계정 열거 방지: 두 실패는 외부에서 구별 불가
        assert_eq!(
            AuthError::NotFound.public_message(),
            AuthError::InvalidCredentials.public_message()
        );
    }

    #[test]
    fn test_duplicate_email_reveals_only_unavailability() {
        let msg = AuthError::DuplicateEmail.public_message();
        assert!(!msg.contains('@'));
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let err = AuthError::Signing(TokenError::Decoding);
        assert!(err.is_internal());
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn test_only_persistence_is_retryable() {
        assert!(AuthError::Persistence(sqlx::Error::PoolClosed).is_retryable());
        assert!(!AuthError::DuplicateEmail.is_retryable());
        assert!(!AuthError::InvalidCredentials.is_retryable());
    }
}
