//! 솔트 및 CSRF 비밀값 생성.
//!
//! 암호학적으로 안전한 난수 소스(OS 엔트로피)만 사용합니다.

use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// 자격증명당 솔트 길이 (바이트). 저장 시 hex로 인코딩됩니다.
pub const SALT_SIZE: usize = 16;

/// CSRF 비밀값 길이 (바이트).
pub const CSRF_SECRET_SIZE: usize = 32;

/// 엔트로피 소스 에러.
///
/// OS 난수 소스가 요청한 바이트를 공급하지 못한 경우입니다.
#[derive(Debug, thiserror::Error)]
#[error("Entropy source failed: {0}")]
pub struct EntropyError(#[from] rand::Error);

/// 랜덤 솔트 생성.
///
/// # Arguments
///
/// * `size` - 생성할 바이트 수 (비밀번호 솔트는 [`SALT_SIZE`])
pub fn generate_salt(size: usize) -> Result<Vec<u8>, EntropyError> {
    let mut salt = vec![0u8; size];
    OsRng.try_fill_bytes(&mut salt)?;
    Ok(salt)
}

/// 세션별 CSRF 비밀값 생성.
///
/// 고정 플레이스홀더가 아니라 세션마다 새로 생성되는 랜덤 값이며,
/// URL-safe Base64 문자열로 반환됩니다.
pub fn generate_csrf_secret() -> Result<String, EntropyError> {
    let bytes = generate_salt(CSRF_SECRET_SIZE)?;
    Ok(base64::engine::general_purpose::URL_SAFE.encode(bytes))
}
