//! 비밀번호 해싱 및 검증.
//!
//! Argon2id (메모리 하드 KDF) 기반. 해시는 평문으로 저장·비교되지
//! 않으며, 검증 비교는 상수 시간으로 수행됩니다.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::Engine;
use valet_core::HasherConfig;

/// 유도 키 길이 (바이트).
pub const KEY_SIZE: usize = 32;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// 해싱 파라미터가 유효하지 않음
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
    /// 키 유도 실패
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    /// 유도 키 인코딩 실패
    #[error("Failed to encode derived key")]
    Encoding,
}

/// 비밀번호 해셔.
///
/// 파라미터는 설정에서 주입됩니다. 기본값은 운영 권장값
/// (3회 반복, 64 MiB, 병렬 4)이며 테스트에서는 더 가벼운
/// 값을 사용할 수 있습니다.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// 주어진 파라미터로 해셔를 생성합니다.
    pub fn new(config: HasherConfig) -> Result<Self, PasswordError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            Some(KEY_SIZE),
        )
        .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// 비밀번호 해싱.
    ///
    /// 동일한 (비밀번호, 솔트) 쌍에 대해 결정적입니다. 유도 키는
    /// 패딩 없는 표준 Base64 문자열로 반환됩니다.
    ///
    /// 빈 자격증명이나 해싱되지 않은 값을 반환하는 경우는 없습니다.
    pub fn hash(&self, password: &str, salt: &[u8]) -> Result<String, PasswordError> {
        let mut key = [0u8; KEY_SIZE];
        self.argon2
            .hash_password_into(password.as_bytes(), salt, &mut key)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;

        let encoded = base64::engine::general_purpose::STANDARD_NO_PAD.encode(key);
        if encoded.is_empty() {
            return Err(PasswordError::Encoding);
        }

        Ok(encoded)
    }

    /// 비밀번호 검증.
    ///
    /// 해시를 재계산하여 저장된 해시와 상수 시간으로 비교합니다.
    /// 내부 해싱 실패는 전파하지 않고 `false`를 반환합니다.
    /// 검증 실패가 크래시와 구별되어 타이밍을 누설하면 안 되기
    /// 때문입니다.
    pub fn verify(&self, password: &str, stored_hash: &str, salt: &[u8]) -> bool {
        match self.hash(password, salt) {
            Ok(computed) => constant_time_eq(computed.as_bytes(), stored_hash.as_bytes()),
            Err(e) => {
                tracing::debug!(error = %e, "Password verification failed before comparison");
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        // 기본 파라미터는 Params 제약을 항상 만족함
        Self::new(HasherConfig::default()).expect("default hasher parameters are valid")
    }
}

/// 타이밍 공격 방지를 위한 상수 시간 바이트 비교.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
