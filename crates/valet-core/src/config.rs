//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 서명 키와 저장소 연결은 전역 상태가 아니라 여기서 로드되어
//! 각 컴포넌트 생성 시점에 명시적으로 주입됩니다.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 데이터베이스 설정.
///
/// 연결 URL은 `DATABASE_URL` 환경 변수로 별도 전달됩니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
    /// 유휴 타임아웃 (초)
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            connection_timeout_secs: 30,
            idle_timeout_secs: 300,
        }
    }
}

/// 인증 설정.
///
/// 서명 비밀 키는 배포 환경별 설정이며 기본값이 없습니다.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// JWT 서명 비밀 키 (프로세스 전역, 초기화 후 읽기 전용)
    pub jwt_secret: SecretString,
    /// Access Token 만료 시간 (분)
    #[serde(default = "default_access_minutes")]
    pub access_token_minutes: i64,
    /// Refresh Token 만료 시간 (일)
    #[serde(default = "default_refresh_days")]
    pub refresh_token_days: i64,
    /// 비밀번호 해싱 파라미터
    #[serde(default)]
    pub hasher: HasherConfig,
}

fn default_access_minutes() -> i64 {
    15
}
fn default_refresh_days() -> i64 {
    3
}

/// Argon2id 해싱 파라미터.
///
/// 기본값은 운영 권장값입니다. 테스트에서는 더 가벼운 값을
/// 주입할 수 있습니다.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct HasherConfig {
    /// 메모리 사용량 (KiB)
    pub memory_kib: u32,
    /// 반복 횟수
    pub iterations: u32,
    /// 병렬 차수
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// `VALET__AUTH__JWT_SECRET` 같은 환경 변수가 파일 값을
    /// 오버라이드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("VALET")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    ///
    /// `.env` 파일이 있으면 먼저 읽어들입니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        Self::load("config/default.toml")
    }
}
