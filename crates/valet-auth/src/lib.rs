//! # Valet Auth
//!
//! 자격증명 및 세션 발급 서브시스템.
//!
//! 멀티테넌트 주차장 애플리케이션의 최종 사용자(운영자와 직원)를
//! 인증하고 세션 자격증명을 발급합니다.
//!
//! # 모듈 구성
//!
//! - [`salt`]: 솔트 / CSRF 비밀값 생성
//! - [`password`]: Argon2id 비밀번호 해싱 및 상수 시간 검증
//! - [`store`]: 트랜잭션 저장소 어댑터 (sqlx/Postgres)
//! - [`service`]: 원자적 사용자 프로비저닝과 로그인 검증
//! - [`token`]: Access/Refresh 토큰 + CSRF 비밀값 발급
//! - [`session`]: 세션 무효화 (클라이언트 측 쿠키 제거 지시)
//! - [`error`]: 에러 분류 및 외부 노출 형태

pub mod error;
pub mod password;
pub mod salt;
pub mod service;
pub mod session;
pub mod store;
pub mod token;

pub use error::{AuthError, AuthResult};
pub use password::{PasswordHasher, PasswordError, KEY_SIZE};
pub use salt::{generate_csrf_secret, generate_salt, EntropyError, CSRF_SECRET_SIZE, SALT_SIZE};
pub use service::{AuthenticatedUser, CredentialService, NewAccount, ProvisionedAccount};
pub use session::{clear_session, CookieClear, AUTH_COOKIE, CSRF_COOKIE, REFRESH_COOKIE};
pub use store::{AuthRecord, MembershipRecord, UserRecord, UserRepository};
pub use token::{Claims, RefreshClaims, SessionCredential, TokenError, TokenIssuer};
