//! # Valet Core
//!
//! 주차장 운영 백엔드의 핵심 도메인 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 요소를 제공합니다:
//! - 직급(역할) 정의
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use logging::*;
