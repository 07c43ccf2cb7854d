//! 도메인 타입.
//!
//! 사용자 직급 등 시스템 전반에서 사용되는 도메인 정의.

use serde::{Deserialize, Serialize};

/// 사용자 직급.
///
/// 닫힌 집합입니다. 저장소에는 소문자 문자열로 기록되며,
/// 알 수 없는 값은 파싱 단계에서 거부됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfficeLevel {
    /// 소유자 - 주차장 소속 없이 생성 가능
    Dono,
    /// 직원 - 생성 시 반드시 하나의 주차장에 소속
    Funcionario,
}

impl OfficeLevel {
    /// 소유자 여부.
    ///
    /// 소유자는 테넌트(주차장) 소속 없이 존재할 수 있습니다.
    pub fn is_owner(&self) -> bool {
        matches!(self, OfficeLevel::Dono)
    }

    /// 저장소 표현 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            OfficeLevel::Dono => "dono",
            OfficeLevel::Funcionario => "funcionario",
        }
    }

    /// 문자열에서 직급 파싱.
    ///
    /// 닫힌 집합 밖의 값은 `None`을 반환합니다.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dono" => Some(OfficeLevel::Dono),
            "funcionario" => Some(OfficeLevel::Funcionario),
            _ => None,
        }
    }
}

impl std::fmt::Display for OfficeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_office_level_parse() {
        assert_eq!(OfficeLevel::parse("dono"), Some(OfficeLevel::Dono));
        assert_eq!(OfficeLevel::parse("DONO"), Some(OfficeLevel::Dono));
        assert_eq!(
            OfficeLevel::parse("funcionario"),
            Some(OfficeLevel::Funcionario)
        );
        assert_eq!(OfficeLevel::parse("gerente"), None);
        assert_eq!(OfficeLevel::parse(""), None);
    }

    #[test]
    fn test_office_level_roundtrip() {
        for level in [OfficeLevel::Dono, OfficeLevel::Funcionario] {
            assert_eq!(OfficeLevel::parse(level.as_str()), Some(level));
        }
    }

    #[test]
    fn test_is_owner() {
        assert!(OfficeLevel::Dono.is_owner());
        assert!(!OfficeLevel::Funcionario.is_owner());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&OfficeLevel::Funcionario).unwrap();
        assert_eq!(json, "\"funcionario\"");

        let parsed: OfficeLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, OfficeLevel::Funcionario);
    }
}
