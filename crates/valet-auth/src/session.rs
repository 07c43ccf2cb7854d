//! 세션 무효화 (논리적 로그아웃).
//!
//! 토큰은 자기검증형이므로 서버 측 폐기 목록이 없습니다.
//! 무효화는 전송 계층이 쿠키에 담긴 토큰 재료를 지우도록
//! 지시하는 것으로 끝나며, 이미 발급된 미만료 토큰 자체를
//! 철회하지는 않습니다 (자연 만료까지 유효).

use serde::Serialize;

/// Access Token 쿠키 이름.
pub const AUTH_COOKIE: &str = "AuthToken";

/// Refresh Token 쿠키 이름.
pub const REFRESH_COOKIE: &str = "RefreshToken";

/// CSRF 비밀값 쿠키 이름.
pub const CSRF_COOKIE: &str = "CsrfSecret";

/// 쿠키 제거 지시.
///
/// 전송 계층이 그대로 Set-Cookie로 변환합니다: 빈 값과
/// epoch 만료 시각으로 덮어써 클라이언트 보관 토큰을 지웁니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieClear {
    /// 쿠키 이름
    pub name: &'static str,
    /// 대체 값 (항상 빈 문자열)
    pub value: &'static str,
    /// 만료 시각 (Unix timestamp, 항상 0)
    pub expires_unix: i64,
}

impl CookieClear {
    fn for_cookie(name: &'static str) -> Self {
        Self {
            name,
            value: "",
            expires_unix: 0,
        }
    }
}

/// 세션 무효화.
///
/// 항상 성공하며, 세션 재료가 없던 경우에도 같은 지시를
/// 돌려주는 no-op입니다.
pub fn clear_session() -> [CookieClear; 3] {
    [
        CookieClear::for_cookie(AUTH_COOKIE),
        CookieClear::for_cookie(REFRESH_COOKIE),
        CookieClear::for_cookie(CSRF_COOKIE),
    ]
}
