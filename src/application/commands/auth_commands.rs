//! Auth Commands

/// OAuth 授权码登录
#[derive(Debug, Clone)]
pub struct Login {
    /// kakao / naver / google
    pub provider: String,
    pub code: String,
}

/// 用 Kakao SDK 的访问令牌换取服务令牌
#[derive(Debug, Clone)]
pub struct ExchangeKakaoToken {
    pub kakao_access_token: String,
}

/// 退出登录
#[derive(Debug, Clone)]
pub struct Logout;
