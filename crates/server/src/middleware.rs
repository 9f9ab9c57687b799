use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{info, warn};
use utils::AppError;

/// 每客户端IP每分钟的端点配额
const USE_REFERRAL_PER_MINUTE: u32 = 3;
const USE_FAUCET_PER_MINUTE: u32 = 5;

/// 按端点配置的IP限流器。只有计分入口限流，读接口不限。
pub struct EndpointRateLimits {
    use_referral: DefaultKeyedRateLimiter<IpAddr>,
    use_faucet: DefaultKeyedRateLimiter<IpAddr>,
}

impl Default for EndpointRateLimits {
    fn default() -> Self {
        Self {
            use_referral: RateLimiter::keyed(Quota::per_minute(
                NonZeroU32::new(USE_REFERRAL_PER_MINUTE).expect("quota is nonzero"),
            )),
            use_faucet: RateLimiter::keyed(Quota::per_minute(
                NonZeroU32::new(USE_FAUCET_PER_MINUTE).expect("quota is nonzero"),
            )),
        }
    }
}

impl EndpointRateLimits {
    fn limiter_for(&self, path: &str) -> Option<&DefaultKeyedRateLimiter<IpAddr>> {
        match path {
            "/api/use-referral" => Some(&self.use_referral),
            "/api/use-faucet" => Some(&self.use_faucet),
            _ => None,
        }
    }
}

/// IP限流中间件，超限直接返回429
pub async fn ip_rate_limit(
    State(limits): State<Arc<EndpointRateLimits>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if let Some(limiter) = limits.limiter_for(path) {
        if limiter.check_key(&addr.ip()).is_err() {
            warn!("⛔ rate limited - IP: {} | {}", addr.ip(), path);
            return AppError::RateLimited.into_response();
        }
    }

    next.run(request).await
}

/// IP记录中间件，记录每个请求的来源与路径
pub async fn simple_ip_logger(ConnectInfo(addr): ConnectInfo<SocketAddr>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = addr.ip();

    info!("📍 API请求 - IP: {} | {} {}", client_ip, method, path);

    next.run(request).await
}
