//! 讯飞 WebSocket 鉴权签名
//!
//! ```text
//! signature_origin = "host: {host}\ndate: {date}\nGET {path} HTTP/1.1"
//! signature        = base64(hmac_sha256(api_secret, signature_origin))
//! authorization    = base64("api_key=\"..\", algorithm=\"hmac-sha256\",
//!                           headers=\"host date request-line\", signature=\"..\"")
//! ```
//!
//! 签名内嵌时间戳，每次建立连接都必须重新生成。

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use crate::domain::speech::SpeechError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "hmac-sha256";
const SIGNED_HEADERS: &str = "host date request-line";

/// RFC 1123 格式，例如 `Tue, 01 Oct 2024 08:00:00 GMT`
pub fn rfc1123_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// 一次连接使用的鉴权参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedCredential {
    pub authorization: String,
    pub date: String,
    pub host: String,
}

impl SignedCredential {
    /// 拼接带鉴权参数的连接地址
    pub fn endpoint_url(&self, secure: bool, path: &str) -> Result<Url, SpeechError> {
        let scheme = if secure { "wss" } else { "ws" };
        let base = format!("{}://{}{}", scheme, self.host, path);
        Url::parse_with_params(
            &base,
            [
                ("authorization", self.authorization.as_str()),
                ("date", self.date.as_str()),
                ("host", self.host.as_str()),
            ],
        )
        .map_err(|e| SpeechError::Transport(format!("Invalid endpoint {}: {}", base, e)))
    }
}

/// 签名器，持有 APIKey / APISecret
#[derive(Clone)]
pub struct XfyunSigner {
    api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for XfyunSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XfyunSigner")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

impl XfyunSigner {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// 以当前时间签名
    pub fn sign_now(&self, host: &str, path: &str) -> Result<SignedCredential, SpeechError> {
        self.sign(host, path, &rfc1123_date(Utc::now()))
    }

    /// 以指定时间签名，相同输入得到相同结果
    pub fn sign(
        &self,
        host: &str,
        path: &str,
        date: &str,
    ) -> Result<SignedCredential, SpeechError> {
        let origin = format!("host: {}\ndate: {}\nGET {} HTTP/1.1", host, date, path);

        let Ok(mut mac) = HmacSha256::new_from_slice(self.api_secret.as_bytes()) else {
            return Err(SpeechError::Transport("Failed to create HMAC".to_string()));
        };
        mac.update(origin.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        let authorization_origin = format!(
            "api_key=\"{}\", algorithm=\"{}\", headers=\"{}\", signature=\"{}\"",
            self.api_key, ALGORITHM, SIGNED_HEADERS, signature
        );

        Ok(SignedCredential {
            authorization: STANDARD.encode(authorization_origin),
            date: date.to_string(),
            host: host.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const DATE: &str = "Tue, 01 Oct 2024 08:00:00 GMT";

    fn decode(authorization: &str) -> String {
        String::from_utf8(STANDARD.decode(authorization).unwrap()).unwrap()
    }

    #[test]
    fn test_rfc1123_date() {
        let at = Utc.with_ymd_and_hms(2024, 10, 1, 8, 0, 0).unwrap();
        assert_eq!(rfc1123_date(at), DATE);
    }

    #[test]
    fn test_signature_matches_reference_digest() {
        let signer = XfyunSigner::new("key-1", "secret-1");
        let credential = signer.sign("iat-api.xfyun.cn", "/v2/iat", DATE).unwrap();

        let mut mac = HmacSha256::new_from_slice(b"secret-1").unwrap();
        mac.update(b"host: iat-api.xfyun.cn\ndate: Tue, 01 Oct 2024 08:00:00 GMT\nGET /v2/iat HTTP/1.1");
        let expected = STANDARD.encode(mac.finalize().into_bytes());

        assert_eq!(
            decode(&credential.authorization),
            format!(
                "api_key=\"key-1\", algorithm=\"hmac-sha256\", headers=\"host date request-line\", signature=\"{}\"",
                expected
            )
        );
        assert_eq!(credential.date, DATE);
        assert_eq!(credential.host, "iat-api.xfyun.cn");
    }

    #[test]
    fn test_signing_is_deterministic() {
        let signer = XfyunSigner::new("key", "secret");
        let a = signer.sign("iat-api.xfyun.cn", "/v2/iat", DATE).unwrap();
        let b = signer.sign("iat-api.xfyun.cn", "/v2/iat", DATE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_any_input_changes_the_token() {
        let base = XfyunSigner::new("key", "secret").sign("iat-api.xfyun.cn", "/v2/iat", DATE).unwrap();

        let variants = [
            XfyunSigner::new("key", "other").sign("iat-api.xfyun.cn", "/v2/iat", DATE).unwrap(),
            XfyunSigner::new("other", "secret").sign("iat-api.xfyun.cn", "/v2/iat", DATE).unwrap(),
            XfyunSigner::new("key", "secret").sign("tts-api.xfyun.cn", "/v2/iat", DATE).unwrap(),
            XfyunSigner::new("key", "secret").sign("iat-api.xfyun.cn", "/v2/tts", DATE).unwrap(),
            XfyunSigner::new("key", "secret").sign(
                "iat-api.xfyun.cn",
                "/v2/iat",
                "Tue, 01 Oct 2024 08:00:01 GMT",
            ).unwrap(),
        ];

        for variant in variants {
            assert_ne!(variant.authorization, base.authorization);
        }
    }

    #[test]
    fn test_endpoint_url_carries_query() {
        let credential = XfyunSigner::new("key", "secret").sign("iat-api.xfyun.cn", "/v2/iat", DATE).unwrap();
        let url = credential.endpoint_url(true, "/v2/iat").unwrap();

        assert_eq!(url.scheme(), "wss");
        assert_eq!(url.host_str(), Some("iat-api.xfyun.cn"));
        assert_eq!(url.path(), "/v2/iat");

        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            query,
            vec![
                ("authorization".to_string(), credential.authorization.clone()),
                ("date".to_string(), DATE.to_string()),
                ("host".to_string(), "iat-api.xfyun.cn".to_string()),
            ]
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let signer = XfyunSigner::new("key", "very-secret");
        assert!(!format!("{:?}", signer).contains("very-secret"));
    }
}
