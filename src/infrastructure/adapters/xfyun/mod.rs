//! 讯飞 (xfyun) 流式语音接口适配器

mod connection;
mod frames;
mod iat_client;
mod signer;
mod tts_client;

#[cfg(test)]
mod mock;

pub use connection::{install_crypto_provider, XfyunCredentials, XfyunEndpoint};
pub use iat_client::{XfyunIatClient, XfyunIatClientConfig};
pub use signer::{rfc1123_date, SignedCredential, XfyunSigner};
pub use tts_client::{XfyunTtsClient, XfyunTtsClientConfig};
