//! Random secrets embedded in a freshly generated `garage.toml`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;

/// Entropy behind every generated secret.
pub const SECRET_BYTES: usize = 32;

fn random_bytes() -> [u8; SECRET_BYTES] {
    let mut bytes = [0u8; SECRET_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Shared RPC secret, hex encoded (64 chars).
pub fn rpc_secret() -> String {
    hex::encode(random_bytes())
}

/// Bearer token for the admin or metrics endpoint, base64 encoded (44 chars).
pub fn api_token() -> String {
    STANDARD.encode(random_bytes())
}
