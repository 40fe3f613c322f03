pub mod base64url;
pub mod error;
pub mod fernet;
pub mod primitive;
pub mod random;
pub mod secretbox;
pub mod types;

pub use base64url::{base64url_decode, base64url_encode};
pub use error::CryptoError;
pub use fernet::FernetKey;
pub use primitive::{KeyMaterial, KeyPrimitive};
pub use random::{random_bytes, OsRandom, RandomSource};
pub use secretbox::SecretboxKey;
pub use types::{
    Layout, AES_BLOCK_SIZE, FERNET_HMAC_LENGTH, FERNET_KEY_LENGTH, FERNET_VERSION,
    SECRETBOX_AUTH_LENGTH, SECRETBOX_KEY_LENGTH, SECRETBOX_MAC_LENGTH, SECRETBOX_NONCE_LENGTH,
};
