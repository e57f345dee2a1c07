mod credential;
mod nonce;
mod signer;

pub use credential::{
    AUTH_SCHEME, AuthorizationCredential, CREDENTIAL_VERSION, ChallengeAnswer,
    CredentialParseError, PUBKEY_TYPE,
};
pub use nonce::{CLIENT_NONCE_LEN, ClientNonce, ServerNonce, signing_payload};
pub use signer::{HashAlgorithm, KeyError, PrivateKey, PublicKey, UnsupportedAlgorithm};
