pub mod claims;
pub mod cookie;
pub mod jwt;
pub mod password;
pub mod ttl;

pub use claims::CredentialPayload;
pub use jwt::{mint_access_token, verify_access_token, Claims, TokenFault};
pub use ttl::TokenTtl;
