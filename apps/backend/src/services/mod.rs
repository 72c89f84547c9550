pub mod identities;

pub use identities::{IdentityProvider, InMemoryIdentities};
