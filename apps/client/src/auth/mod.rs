// Session state owned by the client side: the stored bearer token, its
// decoded claims and the navigation hooks used when a session expires.

pub mod navigation;
pub mod store;
pub mod token;

pub use navigation::{is_auth_route, Navigator, SessionNavigator, LOGIN_ROUTE};
pub use store::{CredentialProvider, FileTokenStore, MemoryTokenStore};
pub use token::{BearerToken, Subject, TokenClaims};
