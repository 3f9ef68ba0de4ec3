mod claims;
pub mod extractors;
pub mod jwt;

pub use claims::{Claims, Identity};
pub use extractors::MaybeAuthUser;
pub use jwt::JwtKeys;
