use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::Role;

/// JWT payload. The server keeps no token state; validity is signature plus
/// expiry only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub email: String,
    pub role: Role,
    pub iat: usize,  // issued at
    pub exp: usize,  // expiration time
}
