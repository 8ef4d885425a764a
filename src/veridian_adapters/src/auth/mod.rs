pub mod password;
pub mod session_cookie;
pub mod totp;

pub use password::{compute_password_hash, verify_password_hash};
pub use session_cookie::{create_removal_cookie, create_session_cookie, extract_session_token};
pub use totp::TotpEngine;
