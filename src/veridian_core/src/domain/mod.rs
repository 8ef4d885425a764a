pub mod email;
pub mod otp_code;
pub mod password;
pub mod session;
pub mod user;
pub mod verification;
