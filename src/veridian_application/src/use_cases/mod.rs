pub mod change_email;
pub mod change_password;
pub mod delete_account;
pub mod disable_2fa;
pub mod enable_2fa;
pub mod login;
pub mod logout;
pub mod request_otp;
pub mod reset_password;
pub mod signup;
pub mod validate_session;
pub mod verify_email;
pub mod verify_otp;
pub mod verify_totp;
