mod helpers;

mod account;
mod login;
mod logout;
mod otp;
mod password;
mod signup;
mod two_factor;
mod verify_email;
