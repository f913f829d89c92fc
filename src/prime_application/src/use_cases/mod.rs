pub mod authenticate;
pub mod google_sign_in;
pub mod login;
pub mod register;
pub mod resolve_oauth;
pub mod session;
