pub mod google_id_token_verifier;
pub mod unverified_claims_decoder;

pub use google_id_token_verifier::GoogleIdTokenVerifier;
pub use unverified_claims_decoder::UnverifiedClaimsDecoder;
