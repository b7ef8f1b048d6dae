//! Challenge message construction.
//!
//! The client signs the exact UTF-8 bytes of this message. Issuance and
//! verification both go through [`challenge_message`] so the displayed
//! text and the verified text can never drift apart.

/// Fixed prefix of every challenge message.
const TEMPLATE_PREFIX: &str = "Sign this message to authenticate with our app. Nonce: ";

/// Build the challenge message for a nonce. Pure and deterministic.
pub fn challenge_message(nonce: &str) -> String {
    // ---
    format!("{TEMPLATE_PREFIX}{nonce}")
}
