use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};

use super::envelope::{EnvelopeHeader, KdfParams, CURRENT_VERSION, HEADER_LEN};
use crate::errors::CoreError;
use crate::models::user::Session;

/// Seal a session with a passphrase using the default KDF cost.
///
/// Flow: Session → bincode → AES-256-GCM(Argon2id(passphrase, salt)) with
/// the envelope header as associated data → RFSS bytes.
pub fn seal_session(session: &Session, passphrase: &str) -> Result<Vec<u8>, CoreError> {
    seal_session_with(session, passphrase, KdfParams::default())
}

/// Seal with explicit KDF parameters.
pub fn seal_session_with(
    session: &Session,
    passphrase: &str,
    kdf: KdfParams,
) -> Result<Vec<u8>, CoreError> {
    require_passphrase(passphrase)?;
    kdf.check_bounds()?;

    let plaintext = bincode::serialize(session)
        .map_err(|e| CoreError::Serialization(format!("Failed to encode session: {e}")))?;

    let salt: [u8; 16] = random_bytes()?;
    let nonce: [u8; 12] = random_bytes()?;
    let key = derive_key(passphrase, &salt, &kdf)?;

    // AES-GCM appends a 16-byte tag.
    let payload_len = u32::try_from(plaintext.len() + 16)
        .map_err(|_| CoreError::Serialization("session too large to seal".into()))?;
    let header = EnvelopeHeader {
        version: CURRENT_VERSION,
        kdf,
        salt,
        nonce,
        payload_len,
    };
    let header_bytes = header.to_bytes();

    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CoreError::Encryption(format!("Failed to create cipher: {e}")))?;
    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: &plaintext,
                aad: &header_bytes,
            },
        )
        .map_err(|e| CoreError::Encryption(format!("Encryption failed: {e}")))?;

    let mut out = Vec::with_capacity(HEADER_LEN + ciphertext.len());
    out.extend_from_slice(&header_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Open a sealed session. A wrong passphrase or any tampering yields
/// `CoreError::Decryption`.
pub fn open_session(data: &[u8], passphrase: &str) -> Result<Session, CoreError> {
    require_passphrase(passphrase)?;
    let (header, header_bytes, ciphertext) = EnvelopeHeader::parse(data)?;
    let key = derive_key(passphrase, &header.salt, &header.kdf)?;

    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CoreError::Encryption(format!("Failed to create cipher: {e}")))?;
    let plaintext = cipher.decrypt(
        Nonce::from_slice(&header.nonce),
        Payload {
            msg: ciphertext,
            aad: header_bytes,
        },
    )?;

    bincode::deserialize(&plaintext)
        .map_err(|e| CoreError::Deserialization(format!("Failed to decode session: {e}")))
}

fn require_passphrase(passphrase: &str) -> Result<(), CoreError> {
    if passphrase.is_empty() {
        return Err(CoreError::Validation(
            "passphrase: A passphrase is required to protect the session.".into(),
        ));
    }
    Ok(())
}

fn derive_key(passphrase: &str, salt: &[u8; 16], kdf: &KdfParams) -> Result<[u8; 32], CoreError> {
    let params = Params::new(kdf.memory_kib, kdf.iterations, kdf.lanes, Some(32))
        .map_err(|e| CoreError::Encryption(format!("Invalid Argon2 params: {e}")))?;
    let mut key = [0u8; 32];
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| CoreError::Encryption(format!("Key derivation failed: {e}")))?;
    Ok(key)
}

fn random_bytes<const N: usize>() -> Result<[u8; N], CoreError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)
        .map_err(|e| CoreError::Encryption(format!("Failed to gather randomness: {e}")))?;
    Ok(buf)
}
