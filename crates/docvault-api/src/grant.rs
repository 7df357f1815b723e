//! Access grants for shared documents.
//!
//! A grant is the capability a client receives after presenting the correct
//! access password: an HMAC-SHA256 signature over the document id and an
//! expiry, keyed by a server-held secret. A grant is only valid for the
//! document it was issued for and only until its expiry; a client cannot
//! forge one without the signing key.
//!
//! Token wire format: `v1.{expires_unix}.{hex signature}`.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_VERSION: &str = "v1";

/// Why a presented grant was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantError {
    /// Not the `v1.{exp}.{sig}` shape.
    Malformed,
    /// Expiry has passed.
    Expired,
    /// Signature does not match this document and expiry.
    InvalidSignature,
}

impl GrantError {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantError::Malformed => "malformed grant",
            GrantError::Expired => "grant expired",
            GrantError::InvalidSignature => "invalid grant signature",
        }
    }
}

/// A freshly issued grant, returned from `authorize`.
#[derive(Debug, Clone)]
pub struct IssuedGrant {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies document-scoped access grants.
#[derive(Clone)]
pub struct GrantSigner {
    key: Vec<u8>,
    ttl: Duration,
}

impl GrantSigner {
    pub fn new(key: impl Into<Vec<u8>>, ttl_seconds: i64) -> Self {
        Self {
            key: key.into(),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    fn signature(&self, document_id: Uuid, expires_unix: i64) -> Vec<u8> {
        // The key length was validated at startup; HMAC accepts any length.
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(document_id.as_bytes());
        mac.update(b".");
        mac.update(expires_unix.to_string().as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Issue a grant for one document, valid for the configured window.
    pub fn issue(&self, document_id: Uuid) -> IssuedGrant {
        self.issue_at(document_id, Utc::now())
    }

    fn issue_at(&self, document_id: Uuid, now: DateTime<Utc>) -> IssuedGrant {
        let expires_at = now + self.ttl;
        let expires_unix = expires_at.timestamp();
        let sig = self.signature(document_id, expires_unix);

        IssuedGrant {
            token: format!("{}.{}.{}", TOKEN_VERSION, expires_unix, hex::encode(sig)),
            expires_at,
        }
    }

    /// Verify a presented grant against the document being fetched.
    ///
    /// The signature covers the document id, so a grant issued for another
    /// document fails here even when it is otherwise well-formed and fresh.
    pub fn verify(&self, document_id: Uuid, token: &str) -> Result<(), GrantError> {
        self.verify_at(document_id, token, Utc::now())
    }

    fn verify_at(
        &self,
        document_id: Uuid,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), GrantError> {
        let mut parts = token.splitn(3, '.');
        let version = parts.next().ok_or(GrantError::Malformed)?;
        let expires_str = parts.next().ok_or(GrantError::Malformed)?;
        let sig_hex = parts.next().ok_or(GrantError::Malformed)?;

        if version != TOKEN_VERSION {
            return Err(GrantError::Malformed);
        }

        let expires_unix: i64 = expires_str.parse().map_err(|_| GrantError::Malformed)?;
        let sig = hex::decode(sig_hex).map_err(|_| GrantError::Malformed)?;

        // Signature first, constant-time, so expiry probing reveals nothing
        // about grants for other documents.
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(document_id.as_bytes());
        mac.update(b".");
        mac.update(expires_unix.to_string().as_bytes());
        mac.verify_slice(&sig)
            .map_err(|_| GrantError::InvalidSignature)?;

        if now.timestamp() >= expires_unix {
            return Err(GrantError::Expired);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> GrantSigner {
        GrantSigner::new("0123456789abcdef0123456789abcdef".as_bytes().to_vec(), 600)
    }

    #[test]
    fn test_issued_grant_verifies() {
        let signer = signer();
        let id = Uuid::new_v4();

        let grant = signer.issue(id);
        assert!(signer.verify(id, &grant.token).is_ok());
    }

    #[test]
    fn test_grant_is_document_scoped() {
        let signer = signer();
        let document_a = Uuid::new_v4();
        let document_b = Uuid::new_v4();

        let grant = signer.issue(document_a);
        assert_eq!(
            signer.verify(document_b, &grant.token),
            Err(GrantError::InvalidSignature)
        );
    }

    #[test]
    fn test_expired_grant_rejected() {
        let signer = signer();
        let id = Uuid::new_v4();

        let issued_long_ago = Utc::now() - Duration::seconds(3600);
        let grant = signer.issue_at(id, issued_long_ago);
        assert_eq!(signer.verify(id, &grant.token), Err(GrantError::Expired));
    }

    #[test]
    fn test_tampered_expiry_rejected() {
        let signer = signer();
        let id = Uuid::new_v4();

        let grant = signer.issue(id);
        let mut parts: Vec<&str> = grant.token.split('.').collect();
        let extended = (Utc::now() + Duration::days(365)).timestamp().to_string();
        parts[1] = &extended;
        let forged = parts.join(".");

        assert_eq!(
            signer.verify(id, &forged),
            Err(GrantError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_tokens_rejected() {
        let signer = signer();
        let id = Uuid::new_v4();

        assert_eq!(signer.verify(id, ""), Err(GrantError::Malformed));
        assert_eq!(signer.verify(id, "granted"), Err(GrantError::Malformed));
        assert_eq!(signer.verify(id, "v1.notanumber.ff"), Err(GrantError::Malformed));
        assert_eq!(
            signer.verify(id, "v2.9999999999.ff"),
            Err(GrantError::Malformed)
        );
        assert_eq!(
            signer.verify(id, "v1.9999999999.zz"),
            Err(GrantError::Malformed)
        );
    }

    #[test]
    fn test_different_keys_do_not_cross_verify() {
        let a = GrantSigner::new(b"a-key-that-is-32-bytes-long!!!!!".to_vec(), 600);
        let b = GrantSigner::new(b"b-key-that-is-32-bytes-long!!!!!".to_vec(), 600);
        let id = Uuid::new_v4();

        let grant = a.issue(id);
        assert_eq!(
            b.verify(id, &grant.token),
            Err(GrantError::InvalidSignature)
        );
    }

    #[test]
    fn test_expires_at_matches_token() {
        let signer = signer();
        let id = Uuid::new_v4();

        let grant = signer.issue(id);
        let expires_field: i64 = grant.token.split('.').nth(1).unwrap().parse().unwrap();
        assert_eq!(expires_field, grant.expires_at.timestamp());
    }
}
