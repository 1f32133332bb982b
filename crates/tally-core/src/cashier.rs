//! # Cashier
//!
//! Identity of the person operating a register.
//!
//! The password is never stored; only its MD5 digest, written as the
//! digest's unsigned value in lowercase hex with no leading zeros (so it can
//! be shorter than 32 characters). MD5 and this exact format are kept for
//! compatibility with existing credential records.

use md5::{Digest, Md5};
use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::validation::{validate_cashier_name, validate_password};

/// A cashier. Equality compares id, name and password hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Cashier {
    id: Uuid,
    name: String,
    #[serde(skip_serializing)]
    password_hash: String,
}

impl Cashier {
    /// Creates a cashier with a fresh UUID v4.
    ///
    /// ```rust
    /// use tally_core::Cashier;
    ///
    /// let ann = Cashier::new("Ann", "secret").unwrap();
    /// assert!(ann.verify_password("secret"));
    /// assert!(!ann.verify_password("Secret"));
    /// ```
    pub fn new(name: impl Into<String>, password: &str) -> CoreResult<Self> {
        let name = name.into();
        validate_cashier_name(&name)?;
        validate_password(password)?;

        Ok(Cashier {
            id: Uuid::new_v4(),
            name,
            password_hash: hash_password(password),
        })
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn verify_password(&self, password: &str) -> bool {
        hash_password(password) == self.password_hash
    }
}

fn hash_password(password: &str) -> String {
    let hex = format!("{:x}", Md5::digest(password.as_bytes()));
    match hex.trim_start_matches('0') {
        "" => "0".to_string(),
        digits => digits.to_string(),
    }
}
