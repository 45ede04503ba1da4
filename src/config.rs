//! Runtime configuration, read from the environment (a `.env` file is loaded
//! first when present).

use std::path::PathBuf;

use crate::stores::PaymentPolicy;
use crate::Error;

pub const DB_PATH_VAR: &str = "FEE_KEEPER_DB_PATH";
pub const PAYMENT_POLICY_VAR: &str = "FEE_KEEPER_PAYMENT_POLICY";
pub const DEFAULT_DB_PATH: &str = "student_database.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub payment_policy: PaymentPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            payment_policy: PaymentPolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Unset or blank
    /// variables fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let db_path = value(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);
        let payment_policy = match value(PAYMENT_POLICY_VAR) {
            Some(raw) => raw.parse()?,
            None => defaults.payment_policy,
        };

        Ok(Self {
            db_path,
            payment_policy,
        })
    }
}
