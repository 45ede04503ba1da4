//! The ledger ties one [`RecordStore`] to one [`RecordBackend`] and is the
//! single entry point front ends use to change or read records.
//!
//! Every successful mutation is persisted before the call returns. If the
//! backend refuses the write, the in-memory change is undone so the store and
//! the backing storage never disagree.

use rust_decimal::Decimal;
use std::fmt;
use tracing::{debug, info};

use crate::stores::{PaymentPolicy, RecordBackend, RecordStore, StudentRecord};
use crate::Error;

/// A discrete request against the ledger, independent of where it came from
/// (prompt, script line, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add {
        name: String,
        id: String,
        fees: Decimal,
    },
    Pay {
        id: String,
        amount: Decimal,
    },
    Details {
        id: String,
    },
    DueFees {
        id: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Added(StudentRecord),
    Paid(StudentRecord),
    Details(StudentRecord),
    DueFees { name: String, fees_due: Decimal },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Added(record) => write!(f, "Added {} ({}).", record.name, record.id),
            Outcome::Paid(record) => write!(
                f,
                "Payment recorded for {}. Remaining fees: {}",
                record.name, record.fees_due
            ),
            Outcome::Details(record) => write!(
                f,
                "Student ID: {}\nStudent Name: {}\nFees Due: {}",
                record.id, record.name, record.fees_due
            ),
            Outcome::DueFees { name, fees_due } => write!(f, "Fees due for {}: {}", name, fees_due),
        }
    }
}

pub struct Ledger<B> {
    store: RecordStore,
    backend: B,
}

impl<B: RecordBackend> Ledger<B> {
    /// Loads existing records from `backend` and returns the ledger together
    /// with every problem found while loading (skipped lines, duplicate ids,
    /// unreadable storage). None of these prevent the session from starting.
    pub fn open(backend: B, policy: PaymentPolicy) -> (Self, Vec<Error>) {
        let loaded = backend.load();
        let mut warnings = loaded.warnings;

        let mut store = RecordStore::with_policy(policy);
        warnings.extend(store.extend_loaded(loaded.records));
        info!(records = store.len(), %policy, "ledger opened");

        (Self { store, backend }, warnings)
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        id: impl Into<String>,
        fees: Decimal,
    ) -> Result<StudentRecord, Error> {
        let record = self.store.add(name, id, fees)?.clone();
        if let Err(err) = self.backend.append(&record) {
            self.store.discard(&record.id);
            return Err(err);
        }
        Ok(record)
    }

    /// Records a payment. Negative amounts are refused here since the store
    /// would treat them as a fee increase.
    pub fn pay(&mut self, id: &str, amount: Decimal) -> Result<StudentRecord, Error> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(Error::InvalidInput(format!(
                "payment must not be negative, got {}",
                amount
            )));
        }
        let previous = self
            .store
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let updated = self.store.apply_payment(id, amount)?.clone();
        if let Err(err) = self.backend.save_all(self.store.list()) {
            self.store.restore(previous);
            return Err(err);
        }
        Ok(updated)
    }

    pub fn find(&self, id: &str) -> Option<&StudentRecord> {
        self.store.find_by_id(id)
    }

    pub fn records(&self) -> &[StudentRecord] {
        self.store.list()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome, Error> {
        debug!(?command, "dispatching");
        match command {
            Command::Add { name, id, fees } => self.add(name, id, fees).map(Outcome::Added),
            Command::Pay { id, amount } => self.pay(&id, amount).map(Outcome::Paid),
            Command::Details { id } => self
                .find(&id)
                .cloned()
                .map(Outcome::Details)
                .ok_or(Error::NotFound(id)),
            Command::DueFees { id } => self
                .find(&id)
                .map(|record| Outcome::DueFees {
                    name: record.name.clone(),
                    fees_due: record.fees_due,
                })
                .ok_or(Error::NotFound(id)),
        }
    }
}
