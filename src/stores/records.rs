use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dto::deserialize_decimal;
use crate::Error;

/// A single student and the fees they still owe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    pub id: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub fees_due: Decimal,
}

impl StudentRecord {
    pub fn new(name: impl Into<String>, id: impl Into<String>, fees_due: Decimal) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            fees_due,
        }
    }
}

/// How a payment larger than the outstanding balance is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaymentPolicy {
    /// The balance may go negative; the surplus is kept as credit.
    #[default]
    AllowCredit,
    /// The balance never drops below zero; the surplus is discarded.
    FloorAtZero,
    /// Payments above the balance are refused without mutating the record.
    RejectOverpayment,
}

impl FromStr for PaymentPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "allow-credit" => Ok(PaymentPolicy::AllowCredit),
            "floor-at-zero" => Ok(PaymentPolicy::FloorAtZero),
            "reject-overpayment" => Ok(PaymentPolicy::RejectOverpayment),
            other => Err(Error::InvalidConfig(format!(
                "unknown payment policy {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for PaymentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentPolicy::AllowCredit => "allow-credit",
            PaymentPolicy::FloorAtZero => "floor-at-zero",
            PaymentPolicy::RejectOverpayment => "reject-overpayment",
        };
        f.write_str(name)
    }
}

/// Ordered, in-memory collection of student records keyed by a unique id.
///
/// Lookups are linear scans; the store is expected to hold at most a few
/// hundred entries.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<StudentRecord>,
    policy: PaymentPolicy,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::with_policy(PaymentPolicy::default())
    }

    pub fn with_policy(policy: PaymentPolicy) -> Self {
        Self {
            records: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> PaymentPolicy {
        self.policy
    }

    /// Appends a new record.
    /// Fails with `InvalidInput` for negative fees and with `DuplicateId` if the
    /// id is taken; the store is left untouched in both cases.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        id: impl Into<String>,
        initial_fees: Decimal,
    ) -> Result<&StudentRecord, Error> {
        if initial_fees.is_sign_negative() && !initial_fees.is_zero() {
            return Err(Error::InvalidInput(format!(
                "initial fees must not be negative, got {}",
                initial_fees
            )));
        }
        self.insert(StudentRecord::new(name, id, initial_fees))
    }

    /// Inserts records read back from storage, in order.
    /// Negative balances are accepted here since credit is valid persisted
    /// state. Records whose id is already present are skipped and reported.
    pub fn extend_loaded(&mut self, records: impl IntoIterator<Item = StudentRecord>) -> Vec<Error> {
        records
            .into_iter()
            .filter_map(|record| self.insert(record).err())
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&StudentRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Subtracts `amount` from the balance of `id` according to the store's
    /// payment policy and returns the updated record.
    ///
    /// The sign of `amount` is not checked here: a negative payment raises the
    /// balance. Callers are expected to validate it first.
    pub fn apply_payment(&mut self, id: &str, amount: Decimal) -> Result<&StudentRecord, Error> {
        let policy = self.policy;
        let record = self.get_mut(id)?;
        let remaining = record.fees_due.checked_sub(amount).ok_or_else(|| {
            Error::InvalidInput(format!(
                "payment of {} would put the balance of {:?} out of range",
                amount, record.id
            ))
        })?;
        record.fees_due = match policy {
            PaymentPolicy::AllowCredit => remaining,
            PaymentPolicy::FloorAtZero => remaining.max(Decimal::ZERO),
            PaymentPolicy::RejectOverpayment if amount > record.fees_due => {
                return Err(Error::Overpayment {
                    id: record.id.clone(),
                    fees_due: record.fees_due,
                    amount,
                });
            }
            PaymentPolicy::RejectOverpayment => remaining,
        };
        Ok(&*record)
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Puts back a previous version of a record, used to undo a payment whose
    /// persistence failed.
    pub(crate) fn restore(&mut self, previous: StudentRecord) {
        if let Ok(record) = self.get_mut(&previous.id) {
            *record = previous;
        }
    }

    /// Drops the record with `id`, used to undo an add whose persistence failed.
    pub(crate) fn discard(&mut self, id: &str) {
        self.records.retain(|record| record.id != id);
    }

    fn insert(&mut self, record: StudentRecord) -> Result<&StudentRecord, Error> {
        if self.find_by_id(&record.id).is_some() {
            return Err(Error::DuplicateId(record.id));
        }
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut StudentRecord, Error> {
        self.records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn alice_and_bob(policy: PaymentPolicy) -> RecordStore {
        let mut store = RecordStore::with_policy(policy);
        store.add("Alice", "S1", dec!(500.0)).unwrap();
        store.add("Bob", "S2", dec!(300.0)).unwrap();
        store
    }

    #[test]
    fn test_add_then_find() {
        let mut store = RecordStore::new();
        let added = store.add("Alice", "S1", dec!(500.0)).unwrap().clone();

        assert_eq!(added, StudentRecord::new("Alice", "S1", dec!(500.0)));
        assert_eq!(store.find_by_id("S1"), Some(&added));
    }

    #[test]
    fn test_add_zero_fees() {
        let mut store = RecordStore::new();
        assert!(store.add("Carol", "S3", dec!(0)).is_ok());
    }

    #[test]
    fn test_add_duplicate_id_leaves_store_unchanged() {
        let mut store = alice_and_bob(PaymentPolicy::AllowCredit);
        let before = store.list().to_vec();

        let result = store.add("Mallory", "S1", dec!(1.0));

        assert!(matches!(result, Err(Error::DuplicateId(id)) if id == "S1"));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_id_comparison_is_case_sensitive() {
        let mut store = alice_and_bob(PaymentPolicy::AllowCredit);
        assert!(store.add("Sam", "s1", dec!(10)).is_ok());
        assert!(store.find_by_id("s1").is_some());
        assert!(store.find_by_id("S3").is_none());
    }

    #[test]
    fn test_add_negative_fees_rejected() {
        let mut store = RecordStore::new();
        let result = store.add("Alice", "S1", dec!(-1));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut store = RecordStore::new();
        let ids = ["S9", "S1", "S5", "A0"];
        for id in ids {
            store.add("Student", id, dec!(1)).unwrap();
        }
        let listed: Vec<&str> = store.list().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(listed, ids);
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_payment_scenario() {
        let mut store = alice_and_bob(PaymentPolicy::AllowCredit);

        let paid = store.apply_payment("S1", dec!(200.0)).unwrap();
        assert_eq!(paid.fees_due, dec!(300.0));
        assert_eq!(store.find_by_id("S1").unwrap().fees_due, dec!(300.0));

        let before = store.list().to_vec();
        let result = store.apply_payment("S3", dec!(50.0));
        assert!(matches!(result, Err(Error::NotFound(id)) if id == "S3"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_payment_is_exact() {
        let mut store = RecordStore::new();
        store.add("Alice", "S1", dec!(0.3)).unwrap();
        store.apply_payment("S1", dec!(0.1)).unwrap();
        assert_eq!(store.find_by_id("S1").unwrap().fees_due, dec!(0.2));
    }

    #[test]
    fn test_allow_credit_goes_negative() {
        let mut store = alice_and_bob(PaymentPolicy::AllowCredit);
        let paid = store.apply_payment("S2", dec!(350)).unwrap();
        assert_eq!(paid.fees_due, dec!(-50));
    }

    #[test]
    fn test_floor_at_zero() {
        let mut store = alice_and_bob(PaymentPolicy::FloorAtZero);
        assert_eq!(store.apply_payment("S2", dec!(350)).unwrap().fees_due, dec!(0));
        assert_eq!(store.apply_payment("S1", dec!(100)).unwrap().fees_due, dec!(400));
    }

    #[test]
    fn test_reject_overpayment() {
        let mut store = alice_and_bob(PaymentPolicy::RejectOverpayment);

        let result = store.apply_payment("S2", dec!(300.01));
        assert!(matches!(
            result,
            Err(Error::Overpayment { fees_due, amount, .. })
                if fees_due == dec!(300.0) && amount == dec!(300.01)
        ));
        assert_eq!(store.find_by_id("S2").unwrap().fees_due, dec!(300.0));

        assert_eq!(store.apply_payment("S2", dec!(300)).unwrap().fees_due, dec!(0));
    }

    #[test]
    fn test_payment_overflow_is_rejected() {
        let mut store = RecordStore::new();
        store.add("Alice", "S1", dec!(0)).unwrap();
        assert_eq!(store.apply_payment("S1", Decimal::MAX).unwrap().fees_due, Decimal::MIN);

        let result = store.apply_payment("S1", Decimal::MAX);

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(store.find_by_id("S1").unwrap().fees_due, Decimal::MIN);
    }

    #[test]
    fn test_negative_payment_raises_balance() {
        // The store does not validate the sign of a payment.
        let mut store = alice_and_bob(PaymentPolicy::AllowCredit);
        assert_eq!(store.apply_payment("S1", dec!(-25)).unwrap().fees_due, dec!(525.0));
    }

    #[test]
    fn test_extend_loaded_accepts_credit_and_skips_duplicates() {
        let mut store = RecordStore::new();
        let warnings = store.extend_loaded(vec![
            StudentRecord::new("Alice", "S1", dec!(-20)),
            StudentRecord::new("Bob", "S2", dec!(10)),
            StudentRecord::new("Alice again", "S1", dec!(99)),
        ]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_id("S1").unwrap().name, "Alice");
        assert_eq!(store.find_by_id("S1").unwrap().fees_due, dec!(-20));
        assert_eq!(warnings.len(), 1);
        assert!(matches!(&warnings[0], Error::DuplicateId(id) if id == "S1"));
    }

    #[test]
    fn test_restore_and_discard() {
        let mut store = alice_and_bob(PaymentPolicy::AllowCredit);
        let previous = store.find_by_id("S1").unwrap().clone();

        store.apply_payment("S1", dec!(100)).unwrap();
        store.restore(previous.clone());
        assert_eq!(store.find_by_id("S1"), Some(&previous));

        store.discard("S2");
        assert!(store.find_by_id("S2").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("allow-credit".parse::<PaymentPolicy>().unwrap(), PaymentPolicy::AllowCredit);
        assert_eq!(" floor-at-zero ".parse::<PaymentPolicy>().unwrap(), PaymentPolicy::FloorAtZero);
        assert_eq!(
            "reject-overpayment".parse::<PaymentPolicy>().unwrap(),
            PaymentPolicy::RejectOverpayment
        );
        assert!(matches!("never".parse::<PaymentPolicy>(), Err(Error::InvalidConfig(_))));
    }
}
