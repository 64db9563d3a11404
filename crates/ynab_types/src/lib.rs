//! Wire types for the YNAB v1 REST API.
//!
//! Every read response arrives wrapped in a `{"data": ...}` envelope;
//! everything uploaded is one of the two transaction bodies in
//! [`transaction`]. Amounts are integer milliunits throughout (see
//! [`Milliunits`]); serialization happens only at this boundary, so the
//! structs here mirror the service's JSON field-for-field.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Signed money amount in **milliunits**, the service's integer currency
/// representation: the real amount multiplied by 1000.
///
/// Serialized transparently as a bare integer, which is how the service
/// sends and expects amounts.
///
/// # Examples
///
/// ```rust
/// use ynab_types::Milliunits;
///
/// let amount = Milliunits::from_major(12.345);
/// assert_eq!(amount.milliunits(), 12_345);
/// assert_eq!(amount.to_string(), "12.345");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Milliunits(i64);

impl Milliunits {
    /// Creates an amount from raw milliunits.
    #[must_use]
    pub const fn new(milliunits: i64) -> Self {
        Self(milliunits)
    }

    /// Returns the raw value in milliunits.
    #[must_use]
    pub const fn milliunits(self) -> i64 {
        self.0
    }

    /// Converts a major-unit amount (euro, dollars, ...) to milliunits,
    /// rounding to the nearest milliunit.
    ///
    /// Rounding keeps binary-float inputs honest: `4.60` becomes `4600`,
    /// not the `4599` a plain truncation of `4.6 * 1000.0` would produce.
    #[must_use]
    pub fn from_major(major: f64) -> Self {
        Self((major * 1000.0).round() as i64)
    }
}

impl fmt::Display for Milliunits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:03}", abs / 1000, abs % 1000)
    }
}

impl From<i64> for Milliunits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Milliunits> for i64 {
    fn from(value: Milliunits) -> Self {
        value.0
    }
}

/// The fixed `{"data": ...}` wrapper every read endpoint responds with.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

pub mod account {
    use super::*;

    /// Budget account as returned by the accounts endpoint.
    ///
    /// The service sends more fields than these; unknown ones are ignored
    /// at decode time.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Account {
        pub id: String,
        pub name: String,
        /// Free-form note. Account lookups match a known account number as
        /// a substring of this field.
        pub note: Option<String>,
        pub balance: Milliunits,
        pub cleared_balance: Milliunits,
        pub closed: bool,
    }

    /// `data` payload of the accounts endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountsResponse {
        pub accounts: Vec<Account>,
    }
}

pub mod category {
    use super::*;

    /// One category's activity for a given budget month.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Category {
        pub id: String,
        pub name: String,
        pub budgeted: Milliunits,
        pub activity: Milliunits,
        pub balance: Milliunits,
    }

    /// `data` payload of the month/category endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryResponse {
        pub category: Category,
    }
}

pub mod statement {
    use super::*;

    /// One row lifted from a bank-statement export, the external input to
    /// `SaveTransaction::from_statement`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct StatementTransaction {
        pub date: NaiveDate,
        /// Major currency units as exported by the bank.
        pub amount: f64,
        pub memo: String,
    }
}

pub mod transaction {
    use super::*;

    /// Cleared status of a transaction.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ClearedStatus {
        Cleared,
        Uncleared,
        Reconciled,
    }

    /// Transaction as returned by the account transactions endpoint.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: String,
        pub date: NaiveDate,
        pub amount: Milliunits,
        pub memo: Option<String>,
        pub cleared: ClearedStatus,
        pub approved: bool,
        pub payee_id: Option<String>,
        pub import_id: Option<String>,
    }

    /// `data` payload of the account transactions endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub transactions: Vec<Transaction>,
    }

    /// Memo written on auto-generated balance corrections.
    pub const BALANCE_CORRECTION_MEMO: &str = "#BalanceUpdate #AutoGenerated #ynup";

    const IMPORT_ID_PREFIX: &str = "YNAB";

    /// Dedup key for imported transactions: `YNAB:{milliunits}:{date}:1`.
    ///
    /// The trailing occurrence counter is fixed at 1, so two same-day rows
    /// with the same amount collide. Acceptable for a dedup hint; this is
    /// not a unique id.
    fn import_id(amount: Milliunits, date: NaiveDate) -> String {
        format!(
            "{IMPORT_ID_PREFIX}:{}:{}:1",
            amount.milliunits(),
            date.format("%Y-%m-%d")
        )
    }

    /// Outbound transaction in the exact shape the service accepts.
    ///
    /// `payee_id` and `import_id` are omitted from the JSON entirely when
    /// unset; the two constructors each set exactly one of them.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SaveTransaction {
        pub account_id: String,
        pub date: NaiveDate,
        pub amount: Milliunits,
        pub memo: String,
        pub cleared: ClearedStatus,
        pub approved: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub payee_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub import_id: Option<String>,
    }

    impl SaveTransaction {
        /// Builds a balance correction dated today.
        ///
        /// The corrective amount is given in major units and may be
        /// negative. Dedup relies on the payee, so no import id is set.
        #[must_use]
        pub fn balance_correction(account_id: &str, amount_major: f64, payee_id: &str) -> Self {
            Self {
                account_id: account_id.to_string(),
                date: chrono::Local::now().date_naive(),
                amount: Milliunits::from_major(amount_major),
                memo: BALANCE_CORRECTION_MEMO.to_string(),
                cleared: ClearedStatus::Cleared,
                approved: false,
                payee_id: Some(payee_id.to_string()),
                import_id: None,
            }
        }

        /// Builds an upload row from a statement record, deriving the
        /// import id from the milliunit amount and the date.
        #[must_use]
        pub fn from_statement(account_id: &str, stmt: &statement::StatementTransaction) -> Self {
            let amount = Milliunits::from_major(stmt.amount);
            Self {
                account_id: account_id.to_string(),
                date: stmt.date,
                amount,
                memo: stmt.memo.clone(),
                cleared: ClearedStatus::Cleared,
                approved: false,
                payee_id: None,
                import_id: Some(import_id(amount, stmt.date)),
            }
        }
    }

    /// Single-transaction upload body: `{"transaction": {...}}`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SaveTransactionBody {
        pub transaction: SaveTransaction,
    }

    /// Batch upload body: `{"transactions": [...]}`.
    ///
    /// Wrapping is purely structural; order and count of the rows are
    /// preserved as given.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SaveTransactionsBody {
        pub transactions: Vec<SaveTransaction>,
    }

    impl From<Vec<SaveTransaction>> for SaveTransactionsBody {
        fn from(transactions: Vec<SaveTransaction>) -> Self {
            Self { transactions }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::statement::StatementTransaction;
    use super::transaction::{
        BALANCE_CORRECTION_MEMO, ClearedStatus, SaveTransaction, SaveTransactionBody,
        SaveTransactionsBody,
    };
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn from_major_rounds_to_nearest_milliunit() {
        assert_eq!(Milliunits::from_major(12.345).milliunits(), 12_345);
        assert_eq!(Milliunits::from_major(10.00).milliunits(), 10_000);
        // 4.6 * 1000.0 is 4599.999... in binary; rounding recovers 4600.
        assert_eq!(Milliunits::from_major(4.60).milliunits(), 4_600);
        assert_eq!(Milliunits::from_major(-2.5005).milliunits(), -2_501);
        assert_eq!(Milliunits::from_major(0.0).milliunits(), 0);
    }

    #[test]
    fn display_formats_major_units() {
        assert_eq!(Milliunits::new(0).to_string(), "0.000");
        assert_eq!(Milliunits::new(12_345).to_string(), "12.345");
        assert_eq!(Milliunits::new(-500).to_string(), "-0.500");
        assert_eq!(Milliunits::new(10_000).to_string(), "10.000");
    }

    #[test]
    fn milliunits_serialize_as_bare_integers() {
        assert_eq!(serde_json::to_value(Milliunits::new(12_345)).unwrap(), json!(12_345));
        let parsed: Milliunits = serde_json::from_value(json!(-7_250)).unwrap();
        assert_eq!(parsed, Milliunits::new(-7_250));
    }

    #[test]
    fn cleared_status_uses_snake_case_strings() {
        assert_eq!(serde_json::to_value(ClearedStatus::Cleared).unwrap(), json!("cleared"));
        assert_eq!(serde_json::to_value(ClearedStatus::Reconciled).unwrap(), json!("reconciled"));
    }

    #[test]
    fn balance_correction_sets_payee_and_no_import_id() {
        let txn = SaveTransaction::balance_correction("acct-1", 12.345, "payee-9");

        assert_eq!(txn.amount, Milliunits::new(12_345));
        assert_eq!(txn.date, chrono::Local::now().date_naive());
        assert_eq!(txn.memo, BALANCE_CORRECTION_MEMO);
        assert_eq!(txn.cleared, ClearedStatus::Cleared);
        assert!(!txn.approved);
        assert_eq!(txn.payee_id.as_deref(), Some("payee-9"));
        assert!(txn.import_id.is_none());
    }

    #[test]
    fn single_body_serializes_the_documented_shape() {
        let txn = SaveTransaction::balance_correction("acct-1", 12.345, "payee-9");
        let date = txn.date.format("%Y-%m-%d").to_string();
        let body = SaveTransactionBody { transaction: txn };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "transaction": {
                    "account_id": "acct-1",
                    "date": date,
                    "amount": 12_345,
                    "memo": BALANCE_CORRECTION_MEMO,
                    "cleared": "cleared",
                    "approved": false,
                    "payee_id": "payee-9",
                }
            })
        );
    }

    #[test]
    fn statement_row_derives_the_import_id() {
        let stmt = StatementTransaction {
            date: date(2024, 1, 15),
            amount: 10.00,
            memo: "COFFEE CO".to_string(),
        };
        let txn = SaveTransaction::from_statement("acct-1", &stmt);

        assert_eq!(txn.amount, Milliunits::new(10_000));
        assert_eq!(txn.import_id.as_deref(), Some("YNAB:10000:2024-01-15:1"));
        assert!(txn.payee_id.is_none());
    }

    #[test]
    fn statement_row_serializes_the_documented_shape() {
        let stmt = StatementTransaction {
            date: date(2024, 1, 15),
            amount: 10.00,
            memo: "COFFEE CO".to_string(),
        };
        let txn = SaveTransaction::from_statement("acct-1", &stmt);

        assert_eq!(
            serde_json::to_value(&txn).unwrap(),
            json!({
                "account_id": "acct-1",
                "date": "2024-01-15",
                "amount": 10_000,
                "memo": "COFFEE CO",
                "cleared": "cleared",
                "approved": false,
                "import_id": "YNAB:10000:2024-01-15:1",
            })
        );
    }

    #[test]
    fn same_day_same_amount_rows_share_an_import_id() {
        let a = StatementTransaction {
            date: date(2024, 1, 15),
            amount: 10.00,
            memo: "first".to_string(),
        };
        let b = StatementTransaction {
            date: date(2024, 1, 15),
            amount: 10.00,
            memo: "second".to_string(),
        };

        assert_eq!(
            SaveTransaction::from_statement("acct-1", &a).import_id,
            SaveTransaction::from_statement("acct-1", &b).import_id,
        );
    }

    #[test]
    fn empty_batch_wraps_to_an_empty_array() {
        let body = SaveTransactionsBody::from(Vec::new());
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "transactions": [] })
        );
    }

    #[test]
    fn batch_wrap_preserves_order_and_count() {
        let rows = vec![
            StatementTransaction {
                date: date(2024, 1, 15),
                amount: 10.00,
                memo: "first".to_string(),
            },
            StatementTransaction {
                date: date(2024, 1, 16),
                amount: -3.25,
                memo: "second".to_string(),
            },
        ];
        let body = SaveTransactionsBody::from(
            rows.iter()
                .map(|row| SaveTransaction::from_statement("acct-1", row))
                .collect::<Vec<_>>(),
        );

        assert_eq!(body.transactions.len(), 2);
        assert_eq!(body.transactions[0].memo, "first");
        assert_eq!(body.transactions[1].memo, "second");
        assert_eq!(body.transactions[1].amount, Milliunits::new(-3_250));
    }

    #[test]
    fn envelope_unwraps_the_data_field() {
        let raw = json!({
            "data": {
                "accounts": [{
                    "id": "a-1",
                    "name": "Checking",
                    "note": "12-3405-0123456-50",
                    "balance": 1_000,
                    "cleared_balance": 900,
                    "closed": false,
                    "on_budget": true,
                }]
            }
        });
        let envelope: Envelope<account::AccountsResponse> = serde_json::from_value(raw).unwrap();

        assert_eq!(envelope.data.accounts.len(), 1);
        assert_eq!(envelope.data.accounts[0].id, "a-1");
        // Fields the structs do not model (here: on_budget) are ignored.
        assert_eq!(envelope.data.accounts[0].balance, Milliunits::new(1_000));
    }
}
