use reqwest::{Client, StatusCode, Url, header};
use ynab_types::{
    Envelope,
    account::{Account, AccountsResponse},
    category::{Category, CategoryResponse},
    transaction::{SaveTransactionBody, SaveTransactionsBody, Transaction, TransactionsResponse},
};

use crate::error::ApiError;

/// Production endpoint of the budgeting service.
const DEFAULT_BASE_URL: &str = "https://api.youneedabudget.com/v1";

/// Personal access tokens are always this long.
const TOKEN_LEN: usize = 64;

/// Marker for the JSON bodies the transactions endpoint accepts: the
/// single-transaction wrapper or the batch wrapper, nothing else.
pub trait TransactionPayload: serde::Serialize {}

impl TransactionPayload for SaveTransactionBody {}
impl TransactionPayload for SaveTransactionsBody {}

/// Stateful façade over the remote budgeting API.
///
/// Construction derives the credential artifacts once (the sensitive
/// bearer header installed on the shared HTTP client, plus the token
/// re-sent as the `access_token` query parameter on uploads); every
/// operation afterwards is a single request with a fixed status check.
/// The session holds no other cross-call state; accounts and transactions
/// are read fresh from the service on each call.
///
/// Methods are async but meant to be awaited one at a time. The session
/// offers no guarantees about concurrent reuse; an orchestration layer on
/// top would own that.
#[derive(Clone)]
pub struct BudgetSession {
    http: Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for BudgetSession {
    // The token never appears in debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetSession")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl BudgetSession {
    /// Creates a session against the production API.
    ///
    /// Fails with [`ApiError::InvalidToken`] unless the token is exactly
    /// 64 characters.
    pub fn new(token: &str) -> Result<Self, ApiError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Creates a session against an alternate host, e.g. a local stand-in
    /// for the service in tests.
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, ApiError> {
        if token.len() != TOKEN_LEN {
            return Err(ApiError::InvalidToken(format!(
                "expected {TOKEN_LEN} characters, got {}",
                token.len()
            )));
        }

        let base_url = Url::parse(base_url)
            .map_err(|err| ApiError::InvalidUrl(format!("{base_url}: {err}")))?;

        let mut bearer = header::HeaderValue::try_from(format!("Bearer {token}"))
            .map_err(|err| ApiError::InvalidToken(err.to_string()))?;
        bearer.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, bearer);

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Lists the budget's accounts.
    ///
    /// Success is exactly HTTP 200; any other status is fatal-tier
    /// [`ApiError::UnexpectedStatus`].
    pub async fn list_accounts(&self, budget_id: &str) -> Result<Vec<Account>, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("budgets/{budget_id}/accounts")))
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus {
                endpoint: "accounts",
                status,
            });
        }

        let envelope = resp.json::<Envelope<AccountsResponse>>().await?;
        Ok(envelope.data.accounts)
    }

    /// Lists an account's transactions. Same exact-200 policy as
    /// [`list_accounts`](Self::list_accounts).
    pub async fn list_transactions(
        &self,
        budget_id: &str,
        account_id: &str,
    ) -> Result<Vec<Transaction>, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!(
                "budgets/{budget_id}/accounts/{account_id}/transactions"
            )))
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus {
                endpoint: "transactions",
                status,
            });
        }

        let envelope = resp.json::<Envelope<TransactionsResponse>>().await?;
        tracing::debug!(
            "fetched {} transactions for account {account_id}",
            envelope.data.transactions.len()
        );
        Ok(envelope.data.transactions)
    }

    /// Fetches one category's activity for a budget month (`YYYY-MM-DD`,
    /// or the literal `current` the service also accepts).
    ///
    /// Unlike the other reads, this endpoint is not gated on the status
    /// code: whatever body arrives is decoded as-is, and a body that does
    /// not decode surfaces as [`ApiError::Network`].
    pub async fn category_activity(
        &self,
        budget_id: &str,
        month: &str,
        category_id: &str,
    ) -> Result<Category, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!(
                "budgets/{budget_id}/months/{month}/categories/{category_id}"
            )))
            .send()
            .await?;

        let envelope = resp.json::<Envelope<CategoryResponse>>().await?;
        Ok(envelope.data.category)
    }

    /// Uploads an assembled transaction body.
    ///
    /// The stored token rides along as the `access_token` query parameter.
    /// Success is exactly HTTP 201; anything else is logged (status at
    /// error level, payload and raw response body at debug) and returned
    /// as recoverable-tier [`ApiError::Upload`]. `account_id` only feeds
    /// the success log line.
    pub async fn submit<P: TransactionPayload>(
        &self,
        budget_id: &str,
        account_id: &str,
        payload: &P,
    ) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.url(&format!("budgets/{budget_id}/transactions")))
            .query(&[("access_token", self.token.as_str())])
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::CREATED {
            tracing::info!("uploaded transaction payload to account {account_id}");
            return Ok(());
        }

        let body = match resp.text().await {
            Ok(body) => body,
            Err(err) => format!("<unreadable body: {err}>"),
        };
        tracing::error!("transaction upload failed with status {status}");
        match serde_json::to_string(payload) {
            Ok(json) => tracing::debug!("rejected payload: {json}"),
            Err(err) => tracing::debug!("rejected payload not serializable: {err}"),
        }
        tracing::debug!("response body: {body}");

        Err(ApiError::Upload { status, body })
    }
}

/// Finds the id of the account whose note mentions `account_number`.
///
/// Scans in order and keeps overwriting the result, so when several notes
/// match, the last account in list order wins. `None` means no note
/// matched; that is a lookup miss for the caller to handle, not an error.
pub fn find_account_id<'a>(accounts: &'a [Account], account_number: &str) -> Option<&'a str> {
    let mut found = None;
    for account in accounts {
        if let Some(note) = &account.note
            && note.contains(account_number)
        {
            found = Some(account.id.as_str());
        }
    }
    found
}
