//! Transaction query service
//!
//! Filters the combined income and expense journals for listing, reporting
//! and export.

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Category, Department, Money, Transaction, TransactionId, TransactionKind, TransactionStatus,
};
use crate::storage::Storage;

/// Service for querying transactions
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
///
/// Each set is an inclusion filter; an empty set imposes no constraint.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Income, expense, or both when empty
    pub kinds: Vec<TransactionKind>,
    pub categories: Vec<Category>,
    pub departments: Vec<Department>,
    pub statuses: Vec<TransactionStatus>,
    /// Inclusive start of the date range
    pub start_date: Option<NaiveDate>,
    /// Inclusive end of the date range
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by kind
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kinds.push(kind);
        self
    }

    /// Filter by category
    pub fn category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    /// Filter by department
    pub fn department(mut self, department: Department) -> Self {
        self.departments.push(department);
        self
    }

    /// Filter by status
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.statuses.push(status);
        self
    }

    /// Filter by date range (inclusive on both ends)
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Only entries on or after `start`
    pub fn since(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Only entries on or before `end`
    pub fn until(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn validate(&self) -> LedgerResult<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(LedgerError::Validation(format!(
                    "Start date {} is after end date {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Whether `txn` passes every supplied filter
    pub fn matches(&self, txn: &Transaction) -> bool {
        (self.kinds.is_empty() || self.kinds.contains(&txn.kind))
            && (self.categories.is_empty() || self.categories.contains(&txn.category))
            && (self.departments.is_empty() || self.departments.contains(&txn.department))
            && (self.statuses.is_empty() || self.statuses.contains(&txn.status))
            && self.start_date.map_or(true, |start| txn.date >= start)
            && self.end_date.map_or(true, |end| txn.date <= end)
    }
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.storage.ledger.get(id)
    }

    /// Find a transaction by full ID or by the short prefix shown in listings
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Transaction>> {
        if let Ok(id) = TransactionId::parse(identifier) {
            return self.get(id);
        }

        let prefix = identifier
            .trim()
            .trim_start_matches("txn-")
            .to_lowercase();
        if prefix.is_empty() {
            return Ok(None);
        }

        let matches: Vec<_> = self
            .storage
            .ledger
            .get_all()?
            .into_iter()
            .filter(|t| t.id.as_uuid().to_string().starts_with(&prefix))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.into_iter().next()),
            n => Err(LedgerError::Validation(format!(
                "'{}' matches {} transactions; use a longer id",
                identifier, n
            ))),
        }
    }

    /// List transactions matching `filter`, newest date first, then most
    /// recently posted first
    pub fn list(&self, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        filter.validate()?;

        let mut transactions: Vec<_> = self
            .storage
            .ledger
            .get_all()?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();

        transactions.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Sum of amounts in a result set
    pub fn total_amount(transactions: &[Transaction]) -> Money {
        transactions.iter().map(|t| t.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{PasswordParams, Session};
    use crate::config::paths::LedgerPaths;
    use crate::models::{ExpenseCategory, IncomeCategory, Role};
    use crate::services::{LedgerService, PostingInput, UserService};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage, Session) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let users = UserService::with_params(&storage, PasswordParams::with_values(1024, 1, 1));
        users.register("acct", "pw", Role::Accountant).unwrap();
        let session = users.authenticate("acct", "pw").unwrap();
        (temp_dir, storage, session)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn post(
        storage: &Storage,
        session: &Session,
        category: Category,
        department: Department,
        units: i64,
        day: u32,
    ) -> TransactionId {
        let input = PostingInput {
            name: "Counterparty".into(),
            category,
            description: String::new(),
            amount: Money::from_units_cents(units, 0),
            date: date(day),
            department,
            status: None,
            receipt_path: None,
        };
        let ledger = LedgerService::new(storage);
        match category.kind() {
            TransactionKind::Income => ledger.post_income(session, input).unwrap(),
            TransactionKind::Expense => ledger.post_expense(session, input).unwrap(),
        }
    }

    fn seed(storage: &Storage, session: &Session) -> Vec<TransactionId> {
        vec![
            post(storage, session, IncomeCategory::AdmissionFees.into(), Department::Science, 1000, 1),
            post(storage, session, IncomeCategory::HostelFees.into(), Department::Arts, 500, 3),
            post(storage, session, ExpenseCategory::LabEquipment.into(), Department::Science, 200, 5),
            post(storage, session, ExpenseCategory::Maintenance.into(), Department::Engineering, 100, 2),
            post(storage, session, IncomeCategory::GovernmentDonation.into(), Department::Science, 50, 5),
        ]
    }

    #[test]
    fn test_list_all_sorted_by_date_then_posting() {
        let (_temp_dir, storage, session) = create_test_storage();
        let ids = seed(&storage, &session);

        let all = TransactionService::new(&storage)
            .list(&TransactionFilter::new())
            .unwrap();
        let listed: Vec<_> = all.iter().map(|t| t.id).collect();

        // Two entries on the 5th: the later posting comes first
        assert_eq!(listed, vec![ids[4], ids[2], ids[1], ids[3], ids[0]]);
    }

    #[test]
    fn test_department_filter() {
        let (_temp_dir, storage, session) = create_test_storage();
        seed(&storage, &session);

        let science = TransactionService::new(&storage)
            .list(&TransactionFilter::new().department(Department::Science))
            .unwrap();

        assert_eq!(science.len(), 3);
        assert!(science.iter().all(|t| t.department == Department::Science));
        assert!(science.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_combined_filters() {
        let (_temp_dir, storage, session) = create_test_storage();
        seed(&storage, &session);
        let service = TransactionService::new(&storage);

        let income_science = service
            .list(
                &TransactionFilter::new()
                    .kind(TransactionKind::Income)
                    .department(Department::Science),
            )
            .unwrap();
        assert_eq!(income_science.len(), 2);

        let either_category = service
            .list(
                &TransactionFilter::new()
                    .category(IncomeCategory::HostelFees.into())
                    .category(ExpenseCategory::Maintenance.into()),
            )
            .unwrap();
        assert_eq!(either_category.len(), 2);

        let pending = service
            .list(&TransactionFilter::new().status(TransactionStatus::Pending))
            .unwrap();
        assert_eq!(pending.len(), 5);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let (_temp_dir, storage, session) = create_test_storage();
        seed(&storage, &session);

        let ranged = TransactionService::new(&storage)
            .list(&TransactionFilter::new().date_range(date(2), date(3)))
            .unwrap();

        assert_eq!(ranged.len(), 2);
        assert_eq!(
            TransactionService::total_amount(&ranged),
            Money::from_units_cents(600, 0)
        );
    }

    #[test]
    fn test_inverted_date_range_rejected() {
        let (_temp_dir, storage, _session) = create_test_storage();

        let err = TransactionService::new(&storage)
            .list(&TransactionFilter::new().date_range(date(9), date(1)))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_limit_and_empty_result() {
        let (_temp_dir, storage, session) = create_test_storage();
        let service = TransactionService::new(&storage);
        assert!(service.list(&TransactionFilter::new()).unwrap().is_empty());

        seed(&storage, &session);
        assert_eq!(service.list(&TransactionFilter::new().limit(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, storage, session) = create_test_storage();
        let ids = seed(&storage, &session);
        let service = TransactionService::new(&storage);

        let short = ids[1].to_string();
        let found = service.find(&short).unwrap().unwrap();
        assert_eq!(found.id, ids[1]);

        let full = ids[1].as_uuid().to_string();
        assert_eq!(service.find(&full).unwrap().unwrap().id, ids[1]);
    }
}
