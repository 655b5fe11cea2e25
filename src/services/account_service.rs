use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::database::models::{Account, NewAccount};
use crate::database::{Store, StoreError};
use crate::services::{present, ServiceError, ServiceResult};

const MIN_USERNAME_LEN: usize = 3;

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn Store>,
}

impl AccountService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Account>> {
        Ok(self.store.list_accounts().await?)
    }

    pub async fn register(&self, new: NewAccount) -> ServiceResult<Account> {
        let username = present(new.username)
            .ok_or_else(|| ServiceError::BadRequest("username missing".to_string()))?;

        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(ServiceError::validation(
                "username",
                format!("username must be at least {} characters long", MIN_USERNAME_LEN),
            ));
        }

        let name = present(new.name);
        let account = match self.store.insert_account(&username, name.as_deref()).await {
            Ok(account) => account,
            Err(StoreError::Conflict(_)) => {
                return Err(ServiceError::BadRequest("expected `username` to be unique".to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        info!("Registered account {} ({})", account.username, account.id);
        Ok(account)
    }

    /// Look up the account a verified token refers to
    pub async fn resolve(&self, id: Uuid) -> ServiceResult<Option<Account>> {
        Ok(self.store.find_account(id).await?)
    }
}
