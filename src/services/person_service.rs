use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::database::models::{Person, PersonBody};
use crate::database::{parse_id, Store, StoreError};
use crate::services::{present, ServiceError, ServiceResult};

const MIN_NAME_LEN: usize = 3;
const MIN_NUMBER_LEN: usize = 8;

/// Snapshot backing the `/info` page
#[derive(Debug, Clone)]
pub struct DirectoryInfo {
    pub count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Phonebook CRUD. No ownership: anyone may read or change entries.
#[derive(Clone)]
pub struct PersonService {
    store: Arc<dyn Store>,
}

impl PersonService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Person>> {
        Ok(self.store.list_persons().await?)
    }

    pub async fn read(&self, id: &str) -> ServiceResult<Person> {
        let id = parse_id(id)?;
        self.find(id).await
    }

    pub async fn create(&self, body: PersonBody) -> ServiceResult<Person> {
        let (Some(name), Some(number)) = (present(body.name), present(body.number)) else {
            return Err(ServiceError::BadRequest("name or number missing".to_string()));
        };

        if self.store.find_person_by_name(&name).await?.is_some() {
            return Err(ServiceError::BadRequest("name must be unique".to_string()));
        }

        validate_name(&name)?;
        validate_number(&number)?;

        let person = match self.store.insert_person(&name, &number).await {
            Ok(person) => person,
            Err(StoreError::Conflict(_)) => {
                return Err(ServiceError::BadRequest("name must be unique".to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        info!("Added {} to the phonebook", person.name);
        Ok(person)
    }

    /// Replace the number of an existing entry; the name is left untouched.
    pub async fn update_number(&self, id: &str, body: PersonBody) -> ServiceResult<Person> {
        let id = parse_id(id)?;
        let number = present(body.number)
            .ok_or_else(|| ServiceError::BadRequest("number missing".to_string()))?;
        validate_number(&number)?;

        let mut person = self.find(id).await?;
        person.number = number;
        Ok(self.store.save_person(person).await?)
    }

    /// Remove an entry. Deleting an id that is not stored is not an error.
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;
        if self.store.delete_person(id).await? {
            info!("Removed person {} from the phonebook", id);
        }
        Ok(())
    }

    pub async fn info(&self) -> ServiceResult<DirectoryInfo> {
        Ok(DirectoryInfo {
            count: self.store.count_persons().await?,
            generated_at: Utc::now(),
        })
    }

    async fn find(&self, id: Uuid) -> ServiceResult<Person> {
        self.store
            .find_person(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("person {}", id)))
    }
}

fn validate_name(name: &str) -> ServiceResult<()> {
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ServiceError::validation(
            "name",
            format!("name must be at least {} characters long", MIN_NAME_LEN),
        ));
    }
    Ok(())
}

/// `DD-D...` or `DDD-D...`, at least eight characters in total
fn validate_number(number: &str) -> ServiceResult<()> {
    if number.len() < MIN_NUMBER_LEN {
        return Err(ServiceError::validation(
            "number",
            format!("number must be at least {} characters long", MIN_NUMBER_LEN),
        ));
    }

    let well_formed = match number.split_once('-') {
        Some((prefix, rest)) => {
            (2..=3).contains(&prefix.len())
                && prefix.chars().all(|c| c.is_ascii_digit())
                && !rest.is_empty()
                && rest.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    };

    if !well_formed {
        return Err(ServiceError::validation(
            "number",
            format!("{} is not a valid phone number", number),
        ));
    }
    Ok(())
}
