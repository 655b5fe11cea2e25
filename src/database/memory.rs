use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Account, Blog, BlogPayload, Person};
use crate::database::store::{AccountStore, BlogStore, PersonStore, Store, StoreError, StoreResult};

/// In-process store used when no DATABASE_URL is configured, and by tests.
///
/// Each table sits behind its own lock; a call holds at most one lock, so
/// every operation is atomic for a single record and nothing more. Listing
/// order follows insertion order.
#[derive(Default)]
pub struct MemoryStore {
    blogs: RwLock<Table<Blog>>,
    accounts: RwLock<Table<Account>>,
    persons: RwLock<Table<Person>>,
}

struct Table<T> {
    rows: HashMap<Uuid, T>,
    order: Vec<Uuid>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn all(&self) -> Vec<T> {
        self.order.iter().filter_map(|id| self.rows.get(id).cloned()).collect()
    }

    fn insert(&mut self, id: Uuid, row: T) {
        self.rows.insert(id, row);
        self.order.push(id);
    }

    fn replace(&mut self, id: Uuid, row: T) -> Option<T> {
        let slot = self.rows.get_mut(&id)?;
        *slot = row.clone();
        Some(row)
    }

    fn remove(&mut self, id: Uuid) -> Option<T> {
        let row = self.rows.remove(&id)?;
        self.order.retain(|existing| *existing != id);
        Some(row)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn list_blogs(&self) -> StoreResult<Vec<Blog>> {
        Ok(self.blogs.read().await.all())
    }

    async fn find_blog(&self, id: Uuid) -> StoreResult<Option<Blog>> {
        Ok(self.blogs.read().await.rows.get(&id).cloned())
    }

    async fn insert_blog(&self, owner_id: Uuid, payload: BlogPayload) -> StoreResult<Blog> {
        let blog = Blog {
            id: Uuid::new_v4(),
            owner_id,
            payload,
        };
        self.blogs.write().await.insert(blog.id, blog.clone());
        Ok(blog)
    }

    async fn save_blog(&self, blog: Blog) -> StoreResult<Blog> {
        let id = blog.id;
        self.blogs
            .write()
            .await
            .replace(id, blog)
            .ok_or_else(|| StoreError::NotFound(format!("blog {}", id)))
    }

    async fn delete_blog(&self, id: Uuid) -> StoreResult<()> {
        self.blogs
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("blog {}", id)))
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        Ok(self.accounts.read().await.all())
    }

    async fn find_account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().await.rows.get(&id).cloned())
    }

    async fn insert_account(&self, username: &str, name: Option<&str>) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().await;
        if accounts.rows.values().any(|a| a.username == username) {
            return Err(StoreError::Conflict(format!("username '{}' is taken", username)));
        }

        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            name: name.map(str::to_string),
            blogs: Vec::new(),
        };
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn push_blog_ref(&self, account_id: Uuid, blog_id: Uuid) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .rows
            .get_mut(&account_id)
            .ok_or_else(|| StoreError::NotFound(format!("account {}", account_id)))?;

        if !account.owns_ref(blog_id) {
            account.blogs.push(blog_id);
        }
        Ok(account.clone())
    }

    async fn prune_blog_ref(&self, account_id: Uuid, blog_id: Uuid) -> StoreResult<Account> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .rows
            .get_mut(&account_id)
            .ok_or_else(|| StoreError::NotFound(format!("account {}", account_id)))?;

        account.prune_blog(blog_id);
        Ok(account.clone())
    }
}

#[async_trait]
impl PersonStore for MemoryStore {
    async fn list_persons(&self) -> StoreResult<Vec<Person>> {
        Ok(self.persons.read().await.all())
    }

    async fn count_persons(&self) -> StoreResult<usize> {
        Ok(self.persons.read().await.rows.len())
    }

    async fn find_person(&self, id: Uuid) -> StoreResult<Option<Person>> {
        Ok(self.persons.read().await.rows.get(&id).cloned())
    }

    async fn find_person_by_name(&self, name: &str) -> StoreResult<Option<Person>> {
        Ok(self
            .persons
            .read()
            .await
            .rows
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn insert_person(&self, name: &str, number: &str) -> StoreResult<Person> {
        let mut persons = self.persons.write().await;
        if persons.rows.values().any(|p| p.name == name) {
            return Err(StoreError::Conflict(format!("name '{}' is taken", name)));
        }

        let person = Person {
            id: Uuid::new_v4(),
            name: name.to_string(),
            number: number.to_string(),
        };
        persons.insert(person.id, person.clone());
        Ok(person)
    }

    async fn save_person(&self, person: Person) -> StoreResult<Person> {
        let id = person.id;
        self.persons
            .write()
            .await
            .replace(id, person)
            .ok_or_else(|| StoreError::NotFound(format!("person {}", id)))
    }

    async fn delete_person(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.persons.write().await.remove(id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str) -> BlogPayload {
        BlogPayload {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn lists_in_insertion_order() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for title in ["first", "second", "third"] {
            store.insert_blog(owner, payload(title)).await.unwrap();
        }

        let titles: Vec<String> = store
            .list_blogs()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.payload.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn delete_and_save_report_missing_records() {
        let store = MemoryStore::new();
        let blog = store.insert_blog(Uuid::new_v4(), payload("gone")).await.unwrap();

        store.delete_blog(blog.id).await.unwrap();

        assert!(matches!(store.delete_blog(blog.id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.save_blog(blog).await, Err(StoreError::NotFound(_))));
        assert!(store.list_blogs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = MemoryStore::new();
        store.insert_account("root", Some("Superuser")).await.unwrap();

        let err = store.insert_account("root", None).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.list_accounts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn person_names_are_unique() {
        let store = MemoryStore::new();
        store.insert_person("Arto Hellas", "040-123456").await.unwrap();

        let err = store.insert_person("Arto Hellas", "040-654321").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.count_persons().await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_person_inserts_keep_one_name() {
        let store = std::sync::Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.insert_person("Ada Lovelace", &format!("040-{:06}", i)).await
                })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => inserted += 1,
                Err(err) => assert!(matches!(err, StoreError::Conflict(_))),
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(store.count_persons().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn blog_refs_are_applied_to_the_stored_account() {
        let store = MemoryStore::new();
        let account = store.insert_account("mluukkai", None).await.unwrap();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        store.push_blog_ref(account.id, a).await.unwrap();
        store.push_blog_ref(account.id, b).await.unwrap();
        let after_dup = store.push_blog_ref(account.id, a).await.unwrap();
        assert_eq!(after_dup.blogs, vec![a, b]);

        let pruned = store.prune_blog_ref(account.id, a).await.unwrap();
        assert_eq!(pruned.blogs, vec![b]);
        assert_eq!(store.find_account(account.id).await.unwrap(), Some(pruned));

        let err = store.push_blog_ref(Uuid::new_v4(), a).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_person_reports_whether_removed() {
        let store = MemoryStore::new();
        let person = store.insert_person("Arto Hellas", "040-123456").await.unwrap();

        assert!(store.delete_person(person.id).await.unwrap());
        assert!(!store.delete_person(person.id).await.unwrap());
        assert_eq!(store.count_persons().await.unwrap(), 0);
    }
}
