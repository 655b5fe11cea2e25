use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    /// Back-references to the blogs this account owns, in creation order.
    pub blogs: Vec<Uuid>,
}

impl Account {
    /// Drop `blog_id` from the back-reference list, keeping the order of the rest.
    pub fn prune_blog(&mut self, blog_id: Uuid) {
        self.blogs.retain(|id| *id != blog_id);
    }

    pub fn owns_ref(&self, blog_id: Uuid) -> bool {
        self.blogs.contains(&blog_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub username: Option<String>,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prune_blog_preserves_order() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut account = Account {
            id: Uuid::new_v4(),
            username: "mluukkai".to_string(),
            name: None,
            blogs: vec![a, b, c, b],
        };

        account.prune_blog(b);

        assert_eq!(account.blogs, vec![a, c]);
        assert!(!account.owns_ref(b));
    }
}
