use crate::db::models::User;
use crate::db::DocumentStore;

pub(crate) async fn create(store: &DocumentStore, user: User) -> User {
    let mut users = store.users_mut().await;
    users.insert(user.id.clone(), user.clone());
    user
}

pub(crate) async fn find_by_id(store: &DocumentStore, id: &str) -> Option<User> {
    store.users().await.get(id).cloned()
}
