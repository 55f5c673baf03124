use mongodb::bson::oid::ObjectId;

use crate::database::{BlogStore, StoreError};
use crate::models::{CreateUserRequest, User, UserResponse};
use crate::services::auth_service::AuthSettings;
use crate::utils::AppError;

/// Registers a user. The password policy is checked before the schema, and
/// the plaintext is dropped once hashed.
pub async fn create_user(
    store: &dyn BlogStore,
    auth: &AuthSettings,
    request: CreateUserRequest,
) -> Result<UserResponse, AppError> {
    let violations = request.password_policy();
    if !violations.is_empty() {
        return Err(AppError::PasswordPolicy(violations));
    }

    request.validate().map_err(AppError::Validation)?;

    let CreateUserRequest {
        username,
        name,
        password,
    } = request;
    let username = username.unwrap_or_default();
    let password = password.unwrap_or_default();

    if store.find_user_by_username(&username).await?.is_some() {
        return Err(StoreError::DuplicateKey {
            model: "User",
            field: "username",
            value: username,
        }
        .into());
    }

    let user = User {
        id: ObjectId::new(),
        username,
        name,
        password_hash: auth.hash_password(password).await?,
        blogs: Vec::new(),
    };

    // The unique index still guards against a concurrent registration
    store.insert_user(&user).await?;

    log::info!("✅ User registered: {}", user.username);

    Ok(UserResponse::unexpanded(user))
}

/// Every user with their blogs expanded.
pub async fn list_users(store: &dyn BlogStore) -> Result<Vec<UserResponse>, AppError> {
    let users = store.list_users().await?;

    let blog_ids: Vec<ObjectId> = users.iter().flat_map(|u| u.blogs.iter().copied()).collect();
    let blogs = if blog_ids.is_empty() {
        Vec::new()
    } else {
        store.find_blogs(&blog_ids).await?
    };

    Ok(users
        .into_iter()
        .map(|user| UserResponse::expanded(user, &blogs))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    fn auth() -> AuthSettings {
        AuthSettings::new("test-secret", 3600, 4)
    }

    fn request(username: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: Some(username.into()),
            name: Some("Matti Luukkainen".into()),
            password: Some(password.into()),
        }
    }

    #[actix_rt::test]
    async fn creates_user_with_hashed_password() {
        let store = MemoryStore::new();
        let created = create_user(&store, &auth(), request("mluukkai", "salainen"))
            .await
            .unwrap();

        assert_eq!(created.username, "mluukkai");
        let stored = store.find_user_by_username("mluukkai").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "salainen");
        assert!(bcrypt::verify("salainen", &stored.password_hash).unwrap());
    }

    #[actix_rt::test]
    async fn duplicate_username_is_a_validation_error() {
        let store = MemoryStore::new();
        create_user(&store, &auth(), request("root", "sekret")).await.unwrap();

        let err = create_user(&store, &auth(), request("root", "other"))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("expected `username` to be unique")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn password_policy_runs_first() {
        let store = MemoryStore::new();
        let err = create_user(&store, &auth(), request("ro", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PasswordPolicy(_)));
        assert!(store.list_users().await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn list_expands_blogs() {
        let store = MemoryStore::new();
        let created = create_user(&store, &auth(), request("root", "sekret"))
            .await
            .unwrap();
        let owner = store.find_user_by_username("root").await.unwrap().unwrap();

        let blog = crate::models::Blog {
            id: ObjectId::new(),
            title: "Canonical string reduction".into(),
            author: Some("Edsger W. Dijkstra".into()),
            url: "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html".into(),
            likes: 12,
            user: Some(owner.id),
        };
        store.insert_blog(&blog).await.unwrap();
        store.push_user_blog(owner.id, blog.id).await.unwrap();

        let users = list_users(&store).await.unwrap();
        let json = serde_json::to_value(&users).unwrap();
        assert_eq!(json[0]["id"], created.id);
        assert_eq!(json[0]["blogs"][0]["title"], "Canonical string reduction");
        assert_eq!(json[0]["blogs"][0]["likes"], 12);
    }
}
