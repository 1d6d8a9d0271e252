//! Account operations on top of the user store: hashing, uniqueness,
//! credential checks and the OAuth/admin bootstrap paths.

use uuid::Uuid;

use crate::config::{AdminCredential, AdminSeed};
use crate::db::models::{NewUser, Role, User, UserChanges, UserRow};
use crate::db::{StoreError, UserStore};
use crate::error::{AppError, AppResult};

/// Returned for every failed sign-in, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// bcrypt is CPU-bound; keep it off the async workers.
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hash task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("failed to hash password: {}", e)))
}

pub async fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            false
        }
        Err(e) => {
            tracing::error!("spawn_blocking panic during verify: {}", e);
            false
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub role: Role,
}

/// Only `Some` fields change. An empty password keeps the stored hash.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
}

pub async fn create_user(
    users: &dyn UserStore,
    input: CreateAccount,
    bcrypt_cost: u32,
) -> AppResult<User> {
    let email = input.email.trim().to_string();
    if email.is_empty() || input.password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    if users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(&input.password, bcrypt_cost).await?;
    let row = users
        .create(NewUser {
            email,
            password_hash: Some(password_hash),
            name: input.name.filter(|n| !n.trim().is_empty()),
            role: input.role,
        })
        .await?;

    tracing::info!(user_id = %row.id, role = %row.role, "User created");
    Ok(row.into())
}

pub async fn update_user(
    users: &dyn UserStore,
    id: Uuid,
    input: UpdateAccount,
    bcrypt_cost: u32,
) -> AppResult<User> {
    let email = input
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());
    if let Some(email) = &email {
        if !email.contains('@') {
            return Err(AppError::Validation("Invalid email format".to_string()));
        }
        if let Some(other) = users.find_by_email(email).await? {
            if other.id != id {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }
        }
    }

    let password_hash = match input.password.filter(|p| !p.is_empty()) {
        Some(password) => Some(hash_password(&password, bcrypt_cost).await?),
        None => None,
    };

    let row = users
        .update(
            id,
            UserChanges {
                email,
                password_hash,
                name: input.name,
                role: input.role,
            },
        )
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AppError::NotFound("User not found".to_string()),
            other => other.into(),
        })?;

    tracing::info!(user_id = %row.id, "User updated");
    Ok(row.into())
}

/// Refuses to delete the account that is making the request.
pub async fn delete_user(users: &dyn UserStore, id: Uuid, acting_user: Uuid) -> AppResult<()> {
    if id == acting_user {
        return Err(AppError::Forbidden(
            "You cannot delete your own account".to_string(),
        ));
    }
    users.delete(id).await.map_err(|e| match e {
        StoreError::NotFound => AppError::NotFound("User not found".to_string()),
        other => other.into(),
    })?;
    tracing::info!(user_id = %id, "User deleted");
    Ok(())
}

pub async fn list_users(users: &dyn UserStore) -> AppResult<Vec<User>> {
    Ok(users.list().await?.into_iter().map(User::from).collect())
}

/// Email + password check. Unknown email, passwordless (OAuth-only) account
/// and wrong password are indistinguishable to the caller.
pub async fn authenticate(users: &dyn UserStore, email: &str, password: &str) -> AppResult<User> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let row: Option<UserRow> = users.find_by_email(email).await?;
    let Some(row) = row else {
        tracing::warn!("Login failed: unknown account");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };
    let Some(hash) = row.password.as_deref() else {
        tracing::warn!(user_id = %row.id, "Login failed: account has no password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };
    if !verify_password(password, hash).await {
        tracing::warn!(user_id = %row.id, "Login failed: wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    Ok(row.into())
}

/// Account for an OAuth sign-in. Existing accounts keep their role.
pub async fn find_or_create_oauth(
    users: &dyn UserStore,
    email: &str,
    name: Option<String>,
) -> AppResult<User> {
    if let Some(existing) = users.find_by_email(email).await? {
        return Ok(existing.into());
    }

    match users
        .create(NewUser {
            email: email.to_string(),
            password_hash: None,
            name,
            role: Role::User,
        })
        .await
    {
        Ok(row) => {
            tracing::info!(user_id = %row.id, "Account created from OAuth sign-in");
            Ok(row.into())
        }
        // Lost a race with a concurrent sign-in for the same email.
        Err(StoreError::Conflict(_)) => users
            .find_by_email(email)
            .await?
            .map(User::from)
            .ok_or_else(|| AppError::Internal("account vanished after conflict".to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Creates the configured admin account if it does not exist yet. With
/// `seed.reset`, an existing account gets the configured credential and the
/// ADMIN role back instead of being left alone.
pub async fn ensure_admin(
    users: &dyn UserStore,
    seed: &AdminSeed,
    bcrypt_cost: u32,
) -> AppResult<()> {
    let existing = users.find_by_email(&seed.email).await?;
    if existing.is_some() && !seed.reset {
        tracing::debug!("Admin account already present");
        return Ok(());
    }

    let password_hash = match &seed.credential {
        AdminCredential::Hash(hash) => hash.clone(),
        AdminCredential::Plain(plain) => hash_password(plain, bcrypt_cost).await?,
    };

    if let Some(row) = existing {
        users
            .update(
                row.id,
                UserChanges {
                    password_hash: Some(password_hash),
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            )
            .await?;
        tracing::warn!(
            user_id = %row.id,
            "Admin credential reset from ADMIN_RESET_PASSWORD; unset it after signing in"
        );
        return Ok(());
    }

    users
        .create(NewUser {
            email: seed.email.clone(),
            password_hash: Some(password_hash),
            name: Some("Admin".to_string()),
            role: Role::Admin,
        })
        .await?;

    tracing::info!("Admin account created from ADMIN_EMAIL");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    const COST: u32 = 4;

    fn account(email: &str) -> CreateAccount {
        CreateAccount {
            email: email.to_string(),
            password: "hunter22".to_string(),
            name: Some("Jane".to_string()),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_create_then_list_hides_password() {
        let store = MemoryStore::new();
        create_user(&store, account("jane@example.com"), COST)
            .await
            .unwrap();

        let listed = list_users(&store).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].email, "jane@example.com");
        assert_eq!(listed[0].role, Role::User);

        let json = serde_json::to_value(&listed).unwrap();
        assert!(json[0].get("password").is_none());

        let row = store.find_by_email("jane@example.com").await.unwrap().unwrap();
        assert_ne!(row.password.as_deref(), Some("hunter22"));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_and_keeps_original() {
        let store = MemoryStore::new();
        create_user(&store, account("jane@example.com"), COST)
            .await
            .unwrap();

        let mut dup = account("JANE@example.com");
        dup.name = Some("Impostor".to_string());
        let err = create_user(&store, dup, COST).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let listed = list_users(&store).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name.as_deref(), Some("Jane"));
    }

    #[tokio::test]
    async fn test_self_delete_forbidden_other_delete_removes_one() {
        let store = MemoryStore::new();
        let me = create_user(&store, account("me@example.com"), COST)
            .await
            .unwrap();
        let other = create_user(&store, account("other@example.com"), COST)
            .await
            .unwrap();

        let err = delete_user(&store, me.id, me.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(list_users(&store).await.unwrap().len(), 2);

        delete_user(&store, other.id, me.id).await.unwrap();
        let listed = list_users(&store).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, me.id);

        let err = delete_user(&store, other.id, me.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_empty_password_keeps_hash() {
        let store = MemoryStore::new();
        let user = create_user(&store, account("jane@example.com"), COST)
            .await
            .unwrap();
        let before = store.find_by_id(user.id).await.unwrap().unwrap().password;

        let updated = update_user(
            &store,
            user.id,
            UpdateAccount {
                password: Some(String::new()),
                role: Some(Role::Admin),
                ..Default::default()
            },
            COST,
        )
        .await
        .unwrap();
        assert_eq!(updated.role, Role::Admin);

        let after = store.find_by_id(user.id).await.unwrap().unwrap().password;
        assert_eq!(before, after);
        assert!(authenticate(&store, "jane@example.com", "hunter22").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_password_rehashes() {
        let store = MemoryStore::new();
        let user = create_user(&store, account("jane@example.com"), COST)
            .await
            .unwrap();

        update_user(
            &store,
            user.id,
            UpdateAccount {
                password: Some("new-secret".to_string()),
                ..Default::default()
            },
            COST,
        )
        .await
        .unwrap();

        assert!(authenticate(&store, "jane@example.com", "hunter22").await.is_err());
        assert!(authenticate(&store, "jane@example.com", "new-secret").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_email_taken_by_other_conflicts() {
        let store = MemoryStore::new();
        let jane = create_user(&store, account("jane@example.com"), COST)
            .await
            .unwrap();
        create_user(&store, account("john@example.com"), COST)
            .await
            .unwrap();

        let err = update_user(
            &store,
            jane.id,
            UpdateAccount {
                email: Some("john@example.com".to_string()),
                ..Default::default()
            },
            COST,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = update_user(&store, Uuid::new_v4(), UpdateAccount::default(), COST)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_uniform() {
        let store = MemoryStore::new();
        create_user(&store, account("jane@example.com"), COST)
            .await
            .unwrap();
        find_or_create_oauth(&store, "oauth@example.com", None)
            .await
            .unwrap();

        for (email, password) in [
            ("nobody@example.com", "hunter22"),
            ("jane@example.com", "wrong"),
            ("oauth@example.com", "anything"),
        ] {
            match authenticate(&store, email, password).await {
                Err(AppError::Unauthorized(msg)) => assert_eq!(msg, INVALID_CREDENTIALS),
                other => panic!("unexpected {:?}", other),
            }
        }

        let user = authenticate(&store, "Jane@Example.com", "hunter22")
            .await
            .unwrap();
        assert_eq!(user.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_oauth_keeps_existing_role() {
        let store = MemoryStore::new();
        let mut admin = account("admin@example.com");
        admin.role = Role::Admin;
        create_user(&store, admin, COST).await.unwrap();

        let existing = find_or_create_oauth(&store, "admin@example.com", None)
            .await
            .unwrap();
        assert_eq!(existing.role, Role::Admin);

        let fresh = find_or_create_oauth(&store, "new@example.com", Some("New".into()))
            .await
            .unwrap();
        assert_eq!(fresh.role, Role::User);
        assert_eq!(list_users(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let store = MemoryStore::new();
        let seed = AdminSeed {
            email: "admin@example.com".to_string(),
            credential: AdminCredential::Plain("s3cret".to_string()),
            reset: false,
        };

        ensure_admin(&store, &seed, COST).await.unwrap();
        ensure_admin(&store, &seed, COST).await.unwrap();

        let listed = list_users(&store).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].role, Role::Admin);
        assert!(authenticate(&store, "admin@example.com", "s3cret").await.is_ok());
    }

    #[tokio::test]
    async fn test_ensure_admin_reset_replaces_password_and_role() {
        let store = MemoryStore::new();
        let mut seed = AdminSeed {
            email: "admin@example.com".to_string(),
            credential: AdminCredential::Plain("old-pass".to_string()),
            reset: false,
        };
        ensure_admin(&store, &seed, COST).await.unwrap();
        let admin = store.find_by_email("admin@example.com").await.unwrap().unwrap();
        store
            .update(
                admin.id,
                UserChanges {
                    role: Some(Role::User),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Without the flag a changed password in the environment is ignored.
        seed.credential = AdminCredential::Plain("new-pass".to_string());
        ensure_admin(&store, &seed, COST).await.unwrap();
        assert!(authenticate(&store, "admin@example.com", "new-pass").await.is_err());

        seed.reset = true;
        ensure_admin(&store, &seed, COST).await.unwrap();

        let user = authenticate(&store, "admin@example.com", "new-pass").await.unwrap();
        assert_eq!(user.id, admin.id);
        assert_eq!(user.role, Role::Admin);
        assert!(authenticate(&store, "admin@example.com", "old-pass").await.is_err());
        assert_eq!(list_users(&store).await.unwrap().len(), 1);
    }
}
