//! User accounts: creation with input validation, credential checks,
//! credit counters, and the admin flag.

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use super::{parse_timestamp, Result, Store, StoreError};

/// Iterations of the password hash; salted to defeat rainbow tables
const HASH_ROUNDS: u32 = 100_000;

/// A user record as exposed by the store; the password hash never
/// leaves this module
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub username: String,
    pub email: String,
    pub name: String,
    pub credits: i64,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Input for account creation
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub credits: i64,
    pub is_admin: bool,
}

impl<'a> NewUser<'a> {
    /// New account with the default credit allowance
    pub fn new(username: &'a str, password: &'a str, email: &'a str, name: &'a str) -> Self {
        Self {
            username,
            password,
            email,
            name,
            credits: 5,
            is_admin: false,
        }
    }
}

impl Store {
    /// Creates a new user after validating username, email and password
    ///
    /// Usernames are unique case-insensitively; the original case is
    /// kept for display.
    pub fn create_user(&self, user: &NewUser<'_>) -> Result<()> {
        validate_username(user.username)?;
        validate_email(user.email)?;
        validate_password(user.password)?;

        let exists: Option<String> = self
            .conn()
            .query_row(
                "SELECT username FROM users WHERE username_lower = ?1",
                params![user.username.to_lowercase()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(StoreError::UserExists(user.username.to_string()));
        }

        self.conn().execute(
            "INSERT INTO users
                 (username, username_lower, password_hash, email, name,
                  credits, is_admin, created_at, last_login)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL)",
            params![
                user.username,
                user.username.to_lowercase(),
                hash_password(user.password),
                user.email,
                user.name,
                user.credits,
                user.is_admin,
                Utc::now().to_rfc3339(),
            ],
        )?;
        info!(username = user.username, "user created");
        Ok(())
    }

    /// Verifies credentials; on success updates last-login and returns
    /// the record. Unknown user and wrong password both yield `None`.
    pub fn verify_user(&self, username: &str, password: &str) -> Result<Option<UserRecord>> {
        let row: Option<(String, String)> = self
            .conn()
            .query_row(
                "SELECT username, password_hash FROM users WHERE username_lower = ?1",
                params![username.to_lowercase()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((username, hash)) = row else {
            return Ok(None);
        };
        if !verify_password(password, &hash) {
            return Ok(None);
        }

        self.conn().execute(
            "UPDATE users SET last_login = ?1 WHERE username_lower = ?2",
            params![Utc::now().to_rfc3339(), username.to_lowercase()],
        )?;
        self.get_user(&username)
    }

    /// Looks a user up case-insensitively
    pub fn get_user(&self, username: &str) -> Result<Option<UserRecord>> {
        self.conn()
            .query_row(
                "SELECT username, email, name, credits, is_admin, created_at, last_login
                 FROM users WHERE username_lower = ?1",
                params![username.to_lowercase()],
                map_user_row,
            )
            .optional()?
            .map(finish_user_row)
            .transpose()
    }

    /// Sets the user's credit balance
    pub fn update_credits(&self, username: &str, credits: i64) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET credits = ?1 WHERE username_lower = ?2",
            params![credits, username.to_lowercase()],
        )?;
        if rows == 0 {
            return Err(StoreError::UserNotFound(username.to_string()));
        }
        info!(username, credits, "credits updated");
        Ok(())
    }

    /// Replaces the user's password after strength validation
    pub fn set_password(&self, username: &str, password: &str) -> Result<()> {
        validate_password(password)?;
        let rows = self.conn().execute(
            "UPDATE users SET password_hash = ?1 WHERE username_lower = ?2",
            params![hash_password(password), username.to_lowercase()],
        )?;
        if rows == 0 {
            return Err(StoreError::UserNotFound(username.to_string()));
        }
        Ok(())
    }

    pub fn set_admin(&self, username: &str, is_admin: bool) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET is_admin = ?1 WHERE username_lower = ?2",
            params![is_admin, username.to_lowercase()],
        )?;
        if rows == 0 {
            return Err(StoreError::UserNotFound(username.to_string()));
        }
        Ok(())
    }

    /// Lists all users ordered by creation time
    pub fn list_users(&self) -> Result<Vec<UserRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT username, email, name, credits, is_admin, created_at, last_login
             FROM users ORDER BY created_at",
        )?;
        let rows = stmt.query_map([], map_user_row)?;
        rows.map(|r| finish_user_row(r?)).collect()
    }

    pub fn delete_user(&self, username: &str) -> Result<()> {
        let rows = self.conn().execute(
            "DELETE FROM users WHERE username_lower = ?1",
            params![username.to_lowercase()],
        )?;
        if rows == 0 {
            return Err(StoreError::UserNotFound(username.to_string()));
        }
        info!(username, "user deleted");
        Ok(())
    }
}

/// Raw user row before timestamp parsing
type UserRow = (String, String, String, i64, bool, String, Option<String>);

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn finish_user_row(row: UserRow) -> Result<UserRecord> {
    let (username, email, name, credits, is_admin, created_at, last_login) = row;
    Ok(UserRecord {
        username,
        email,
        name,
        credits,
        is_admin,
        created_at: parse_timestamp(&created_at)?,
        last_login: last_login.as_deref().map(parse_timestamp).transpose()?,
    })
}

// ── Passwords ──

/// Salted, iterated SHA-256; stored as `hex(salt)$hex(digest)`
fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::rng().fill(&mut salt);
    format!("{}${}", hex::encode(salt), hex::encode(digest(password, &salt)))
}

fn digest(password: &str, salt: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let mut out: [u8; 32] = hasher.finalize().into();
    for _ in 1..HASH_ROUNDS {
        out = Sha256::digest(out).into();
    }
    out
}

fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
        return false;
    };
    // Fixed-time comparison over the full digest
    let actual = digest(password, &salt);
    expected.len() == actual.len()
        && expected
            .iter()
            .zip(actual.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

// ── Input validation ──

fn validate_username(username: &str) -> Result<()> {
    if username.chars().count() < 4 {
        return Err(StoreError::Invalid(
            "username must be at least 4 characters long".into(),
        ));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StoreError::Invalid(
            "username must contain only letters and numbers".into(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && local
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        }
        None => false,
    };
    if !valid {
        return Err(StoreError::Invalid(format!("invalid email address: {email}")));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < 12 {
        return Err(StoreError::Invalid(
            "password must be at least 12 characters long".into(),
        ));
    }
    let checks: [(&str, fn(char) -> bool); 4] = [
        ("password must contain at least one uppercase letter", |c| {
            c.is_ascii_uppercase()
        }),
        ("password must contain at least one lowercase letter", |c| {
            c.is_ascii_lowercase()
        }),
        ("password must contain at least one number", |c| {
            c.is_ascii_digit()
        }),
        ("password must contain at least one special character", |c| {
            "!@#$%^&*(),.?\":{}|<>".contains(c)
        }),
    ];
    for (message, check) in checks {
        if !password.chars().any(check) {
            return Err(StoreError::Invalid(message.into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GOOD_PASSWORD: &str = "Correct.Horse.99";

    fn test_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("planwright.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_create_and_get_user() {
        let (_dir, store) = test_store();
        store
            .create_user(&NewUser::new("alice", GOOD_PASSWORD, "a@example.com", "Alice"))
            .unwrap();

        let user = store.get_user("alice").unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.credits, 5);
        assert!(!user.is_admin);
        assert!(user.last_login.is_none());
    }

    #[test]
    fn test_usernames_unique_case_insensitively() {
        let (_dir, store) = test_store();
        store
            .create_user(&NewUser::new("Alice", GOOD_PASSWORD, "a@example.com", "Alice"))
            .unwrap();
        let err = store
            .create_user(&NewUser::new("ALICE", GOOD_PASSWORD, "b@example.com", "Alice"))
            .unwrap_err();
        assert!(matches!(err, StoreError::UserExists(_)));
        // Lookup is case-insensitive; display case is preserved
        assert_eq!(store.get_user("alice").unwrap().unwrap().username, "Alice");
    }

    #[test]
    fn test_verify_user() {
        let (_dir, store) = test_store();
        store
            .create_user(&NewUser::new("bob", GOOD_PASSWORD, "b@example.com", "Bob"))
            .unwrap();

        assert!(store.verify_user("bob", "wrong-Password-1!").unwrap().is_none());
        assert!(store.verify_user("nobody", GOOD_PASSWORD).unwrap().is_none());

        let user = store.verify_user("BOB", GOOD_PASSWORD).unwrap().unwrap();
        assert_eq!(user.username, "bob");
        assert!(user.last_login.is_some());
    }

    #[test]
    fn test_credit_arithmetic() {
        let (_dir, store) = test_store();
        store
            .create_user(&NewUser::new("carl", GOOD_PASSWORD, "c@example.com", "Carl"))
            .unwrap();
        store.update_credits("carl", 4).unwrap();
        assert_eq!(store.get_user("carl").unwrap().unwrap().credits, 4);

        let err = store.update_credits("ghost", 1).unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound(_)));
    }

    #[test]
    fn test_set_password_and_reverify() {
        let (_dir, store) = test_store();
        store
            .create_user(&NewUser::new("dave", GOOD_PASSWORD, "d@example.com", "Dave"))
            .unwrap();
        store.set_password("dave", "Another-Pass-22!").unwrap();
        assert!(store.verify_user("dave", GOOD_PASSWORD).unwrap().is_none());
        assert!(store.verify_user("dave", "Another-Pass-22!").unwrap().is_some());
    }

    #[test]
    fn test_delete_user() {
        let (_dir, store) = test_store();
        store
            .create_user(&NewUser::new("erin", GOOD_PASSWORD, "e@example.com", "Erin"))
            .unwrap();
        store.delete_user("ERIN").unwrap();
        assert!(store.get_user("erin").unwrap().is_none());
        assert!(matches!(
            store.delete_user("erin").unwrap_err(),
            StoreError::UserNotFound(_)
        ));
    }

    #[test]
    fn test_list_users_excludes_hashes() {
        let (_dir, store) = test_store();
        store
            .create_user(&NewUser::new("fred", GOOD_PASSWORD, "f@example.com", "Fred"))
            .unwrap();
        let listed = store.list_users().unwrap();
        assert_eq!(listed.len(), 1);
        // The exposed record type carries no hash field at all; make
        // sure the serialized form doesn't either
        let json = serde_json::to_string(&listed[0]).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn test_input_validation() {
        assert!(validate_username("abc").is_err());
        assert!(validate_username("ab cd").is_err());
        assert!(validate_username("abcd1").is_ok());

        assert!(validate_email("nope").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@b.co").is_ok());

        assert!(validate_password("short1!").is_err());
        assert!(validate_password("alllowercase1!aa").is_err());
        assert!(validate_password("NOUPPERMISSING??").is_err());
        assert!(validate_password("NoDigitsHere!!!!").is_err());
        assert!(validate_password("NoSpecials1234aa").is_err());
        assert!(validate_password(GOOD_PASSWORD).is_ok());
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let a = hash_password("Same-Password-1!");
        let b = hash_password("Same-Password-1!");
        assert_ne!(a, b);
        assert!(verify_password("Same-Password-1!", &a));
        assert!(verify_password("Same-Password-1!", &b));
        assert!(!verify_password("Other-Password-1!", &a));
        assert!(!verify_password("Same-Password-1!", "garbage"));
    }
}
