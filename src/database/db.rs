//! Database operations for the flashcard service
//!
//! Handles SQLite schema initialization, user accounts, CRUD operations for
//! flashcards, and spaced repetition data. Every flashcard query takes a
//! [`Scope`] so ownership filtering happens in SQL.

use crate::error::{AppError, Result};
use crate::models::{
    Deck, Difficulty, Flashcard, FlashcardUpdate, NewFlashcard, ReviewData, Role, User,
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Which flashcards a query may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only cards owned by this user
    Owner(i64),
    /// Every card (admin)
    Any,
}

impl Scope {
    fn owner(&self) -> Option<i64> {
        match self {
            Scope::Owner(id) => Some(*id),
            Scope::Any => None,
        }
    }
}

const USER_COLUMNS: &str =
    "id, email, password_hash, role, token_version, created_at, updated_at";

const FLASHCARD_SELECT: &str = "SELECT f.id, f.user_id, f.deck, f.front, f.back, f.difficulty,
            f.created_at, f.updated_at, r.ease_factor, r.interval_days, r.repetitions,
            r.next_review_date, r.last_reviewed_at
     FROM flashcards f
     JOIN review_data r ON f.id = r.flashcard_id";

/// Shared handle to the SQLite database
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (or creates) the database file and initializes the schema
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::info!(path = %path.as_ref().display(), "opened database");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock cannot leave SQLite half-written.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    /// Inserts a new account. `email` must already be normalized.
    pub fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let conn = self.conn();
        let inserted = conn.execute(
            "INSERT INTO users (email, password_hash, role, token_version, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?4)",
            params![email, password_hash, role, now.timestamp()],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::DuplicateEmail {
                    email: email.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }
        let id = conn.last_insert_rowid();
        query_user(&conn, id)?.ok_or(AppError::UserNotFound { id })
    }

    pub fn find_user(&self, id: i64) -> Result<Option<User>> {
        query_user(&self.conn(), id)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<rusqlite::Result<Vec<User>>>()?;
        Ok(users)
    }

    pub fn update_user_email(&self, id: i64, email: &str, now: DateTime<Utc>) -> Result<User> {
        let conn = self.conn();
        let updated = conn.execute(
            "UPDATE users SET email = ?1, updated_at = ?2 WHERE id = ?3",
            params![email, now.timestamp(), id],
        );
        match updated {
            Ok(0) => return Err(AppError::UserNotFound { id }),
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::DuplicateEmail {
                    email: email.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }
        query_user(&conn, id)?.ok_or(AppError::UserNotFound { id })
    }

    /// Stores a new password hash and revokes every token issued so far
    pub fn update_user_password(
        &self,
        id: i64,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<User> {
        let conn = self.conn();
        let updated = conn.execute(
            "UPDATE users SET password_hash = ?1, token_version = token_version + 1, updated_at = ?2
             WHERE id = ?3",
            params![password_hash, now.timestamp(), id],
        )?;
        if updated == 0 {
            return Err(AppError::UserNotFound { id });
        }
        query_user(&conn, id)?.ok_or(AppError::UserNotFound { id })
    }

    /// Changes the role and revokes tokens that still carry the old one
    pub fn update_user_role(&self, id: i64, role: Role, now: DateTime<Utc>) -> Result<User> {
        let conn = self.conn();
        let updated = conn.execute(
            "UPDATE users SET role = ?1, token_version = token_version + 1, updated_at = ?2
             WHERE id = ?3",
            params![role, now.timestamp(), id],
        )?;
        if updated == 0 {
            return Err(AppError::UserNotFound { id });
        }
        query_user(&conn, id)?.ok_or(AppError::UserNotFound { id })
    }

    pub fn bump_token_version(&self, id: i64) -> Result<()> {
        let updated = self.conn().execute(
            "UPDATE users SET token_version = token_version + 1 WHERE id = ?1",
            params![id],
        )?;
        if updated == 0 {
            return Err(AppError::UserNotFound { id });
        }
        Ok(())
    }

    /// Deletes a user together with every flashcard and review record they own.
    ///
    /// Runs in a single transaction: either everything is removed or nothing is.
    /// Returns the number of flashcards removed.
    pub fn delete_user_cascade(&self, id: i64) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let exists = tx
            .query_row("SELECT 1 FROM users WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?;
        if exists.is_none() {
            return Err(AppError::UserNotFound { id });
        }

        tx.execute(
            "DELETE FROM review_data
             WHERE flashcard_id IN (SELECT id FROM flashcards WHERE user_id = ?1)",
            params![id],
        )?;
        let cards = tx.execute("DELETE FROM flashcards WHERE user_id = ?1", params![id])?;
        tx.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        tx.commit()?;

        Ok(cards)
    }

    // ------------------------------------------------------------------
    // Flashcards
    // ------------------------------------------------------------------

    /// Adds a flashcard and initializes its review data
    pub fn add_flashcard(
        &self,
        owner: i64,
        card: &NewFlashcard,
        initial_ease: f64,
        now: DateTime<Utc>,
    ) -> Result<Flashcard> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let id = insert_flashcard(
            &tx,
            owner,
            card.deck_name(),
            card.front.trim(),
            card.back.trim(),
            card.difficulty.unwrap_or_default(),
            initial_ease,
            now,
        )?;
        tx.commit()?;
        query_flashcard(&conn, id, Scope::Any)?.ok_or(AppError::FlashcardNotFound { id })
    }

    /// Fetches one flashcard; cards outside `scope` are reported as not found
    pub fn get_flashcard(&self, id: i64, scope: Scope) -> Result<Flashcard> {
        query_flashcard(&self.conn(), id, scope)?.ok_or(AppError::FlashcardNotFound { id })
    }

    /// Lists flashcards in `scope`, optionally limited to one deck
    pub fn list_flashcards(&self, scope: Scope, deck: Option<&str>) -> Result<Vec<Flashcard>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{FLASHCARD_SELECT}
             WHERE (?1 IS NULL OR f.user_id = ?1) AND (?2 IS NULL OR f.deck = ?2)
             ORDER BY f.id"
        ))?;
        let cards = stmt
            .query_map(params![scope.owner(), deck], flashcard_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    /// Retrieves a user's flashcards due for review
    ///
    /// Returns flashcards where next_review_date <= now,
    /// ordered by next_review_date (oldest first).
    pub fn get_flashcards_due_for_review(
        &self,
        owner: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Flashcard>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{FLASHCARD_SELECT}
             WHERE f.user_id = ?1 AND r.next_review_date <= ?2
             ORDER BY r.next_review_date ASC, f.id ASC"
        ))?;
        let cards = stmt
            .query_map(params![owner, now.timestamp()], flashcard_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    pub fn update_flashcard(
        &self,
        id: i64,
        scope: Scope,
        update: &FlashcardUpdate,
        now: DateTime<Utc>,
    ) -> Result<Flashcard> {
        let conn = self.conn();
        let updated = conn.execute(
            "UPDATE flashcards SET
                front = COALESCE(?1, front),
                back = COALESCE(?2, back),
                deck = COALESCE(?3, deck),
                difficulty = COALESCE(?4, difficulty),
                updated_at = ?5
             WHERE id = ?6 AND (?7 IS NULL OR user_id = ?7)",
            params![
                update.front.as_deref().map(str::trim),
                update.back.as_deref().map(str::trim),
                update.deck.as_deref().map(str::trim),
                update.difficulty,
                now.timestamp(),
                id,
                scope.owner(),
            ],
        )?;
        if updated == 0 {
            return Err(AppError::FlashcardNotFound { id });
        }
        query_flashcard(&conn, id, Scope::Any)?.ok_or(AppError::FlashcardNotFound { id })
    }

    pub fn delete_flashcard(&self, id: i64, scope: Scope) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM flashcards WHERE id = ?1 AND (?2 IS NULL OR user_id = ?2)",
            params![id, scope.owner()],
        )?;
        if deleted == 0 {
            return Err(AppError::FlashcardNotFound { id });
        }
        tx.execute(
            "DELETE FROM review_data WHERE flashcard_id = ?1",
            params![id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Applies a review to one flashcard under a single lock.
    ///
    /// `schedule` receives the stored review data and returns the new state.
    pub fn apply_review<F>(&self, id: i64, scope: Scope, schedule: F) -> Result<Flashcard>
    where
        F: FnOnce(&ReviewData) -> ReviewData,
    {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        let mut card = query_flashcard(&tx, id, scope)?.ok_or(AppError::FlashcardNotFound { id })?;
        let next = schedule(&card.review);
        update_review_data(&tx, &next)?;
        tx.commit()?;
        card.review = next;
        Ok(card)
    }

    /// Inserts every card of `deck` for `owner` in one transaction
    pub fn import_deck(
        &self,
        owner: i64,
        deck: &Deck,
        initial_ease: f64,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        for card in &deck.flashcards {
            insert_flashcard(
                &tx,
                owner,
                deck.name.trim(),
                card.front.trim(),
                card.back.trim(),
                card.difficulty,
                initial_ease,
                now,
            )?;
        }
        tx.commit()?;
        Ok(deck.flashcards.len())
    }

    pub fn count_flashcards(&self, owner: i64) -> Result<i64> {
        let count = self.conn().query_row(
            "SELECT COUNT(*) FROM flashcards WHERE user_id = ?1",
            params![owner],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Creates tables for users, flashcards and SM-2 review data
fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
            token_version INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS flashcards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            deck TEXT NOT NULL DEFAULT 'default',
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            difficulty TEXT NOT NULL DEFAULT 'medium',
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )",
        (),
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_flashcards_user_deck ON flashcards (user_id, deck)",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS review_data (
            flashcard_id INTEGER PRIMARY KEY,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 0,
            repetitions INTEGER NOT NULL DEFAULT 0,
            next_review_date INTEGER NOT NULL,
            last_reviewed_at INTEGER,
            FOREIGN KEY (flashcard_id) REFERENCES flashcards(id) ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        role: row.get(3)?,
        token_version: row.get(4)?,
        created_at: from_timestamp(row.get(5)?),
        updated_at: from_timestamp(row.get(6)?),
    })
}

fn flashcard_from_row(row: &Row<'_>) -> rusqlite::Result<Flashcard> {
    let id: i64 = row.get(0)?;
    Ok(Flashcard {
        id,
        user_id: row.get(1)?,
        deck: row.get(2)?,
        front: row.get(3)?,
        back: row.get(4)?,
        difficulty: row.get(5)?,
        created_at: from_timestamp(row.get(6)?),
        updated_at: from_timestamp(row.get(7)?),
        review: ReviewData {
            flashcard_id: id,
            ease_factor: row.get(8)?,
            interval_days: row.get(9)?,
            repetitions: row.get(10)?,
            next_review_date: from_timestamp(row.get(11)?),
            last_reviewed_at: row.get::<_, Option<i64>>(12)?.map(from_timestamp),
        },
    })
}

fn query_user(conn: &Connection, id: i64) -> Result<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

fn query_flashcard(conn: &Connection, id: i64, scope: Scope) -> Result<Option<Flashcard>> {
    let card = conn
        .query_row(
            &format!("{FLASHCARD_SELECT} WHERE f.id = ?1 AND (?2 IS NULL OR f.user_id = ?2)"),
            params![id, scope.owner()],
            flashcard_from_row,
        )
        .optional()?;
    Ok(card)
}

#[allow(clippy::too_many_arguments)]
fn insert_flashcard(
    conn: &Connection,
    owner: i64,
    deck: &str,
    front: &str,
    back: &str,
    difficulty: Difficulty,
    initial_ease: f64,
    now: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO flashcards (user_id, deck, front, back, difficulty, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![owner, deck, front, back, difficulty, now.timestamp()],
    )?;
    let id = conn.last_insert_rowid();

    let review = ReviewData::initial(id, initial_ease, now);
    conn.execute(
        "INSERT INTO review_data (flashcard_id, ease_factor, interval_days, repetitions, next_review_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            review.ease_factor,
            review.interval_days,
            review.repetitions,
            review.next_review_date.timestamp()
        ],
    )?;
    Ok(id)
}

/// Writes the SM-2 state computed for a flashcard after a review
fn update_review_data(conn: &Connection, review_data: &ReviewData) -> Result<()> {
    conn.execute(
        "UPDATE review_data
         SET ease_factor = ?1, interval_days = ?2, repetitions = ?3, next_review_date = ?4,
             last_reviewed_at = ?5
         WHERE flashcard_id = ?6",
        params![
            review_data.ease_factor,
            review_data.interval_days,
            review_data.repetitions,
            review_data.next_review_date.timestamp(),
            review_data.last_reviewed_at.map(|t| t.timestamp()),
            review_data.flashcard_id
        ],
    )?;
    Ok(())
}
