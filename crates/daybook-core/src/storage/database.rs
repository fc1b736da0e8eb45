//! SQLite-based journal storage.
//!
//! Provides persistent storage for:
//! - Users, each created with a zeroed streak row
//! - Journal entries, at most one per user per calendar day
//! - The per-user streak counters maintained on entry creation
//!
//! Entry creation and the streak update share one `BEGIN IMMEDIATE`
//! transaction. SQLite grants the write lock up front, so two writers for the
//! same user cannot both read the pre-update counters.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::{Deserialize, Serialize};

use super::{migrations, Config, StreakConfig};
use crate::error::{DatabaseError, Result};
use crate::stats::ProfileStats;
use crate::streak::{
    format_date, parse_date, HistoricalStreak, StreakCheck, StreakEngine, StreakState,
};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Input for [`Database::create_entry`].
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub date: NaiveDate,
    /// Stored as "Untitled" when absent or blank
    pub title: Option<String>,
    pub content: String,
}

impl NewEntry {
    pub fn new(date: NaiveDate, content: impl Into<String>) -> Self {
        Self {
            date,
            title: None,
            content: content.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Stored counters next to the figures recomputed from entry history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakReport {
    pub today: NaiveDate,
    pub stored: StreakState,
    /// Stored current streak as it displays on `today`
    pub displayed_current: u32,
    pub recomputed: HistoricalStreak,
    pub check: StreakCheck,
}

/// SQLite database for journal storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database configured in `config.toml`
    /// (`~/.config/daybook/daybook.db` by default).
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = Config::load_or_default().database_path()?;
        Self::open_at(&path)
    }

    /// Open (creating if needed) the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // ── users ─────────────────────────────────────────────────────────

    /// Create a user together with a zeroed streak row.
    ///
    /// # Errors
    /// [`DatabaseError::DuplicateUser`] if the name is taken.
    pub fn create_user(&mut self, name: &str) -> Result<User> {
        let created_at = Utc::now();
        let tx = self.conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO users (name, created_at) VALUES (?1, ?2)",
            params![name, created_at.to_rfc3339()],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(DatabaseError::DuplicateUser(name.to_string()).into());
            }
            Err(e) => return Err(e.into()),
        }
        let id = UserId(tx.last_insert_rowid());

        write_streak(&tx, id, &StreakState::new())?;
        tx.commit()?;

        tracing::info!(user_id = %id, user = name, "user created");
        Ok(User {
            id,
            name: name.to_string(),
            created_at,
        })
    }

    pub fn find_user(&self, name: &str) -> Result<Option<User>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM users WHERE name = ?1",
                params![name],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, name, created_at)| -> Result<User> {
            Ok(User {
                id: UserId(id),
                name,
                created_at: decode_timestamp("users", &created_at)?,
            })
        })
        .transpose()
    }

    /// Like [`find_user`](Self::find_user), but a missing user is an error.
    pub fn user(&self, name: &str) -> Result<User> {
        self.find_user(name)?
            .ok_or_else(|| DatabaseError::UserNotFound(name.to_string()).into())
    }

    // ── entries ───────────────────────────────────────────────────────

    /// Record a new entry and advance the user's streak counters for its date.
    ///
    /// Returns the stored entry and the updated streak state.
    ///
    /// # Errors
    /// - [`DatabaseError::UserNotFound`] if the user does not exist.
    /// - [`DatabaseError::DuplicateEntry`] if the user already wrote on that
    ///   date. The counters are left untouched.
    pub fn create_entry(&mut self, user: UserId, entry: NewEntry) -> Result<(Entry, StreakState)> {
        let created_at = Utc::now();
        let title = entry
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("Untitled")
            .to_string();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let state = read_streak(&tx, user)?
            .ok_or_else(|| DatabaseError::UserNotFound(user.to_string()))?;

        let inserted = tx.execute(
            "INSERT INTO entries (user_id, date, title, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.0,
                format_date(entry.date),
                title,
                entry.content,
                created_at.to_rfc3339(),
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(DatabaseError::DuplicateEntry { date: entry.date }.into());
            }
            Err(e) => return Err(e.into()),
        }
        let id = tx.last_insert_rowid();

        let updated = StreakEngine::on_entry_created(&state, entry.date);
        write_streak(&tx, user, &updated)?;
        tx.commit()?;

        tracing::info!(
            user_id = %user,
            date = %entry.date,
            current = updated.current_streak,
            longest = updated.longest_streak,
            "[streak] entry recorded"
        );
        if state.last_date.is_some_and(|last| entry.date < last) {
            tracing::warn!(
                user_id = %user,
                date = %entry.date,
                "[streak] backdated entry; stored streak may diverge from history"
            );
        }

        Ok((
            Entry {
                id,
                user_id: user,
                date: entry.date,
                title,
                content: entry.content,
                created_at,
            },
            updated,
        ))
    }

    /// All entries of a user, newest first.
    pub fn entries(&self, user: UserId) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, title, content, created_at
             FROM entries
             WHERE user_id = ?1
             ORDER BY date DESC",
        )?;
        let rows = stmt.query_map(params![user.0], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, date, title, content, created_at) = row?;
            entries.push(Entry {
                id,
                user_id: user,
                date: decode_date("entries", &date)?,
                title,
                content,
                created_at: decode_timestamp("entries", &created_at)?,
            });
        }
        Ok(entries)
    }

    /// Dates of a user's entries, oldest first.
    pub fn entry_dates(&self, user: UserId) -> Result<Vec<NaiveDate>> {
        read_entry_dates(&self.conn, user)
    }

    /// Remove the user's entry for `date`.
    ///
    /// Streak counters are not touched; they only move on entry creation.
    /// The recomputed figures reflect the deletion on the next read.
    pub fn delete_entry(&self, user: UserId, date: NaiveDate) -> Result<()> {
        let removed = self.conn.execute(
            "DELETE FROM entries WHERE user_id = ?1 AND date = ?2",
            params![user.0, format_date(date)],
        )?;
        if removed == 0 {
            return Err(DatabaseError::EntryNotFound { date }.into());
        }
        tracing::info!(user_id = %user, %date, "entry deleted");
        Ok(())
    }

    // ── streaks ───────────────────────────────────────────────────────

    pub fn streak_state(&self, user: UserId) -> Result<StreakState> {
        Ok(read_streak(&self.conn, user)?
            .ok_or_else(|| DatabaseError::UserNotFound(user.to_string()))?)
    }

    /// Stored counters, recomputed figures and their consistency as of `today`,
    /// read from one snapshot.
    pub fn streak_report(&self, user: UserId, today: NaiveDate) -> Result<StreakReport> {
        let (stored, dates) = self.snapshot(user)?;
        let check = StreakEngine::check_consistency(&stored, &dates, today);
        if let StreakCheck::Diverged { .. } = check {
            tracing::warn!(user_id = %user, %today, ?check, "[streak] stored counters diverge from history");
        }

        Ok(StreakReport {
            today,
            stored,
            displayed_current: stored.displayed_current(today),
            recomputed: StreakEngine::recompute_from_history(dates.iter().copied(), today),
            check,
        })
    }

    /// Profile page statistics as of `today`.
    pub fn profile_stats(
        &self,
        user: UserId,
        today: NaiveDate,
        config: &StreakConfig,
    ) -> Result<ProfileStats> {
        let (stored, dates) = self.snapshot(user)?;
        Ok(ProfileStats::compute_with_source(
            &dates,
            &stored,
            today,
            config.target_days,
            config.source,
        ))
    }

    fn snapshot(&self, user: UserId) -> Result<(StreakState, Vec<NaiveDate>)> {
        let tx = self.conn.unchecked_transaction()?;
        let stored = read_streak(&tx, user)?
            .ok_or_else(|| DatabaseError::UserNotFound(user.to_string()))?;
        let dates = read_entry_dates(&tx, user)?;
        tx.commit()?;
        Ok((stored, dates))
    }
}

fn read_streak(conn: &Connection, user: UserId) -> Result<Option<StreakState>> {
    let row = conn
        .query_row(
            "SELECT last_date, current_streak, longest_streak FROM streaks WHERE user_id = ?1",
            params![user.0],
            |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u32>(2)?,
                ))
            },
        )
        .optional()?;

    row.map(|(last_date, current_streak, longest_streak)| -> Result<StreakState> {
        Ok(StreakState {
            last_date: last_date
                .map(|raw| decode_date("streaks", &raw))
                .transpose()?,
            current_streak,
            longest_streak,
        })
    })
    .transpose()
}

fn write_streak(conn: &Connection, user: UserId, state: &StreakState) -> Result<()> {
    conn.execute(
        "INSERT INTO streaks (user_id, last_date, current_streak, longest_streak)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
             last_date = excluded.last_date,
             current_streak = excluded.current_streak,
             longest_streak = excluded.longest_streak",
        params![
            user.0,
            state.last_date.map(format_date),
            state.current_streak,
            state.longest_streak,
        ],
    )?;
    Ok(())
}

fn read_entry_dates(conn: &Connection, user: UserId) -> Result<Vec<NaiveDate>> {
    let mut stmt =
        conn.prepare("SELECT date FROM entries WHERE user_id = ?1 ORDER BY date ASC")?;
    let rows = stmt.query_map(params![user.0], |row| row.get::<_, String>(0))?;

    let mut dates = Vec::new();
    for row in rows {
        dates.push(decode_date("entries", &row?)?);
    }
    Ok(dates)
}

fn decode_date(table: &str, raw: &str) -> Result<NaiveDate, DatabaseError> {
    parse_date(raw).map_err(|e| DatabaseError::Corrupt {
        table: table.to_string(),
        message: e.to_string(),
    })
}

fn decode_timestamp(table: &str, raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::Corrupt {
            table: table.to_string(),
            message: format!("bad timestamp '{raw}': {e}"),
        })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
