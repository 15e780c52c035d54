//! Repository for the `additional_travelers` table.

use cardex_core::audit::actions;
use cardex_core::intake::FIRST_TRAVELER_NUMBER;
use cardex_core::types::{DbId, Timestamp};
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::client::PassportUpload;
use crate::models::modification_log::CreateModificationLog;
use crate::models::traveler::{CreateTraveler, Traveler};
use crate::repositories::ModificationLogRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, client_id, traveler_number, name, email, phone, age, age_group, \
    relationship, dietary_restrictions, special_notes, has_different_travel, \
    arrival_date, departure_date, flight_number, arrival_time, city_of_arrival, \
    passport_filename, passport_path, passport_uploaded_at, created_at";

/// Provides create and query operations for additional travelers.
pub struct TravelerRepo;

impl TravelerRepo {
    /// Add a traveler to an existing client.
    ///
    /// The traveler is numbered after the client's current highest traveler
    /// (never below 2) regardless of `input.traveler_number`, the client's
    /// party size is kept in step, and a `Traveler Added` log row is written,
    /// all in one transaction. Returns `None` if the client does not exist.
    pub async fn create(
        pool: &SqlitePool,
        client_id: DbId,
        input: &CreateTraveler,
        actor: &str,
    ) -> Result<Option<Traveler>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM clients WHERE id = ?1")
            .bind(client_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let number = next_number_on(&mut tx, client_id).await?;
        let now = Utc::now();
        let traveler = Self::insert(&mut tx, client_id, number, input, now).await?;

        sqlx::query(
            "UPDATE clients SET
                number_of_travelers = (SELECT COUNT(*) FROM additional_travelers
                                       WHERE client_id = ?1) + 1,
                updated_at = ?2
             WHERE id = ?1",
        )
        .bind(client_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let log = CreateModificationLog {
            client_id,
            actor: actor.to_string(),
            action: actions::TRAVELER_ADDED.to_string(),
            field_changed: None,
            old_value: None,
            new_value: Some(format!("Traveler {number}: {}", traveler.name)),
        };
        ModificationLogRepo::insert(&mut tx, &log).await?;

        tx.commit().await?;
        Ok(Some(traveler))
    }

    /// Insert a traveler row on an existing connection (usually a transaction).
    pub(crate) async fn insert(
        conn: &mut SqliteConnection,
        client_id: DbId,
        traveler_number: i64,
        input: &CreateTraveler,
        now: Timestamp,
    ) -> Result<Traveler, sqlx::Error> {
        let query = format!(
            "INSERT INTO additional_travelers
                (client_id, traveler_number, name, email, phone, age, age_group,
                 relationship, dietary_restrictions, special_notes, has_different_travel,
                 arrival_date, departure_date, flight_number, arrival_time,
                 city_of_arrival, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Traveler>(&query)
            .bind(client_id)
            .bind(traveler_number)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.age)
            .bind(&input.age_group)
            .bind(&input.relationship)
            .bind(Json(&input.dietary_restrictions))
            .bind(&input.special_notes)
            .bind(input.has_different_travel)
            .bind(input.arrival_date)
            .bind(input.departure_date)
            .bind(&input.flight_number)
            .bind(&input.arrival_time)
            .bind(&input.city_of_arrival)
            .bind(now)
            .fetch_one(conn)
            .await
    }

    /// Number the next traveler added to `client_id` would receive.
    pub async fn next_number(pool: &SqlitePool, client_id: DbId) -> Result<i64, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        next_number_on(&mut conn, client_id).await
    }

    /// Find a traveler by internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Traveler>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM additional_travelers WHERE id = ?1");
        sqlx::query_as::<_, Traveler>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of additional travelers stored for `client_id`.
    pub async fn count_by_client(pool: &SqlitePool, client_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM additional_travelers WHERE client_id = ?1")
            .bind(client_id)
            .fetch_one(pool)
            .await
    }

    /// List a client's travelers in party order.
    pub async fn list_by_client(
        pool: &SqlitePool,
        client_id: DbId,
    ) -> Result<Vec<Traveler>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM additional_travelers
             WHERE client_id = ?1
             ORDER BY traveler_number ASC"
        );
        sqlx::query_as::<_, Traveler>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Record a passport document for a traveler belonging to `client_id`.
    ///
    /// Returns `None` if no such traveler exists for that client.
    pub async fn attach_passport(
        pool: &SqlitePool,
        client_id: DbId,
        traveler_id: DbId,
        upload: &PassportUpload,
        actor: &str,
    ) -> Result<Option<Traveler>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE additional_travelers SET
                passport_filename = ?3,
                passport_path = ?4,
                passport_uploaded_at = ?5
             WHERE id = ?1 AND client_id = ?2
             RETURNING {COLUMNS}"
        );
        let traveler = sqlx::query_as::<_, Traveler>(&query)
            .bind(traveler_id)
            .bind(client_id)
            .bind(&upload.filename)
            .bind(&upload.path)
            .bind(upload.uploaded_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(traveler) = traveler else {
            return Ok(None);
        };

        let log = CreateModificationLog {
            client_id,
            actor: actor.to_string(),
            action: actions::PASSPORT_UPLOADED.to_string(),
            field_changed: Some(format!("traveler_{}_passport", traveler.traveler_number)),
            old_value: None,
            new_value: Some(upload.filename.clone()),
        };
        ModificationLogRepo::insert(&mut tx, &log).await?;

        tx.commit().await?;
        Ok(Some(traveler))
    }
}

async fn next_number_on(conn: &mut SqliteConnection, client_id: DbId) -> Result<i64, sqlx::Error> {
    let max: Option<i64> = sqlx::query_scalar(
        "SELECT MAX(traveler_number) FROM additional_travelers WHERE client_id = ?1",
    )
    .bind(client_id)
    .fetch_one(conn)
    .await?;
    Ok(max.map_or(FIRST_TRAVELER_NUMBER, |n| (n + 1).max(FIRST_TRAVELER_NUMBER)))
}
