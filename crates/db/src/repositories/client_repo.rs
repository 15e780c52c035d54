//! Repository for the `clients` table.

use cardex_core::audit::{self, actions, SYSTEM_ACTOR, TRACKED_FIELDS};
use cardex_core::client::ClientStatus;
use cardex_core::pagination;
use cardex_core::types::{DbId, Timestamp};
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};

use crate::models::client::{
    Client, ClientFilter, ClientListItem, CreateClient, PassportUpload, UpdateClient,
};
use crate::models::modification_log::CreateModificationLog;
use crate::models::traveler::{CreateTraveler, Traveler};
use crate::repositories::{ModificationLogRepo, TravelerRepo};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, full_name, email, phone, age, number_of_travelers, group_type, \
    occasion_description, arrival_date, departure_date, flight_number, arrival_time, \
    city_of_arrival, dietary_restrictions, accessibility_needs, preferred_language, \
    custom_activities, food_preferences, additional_inquiries, gdpr_consent, status, \
    passport_filename, passport_path, passport_uploaded_at, created_at, updated_at";

/// Correlated count appended to list queries.
const TRAVELER_COUNT: &str = "\
    (SELECT COUNT(*) FROM additional_travelers t WHERE t.client_id = clients.id) \
    AS traveler_count";

// ---------------------------------------------------------------------------
// ClientRepo
// ---------------------------------------------------------------------------

/// Provides create, query and audited update operations for clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Insert a client on its own, returning the created row (status `Pending`).
    pub async fn create(pool: &SqlitePool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        insert_client(&mut conn, input, Utc::now()).await
    }

    /// Insert a client, its additional travelers and a `Created` log entry
    /// in one transaction. Any failure leaves nothing behind.
    pub async fn create_with_travelers(
        pool: &SqlitePool,
        input: &CreateClient,
        travelers: &[CreateTraveler],
    ) -> Result<(Client, Vec<Traveler>), sqlx::Error> {
        let mut tx = pool.begin().await?;
        let now = Utc::now();

        let client = insert_client(&mut tx, input, now).await?;

        let mut created = Vec::with_capacity(travelers.len());
        for traveler in travelers {
            let row =
                TravelerRepo::insert(&mut tx, client.id, traveler.traveler_number, traveler, now)
                    .await?;
            created.push(row);
        }

        let log = CreateModificationLog {
            client_id: client.id,
            actor: SYSTEM_ACTOR.to_string(),
            action: actions::CREATED.to_string(),
            field_changed: None,
            old_value: None,
            new_value: Some(client.status.clone()),
        };
        ModificationLogRepo::insert(&mut tx, &log).await?;

        tx.commit().await?;
        Ok((client, created))
    }

    /// Find a client by internal ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients WHERE id = ?1");
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of clients matching `filter`, newest first, plus the total
    /// number of matches across all pages.
    ///
    /// `page` is 1-indexed; callers clamp both arguments beforehand.
    pub async fn list(
        pool: &SqlitePool,
        filter: &ClientFilter,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<ClientListItem>, i64), sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_client_filter(filter);

        let query = format!(
            "SELECT {COLUMNS}, {TRAVELER_COUNT} FROM clients {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ?{bind_idx} OFFSET ?{}",
            bind_idx + 1
        );
        let items = bind_client_values(sqlx::query_as::<_, ClientListItem>(&query), &bind_values)
            .bind(per_page)
            .bind(pagination::offset(page, per_page))
            .fetch_all(pool)
            .await?;

        let total = Self::count(pool, filter).await?;
        Ok((items, total))
    }

    /// Count clients matching `filter`.
    pub async fn count(pool: &SqlitePool, filter: &ClientFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_client_filter(filter);
        let query = format!("SELECT COUNT(*) FROM clients {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for val in &bind_values {
            q = match val {
                BindValue::Text(v) => q.bind(v.as_str()),
                BindValue::Date(v) => q.bind(*v),
            };
        }
        q.fetch_one(pool).await
    }

    /// Every client matching `filter`, newest first (CSV export).
    pub async fn list_all(
        pool: &SqlitePool,
        filter: &ClientFilter,
    ) -> Result<Vec<ClientListItem>, sqlx::Error> {
        let (where_clause, bind_values, _) = build_client_filter(filter);
        let query = format!(
            "SELECT {COLUMNS}, {TRAVELER_COUNT} FROM clients {where_clause} \
             ORDER BY created_at DESC, id DESC"
        );
        bind_client_values(sqlx::query_as::<_, ClientListItem>(&query), &bind_values)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. Only non-`None` fields in `input` are applied
    /// and `updated_at` is always bumped.
    ///
    /// When `actor` is given, a status change appends one `Status Change`
    /// entry and each other tracked field that changed appends an `Updated`
    /// entry, in the same transaction as the update.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        input: &UpdateClient,
        actor: Option<&str>,
    ) -> Result<Option<Client>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select = format!("SELECT {COLUMNS} FROM clients WHERE id = ?1");
        let before = sqlx::query_as::<_, Client>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(before) = before else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE clients SET
                full_name = COALESCE(?2, full_name),
                email = COALESCE(?3, email),
                phone = COALESCE(?4, phone),
                number_of_travelers = COALESCE(?5, number_of_travelers),
                group_type = COALESCE(?6, group_type),
                occasion_description = COALESCE(?7, occasion_description),
                arrival_date = COALESCE(?8, arrival_date),
                departure_date = COALESCE(?9, departure_date),
                flight_number = COALESCE(?10, flight_number),
                arrival_time = COALESCE(?11, arrival_time),
                city_of_arrival = COALESCE(?12, city_of_arrival),
                preferred_language = COALESCE(?13, preferred_language),
                custom_activities = COALESCE(?14, custom_activities),
                food_preferences = COALESCE(?15, food_preferences),
                additional_inquiries = COALESCE(?16, additional_inquiries),
                status = COALESCE(?17, status),
                updated_at = ?18,
                search_text = ?19
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        let after = sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.number_of_travelers)
            .bind(&input.group_type)
            .bind(&input.occasion_description)
            .bind(input.arrival_date)
            .bind(input.departure_date)
            .bind(&input.flight_number)
            .bind(&input.arrival_time)
            .bind(&input.city_of_arrival)
            .bind(&input.preferred_language)
            .bind(&input.custom_activities)
            .bind(&input.food_preferences)
            .bind(&input.additional_inquiries)
            .bind(&input.status)
            .bind(Utc::now())
            .bind(pagination::search_key(
                input.full_name.as_deref().unwrap_or(&before.full_name),
                input.email.as_deref().unwrap_or(&before.email),
                input.phone.as_deref().unwrap_or(&before.phone),
            ))
            .fetch_one(&mut *tx)
            .await?;

        if let Some(actor) = actor {
            for entry in change_log_entries(&before, &after, actor) {
                ModificationLogRepo::insert(&mut tx, &entry).await?;
            }
        }

        tx.commit().await?;
        Ok(Some(after))
    }

    /// Record the client's passport document and log the upload.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn attach_passport(
        pool: &SqlitePool,
        id: DbId,
        upload: &PassportUpload,
        actor: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE clients SET
                passport_filename = ?2,
                passport_path = ?3,
                passport_uploaded_at = ?4,
                updated_at = ?4
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        let client = sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(&upload.filename)
            .bind(&upload.path)
            .bind(upload.uploaded_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(client) = client else {
            return Ok(None);
        };

        let log = CreateModificationLog {
            client_id: id,
            actor: actor.to_string(),
            action: actions::PASSPORT_UPLOADED.to_string(),
            field_changed: Some("passport".to_string()),
            old_value: None,
            new_value: Some(upload.filename.clone()),
        };
        ModificationLogRepo::insert(&mut tx, &log).await?;

        tx.commit().await?;
        Ok(Some(client))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_client(
    conn: &mut SqliteConnection,
    input: &CreateClient,
    now: Timestamp,
) -> Result<Client, sqlx::Error> {
    let query = format!(
        "INSERT INTO clients
            (full_name, email, phone, age, number_of_travelers, group_type,
             occasion_description, arrival_date, departure_date, flight_number,
             arrival_time, city_of_arrival, dietary_restrictions, accessibility_needs,
             preferred_language, custom_activities, food_preferences,
             additional_inquiries, gdpr_consent, status, created_at, updated_at,
             search_text)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                 ?16, ?17, ?18, ?19, ?20, ?21, ?21, ?22)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Client>(&query)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(input.age)
        .bind(input.number_of_travelers)
        .bind(&input.group_type)
        .bind(&input.occasion_description)
        .bind(input.arrival_date)
        .bind(input.departure_date)
        .bind(&input.flight_number)
        .bind(&input.arrival_time)
        .bind(&input.city_of_arrival)
        .bind(Json(&input.dietary_restrictions))
        .bind(Json(&input.accessibility_needs))
        .bind(&input.preferred_language)
        .bind(&input.custom_activities)
        .bind(&input.food_preferences)
        .bind(&input.additional_inquiries)
        .bind(input.gdpr_consent)
        .bind(ClientStatus::default().as_str())
        .bind(now)
        .bind(pagination::search_key(&input.full_name, &input.email, &input.phone))
        .fetch_one(conn)
        .await
}

/// Log rows describing how `before` became `after`, status first.
fn change_log_entries(before: &Client, after: &Client, actor: &str) -> Vec<CreateModificationLog> {
    let mut entries = Vec::new();

    if before.status != after.status {
        entries.push(CreateModificationLog {
            client_id: after.id,
            actor: actor.to_string(),
            action: actions::STATUS_CHANGE.to_string(),
            field_changed: Some("status".to_string()),
            old_value: Some(before.status.clone()),
            new_value: Some(after.status.clone()),
        });
    }

    for &field in TRACKED_FIELDS {
        let change =
            audit::diff_field(field, before.tracked_value(field), after.tracked_value(field));
        if let Some(change) = change {
            entries.push(CreateModificationLog {
                client_id: after.id,
                actor: actor.to_string(),
                action: actions::UPDATED.to_string(),
                field_changed: Some(change.field.to_string()),
                old_value: change.old_value,
                new_value: change.new_value,
            });
        }
    }

    entries
}

/// A typed bind value for dynamic filter queries.
enum BindValue {
    Text(String),
    Date(NaiveDate),
}

/// Build the WHERE clause for a client filter.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
fn build_client_filter(filter: &ClientFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(pattern) = filter
        .search
        .as_deref()
        .and_then(pagination::search_pattern)
    {
        conditions.push(format!("search_text LIKE ?{bind_idx} ESCAPE '\\'"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(pattern));
    }

    if let Some(ref status) = filter.status {
        conditions.push(format!("status = ?{bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(status.clone()));
    }

    if let Some(ref group_type) = filter.group_type {
        conditions.push(format!("group_type = ?{bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(group_type.clone()));
    }

    if let Some(from) = filter.arrival_from {
        conditions.push(format!("arrival_date >= ?{bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Date(from));
    }

    if let Some(to) = filter.arrival_to {
        conditions.push(format!("arrival_date <= ?{bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Date(to));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_client_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for val in bind_values {
        q = match val {
            BindValue::Text(v) => q.bind(v.as_str()),
            BindValue::Date(v) => q.bind(*v),
        };
    }
    q
}
