//! Administrator credential store operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Admin, NewAdmin};
use crate::repository::Database;

impl Database {
    // ==================== Administrator Operations ====================

    /// Insert a new administrator
    pub async fn insert_admin(&self, admin: NewAdmin) -> Result<Admin, DbError> {
        let now = Utc::now();

        // Check if the email is already registered
        let existing = self.get_admin_by_email(&admin.email).await?;
        if existing.is_some() {
            return Err(DbError::Duplicate(format!(
                "Administrator '{}' already exists",
                admin.email
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO admins (email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(admin.role.as_str())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Admin {
            id,
            email: admin.email,
            password_hash: admin.password_hash,
            role: admin.role,
            created_at: now,
        })
    }

    /// Get an administrator by email (exact match, case-sensitive as stored)
    pub async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM admins
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Admin::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get an administrator by ID
    pub async fn get_admin_by_id(&self, id: i64) -> Result<Option<Admin>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM admins
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Admin::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all administrators, newest first
    pub async fn list_admins(&self) -> Result<Vec<Admin>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM admins
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Admin::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Delete an administrator
    pub async fn delete_admin(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM admins WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check if any administrators exist
    pub async fn has_admins(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM admins")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::models::{NewAdmin, Role};
    use crate::repository::test_support::memory_db;

    fn new_admin(email: &str) -> NewAdmin {
        NewAdmin {
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNoaGFzaA".to_string(),
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn insert_and_lookup() {
        let db = memory_db().await;

        let created = db.insert_admin(new_admin("admin@x.com")).await.unwrap();
        assert_eq!(created.email, "admin@x.com");
        assert_eq!(created.role, Role::Admin);

        let by_email = db.get_admin_by_email("admin@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = db.get_admin_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "admin@x.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_first_record_kept() {
        let db = memory_db().await;

        let first = db.insert_admin(new_admin("admin@x.com")).await.unwrap();

        let mut second = new_admin("admin@x.com");
        second.password_hash = "other-hash".to_string();
        let err = db.insert_admin(second).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));

        let admins = db.list_admins().await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].id, first.id);
        assert_eq!(admins[0].password_hash, first.password_hash);
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let db = memory_db().await;

        db.insert_admin(new_admin("Admin@x.com")).await.unwrap();
        assert!(db.get_admin_by_email("admin@x.com").await.unwrap().is_none());
        assert!(db.get_admin_by_email("Admin@x.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let db = memory_db().await;

        let a = db.insert_admin(new_admin("a@x.com")).await.unwrap();
        let b = db.insert_admin(new_admin("b@x.com")).await.unwrap();
        let c = db.insert_admin(new_admin("c@x.com")).await.unwrap();

        let admins = db.list_admins().await.unwrap();
        let ids: Vec<i64> = admins.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let db = memory_db().await;

        let created = db.insert_admin(new_admin("admin@x.com")).await.unwrap();
        assert!(db.delete_admin(created.id).await.unwrap());
        assert!(!db.delete_admin(created.id).await.unwrap());
        assert!(db.get_admin_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn has_admins_tracks_population() {
        let db = memory_db().await;

        assert!(!db.has_admins().await.unwrap());
        db.insert_admin(new_admin("admin@x.com")).await.unwrap();
        assert!(db.has_admins().await.unwrap());
    }
}
