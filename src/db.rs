use anyhow::{Context, Result};
use sqlx::MySqlPool;

use crate::auth::password::hash_password;
use crate::policy::ANNUAL_ENTITLEMENT_DAYS;

pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPool::connect(database_url)
        .await
        .expect("Failed to connect to database")
}

/// Idempotent schema setup, run at startup.
pub async fn migrate(pool: &MySqlPool) -> Result<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            email VARCHAR(255) NOT NULL UNIQUE,
            name VARCHAR(255) NOT NULL,
            password VARCHAR(255) NOT NULL,
            role VARCHAR(20) NOT NULL DEFAULT 'employee',
            manager_id BIGINT UNSIGNED NULL,
            vacation_balance INT NOT NULL DEFAULT 30,
            department VARCHAR(255) NOT NULL DEFAULT '',
            active TINYINT(1) NOT NULL DEFAULT 1,
            last_login_at TIMESTAMP NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            INDEX idx_users_manager (manager_id)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS vacation_requests (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            user_id BIGINT UNSIGNED NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            business_days INT NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            reason TEXT NULL,
            emergency_contact VARCHAR(255) NOT NULL,
            approved_by BIGINT UNSIGNED NULL,
            approval_date TIMESTAMP NULL,
            approval_comment TEXT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
                ON UPDATE CURRENT_TIMESTAMP,
            INDEX idx_requests_user (user_id),
            INDEX idx_requests_status (status)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            user_id BIGINT UNSIGNED NOT NULL,
            kind VARCHAR(20) NOT NULL,
            title VARCHAR(255) NOT NULL,
            message TEXT NOT NULL,
            is_read TINYINT(1) NOT NULL DEFAULT 0,
            read_at TIMESTAMP NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            INDEX idx_notifications_user (user_id, is_read)
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS refresh_tokens (
            id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
            user_id BIGINT UNSIGNED NOT NULL,
            jti VARCHAR(64) NOT NULL,
            expires_at TIMESTAMP NOT NULL,
            revoked TINYINT(1) NOT NULL DEFAULT 0,
            INDEX idx_refresh_jti (jti)
        )
        "#,
    ];

    for ddl in statements {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .context("schema migration failed")?;
    }

    tracing::info!("Database migration completed");
    Ok(())
}

/// First-run fixture accounts, skipped once any user exists.
pub async fn seed_if_empty(pool: &MySqlPool) -> Result<()> {
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .context("failed to count users")?;

    if user_count > 0 {
        tracing::info!("Database already seeded, skipping");
        return Ok(());
    }

    tracing::info!("Seeding database with initial data");

    sqlx::query(
        r#"
        INSERT INTO users (email, name, password, role, vacation_balance, department)
        VALUES (?, ?, ?, 'admin', ?, 'TI')
        "#,
    )
    .bind("admin@empresa.com")
    .bind("Administrador Sistema")
    .bind(hash_password("admin123"))
    .bind(ANNUAL_ENTITLEMENT_DAYS)
    .execute(pool)
    .await?;

    let manager_id = sqlx::query(
        r#"
        INSERT INTO users (email, name, password, role, vacation_balance, department)
        VALUES (?, ?, ?, 'manager', 25, 'RH')
        "#,
    )
    .bind("maria.silva@empresa.com")
    .bind("Maria Silva")
    .bind(hash_password("manager123"))
    .execute(pool)
    .await?
    .last_insert_id();

    let employee_password = hash_password("123456");
    let employees = [
        ("joao.santos@empresa.com", "Joao Santos", 22, "Desenvolvimento"),
        ("ana.oliveira@empresa.com", "Ana Oliveira", 28, "Design"),
        ("carlos.pereira@empresa.com", "Carlos Pereira", 15, "Marketing"),
    ];

    for (email, name, balance, department) in employees {
        sqlx::query(
            r#"
            INSERT INTO users
                (email, name, password, role, manager_id, vacation_balance, department)
            VALUES (?, ?, ?, 'employee', ?, ?, ?)
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(&employee_password)
        .bind(manager_id)
        .bind(balance)
        .bind(department)
        .execute(pool)
        .await?;
    }

    tracing::info!("Database seeded: admin@empresa.com, maria.silva@empresa.com + 3 employees");
    Ok(())
}
