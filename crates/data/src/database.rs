use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};

pub struct DatabaseClient {
    pool: PgPool,
}

impl DatabaseClient {
    /// Creates a new database client connected to the specified `PostgreSQL`
    /// database.
    ///
    /// # Errors
    /// Returns an error if the database connection cannot be established.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the reconciliation tables if they do not exist.
    ///
    /// The two trade tables are the source-partitioned stores: each is
    /// reserved for records extracted for one source system.
    ///
    /// # Errors
    /// Returns an error if any DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS bank_trades (
                trade_id TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                trade_date DATE,
                effective_date DATE,
                maturity_date DATE,
                notional NUMERIC,
                currency TEXT,
                counterparty_name TEXT,
                fixed_price NUMERIC,
                product_type TEXT,
                commodity_type TEXT,
                attributes JSONB
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS counterparty_trades (
                trade_id TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                trade_date DATE,
                effective_date DATE,
                maturity_date DATE,
                notional NUMERIC,
                currency TEXT,
                counterparty_name TEXT,
                fixed_price NUMERIC,
                product_type TEXT,
                commodity_type TEXT,
                attributes JSONB
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS match_results (
                id SERIAL PRIMARY KEY,
                bank_trade_id TEXT NOT NULL,
                counterparty_trade_id TEXT NOT NULL,
                classification TEXT NOT NULL,
                match_score NUMERIC NOT NULL,
                decision TEXT NOT NULL,
                reason_codes JSONB NOT NULL,
                differences JSONB NOT NULL,
                evaluated_at TIMESTAMPTZ NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS exceptions (
                exception_id UUID PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL,
                source_event TEXT NOT NULL,
                trade_id TEXT,
                match_score NUMERIC,
                reason_codes JSONB NOT NULL,
                severity_score NUMERIC NOT NULL,
                severity TEXT NOT NULL,
                routing_destination TEXT,
                priority SMALLINT,
                sla_deadline TIMESTAMPTZ,
                resolution TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS policy_events (
                id SERIAL PRIMARY KEY,
                exception_id UUID NOT NULL,
                reason_codes JSONB NOT NULL,
                routed_to TEXT NOT NULL,
                actual_destination TEXT NOT NULL,
                within_sla BOOLEAN NOT NULL,
                reward NUMERIC NOT NULL,
                occurred_at TIMESTAMPTZ NOT NULL
            )
            ",
        ];

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        Ok(())
    }
}
