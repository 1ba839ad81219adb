use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};
use std::time::Duration;

use super::{Error, Observation, ObservationRepository, Station};
use crate::parse_date;

const REQUIRED_TABLES: [&str; 2] = ["measurement", "station"];

const ALL_OBSERVATIONS: &str = "SELECT date, station, CAST(prcp AS REAL) AS prcp, CAST(tobs AS REAL) AS tobs
     FROM measurement
     ORDER BY date DESC, station ASC";

const STATION_OBSERVATIONS: &str = "SELECT date, station, CAST(prcp AS REAL) AS prcp, CAST(tobs AS REAL) AS tobs
     FROM measurement
     WHERE station = ?
     ORDER BY date DESC";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open an existing database read-only and check both tables are present.
    pub async fn open(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false)
            .read_only(true)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open observation database: {}", path))?;

        let repository = Self::from_pool(pool);
        repository
            .verify_schema()
            .await
            .with_context(|| format!("Observation database is not ready: {}", path))?;
        info!("SQLite observation database opened at: {}", path);

        Ok(repository)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn verify_schema(&self) -> Result<(), Error> {
        for table in REQUIRED_TABLES {
            let found: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await?;

            if found == 0 {
                return Err(Error::MissingTable(table.to_owned()));
            }
            debug!("found table: {}", table);
        }
        Ok(())
    }

    fn row_to_observation(row: &SqliteRow) -> Result<Observation, Error> {
        let raw_date: String = row.try_get("date")?;
        let date = parse_date(&raw_date).map_err(|e| Error::InvalidRecord {
            table: "measurement",
            reason: e.to_string(),
        })?;

        Ok(Observation {
            date,
            station: row.try_get("station")?,
            precipitation: row.try_get("prcp")?,
            temperature: row.try_get("tobs")?,
        })
    }

    fn row_to_station(row: &SqliteRow) -> Result<Station, Error> {
        Ok(Station {
            id: row.try_get("id")?,
            station: row.try_get("station")?,
            name: row.try_get("name")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            elevation: row.try_get("elevation")?,
        })
    }
}

#[async_trait]
impl ObservationRepository for SqliteRepository {
    async fn observations(&self) -> Result<Vec<Observation>, Error> {
        let rows = sqlx::query(ALL_OBSERVATIONS)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_observation).collect()
    }

    async fn station_observations(&self, station: &str) -> Result<Vec<Observation>, Error> {
        let rows = sqlx::query(STATION_OBSERVATIONS)
            .bind(station)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_observation).collect()
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let rows = sqlx::query(
            "SELECT id, station, name,
                    CAST(latitude AS REAL) AS latitude,
                    CAST(longitude AS REAL) AS longitude,
                    CAST(elevation AS REAL) AS elevation
             FROM station ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_station).collect()
    }

    async fn health_check(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
