use itertools::Itertools;
use log::debug;
use std::sync::Arc;
use time::Date;

use crate::{
    db::{self, Observation, ObservationRepository, Station},
    parse_date, DateParseError, DateWindow, LeapDayPolicy, WindowError,
};

#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] DateParseError),
    #[error("End date {end} is before start date {start}")]
    InvalidRange { start: Date, end: Date },
    #[error("No observations found for {key}")]
    NotFound { key: String },
    #[error(transparent)]
    InvalidWindow(#[from] WindowError),
    #[error("Failed to read observations: {0}")]
    Repository(#[from] db::Error),
}

impl QueryError {
    /// Errors caused by the request itself rather than by storage
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, QueryError::Repository(_))
    }
}

/// A single dated value, one per qualifying observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub date: Date,
    pub value: f64,
}

/// Temperature summary for one date across every reporting station
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyAggregate {
    pub date: Date,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Clone)]
pub struct QueryEngine {
    repository: Arc<dyn ObservationRepository>,
    leap_day: LeapDayPolicy,
}

impl QueryEngine {
    pub fn new(repository: Arc<dyn ObservationRepository>, leap_day: LeapDayPolicy) -> Self {
        Self {
            repository,
            leap_day,
        }
    }

    pub fn repository(&self) -> &Arc<dyn ObservationRepository> {
        &self.repository
    }

    pub fn leap_day_policy(&self) -> LeapDayPolicy {
        self.leap_day
    }

    /// Precipitation over the trailing year of the whole dataset, one entry per
    /// observation that has a reading. Stations reporting on the same date each
    /// contribute an entry.
    pub async fn recent_precipitation(&self) -> Result<Vec<Reading>, QueryError> {
        let observations = self.repository.observations().await?;
        let window = self.trailing_window(&observations, "measurement")?;
        debug!(
            "precipitation window {} to {} over {} observations",
            window.floor,
            window.most_recent,
            observations.len()
        );

        Ok(readings_within(observations, &window, |o| o.precipitation))
    }

    pub async fn stations(&self) -> Result<Vec<Station>, QueryError> {
        Ok(self.repository.stations().await?)
    }

    /// Temperatures over the trailing year of one station's own records
    pub async fn recent_temperature(&self, station: &str) -> Result<Vec<Reading>, QueryError> {
        let observations = self.repository.station_observations(station).await?;
        let window = self.trailing_window(&observations, station)?;
        debug!(
            "temperature window for {}: {} to {}",
            station, window.floor, window.most_recent
        );

        Ok(readings_within(observations, &window, |o| o.temperature))
    }

    /// Daily min/max/avg temperature pooled across stations for `start..=end`,
    /// or every date from `start` onward when `end` is absent.
    pub async fn temperature_aggregate(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<Vec<DailyAggregate>, QueryError> {
        if let Some(end) = end {
            if end < start {
                return Err(QueryError::InvalidRange { start, end });
            }
        }

        let observations = self.repository.observations().await?;

        Ok(aggregate_by_date(observations)
            .into_iter()
            .filter(|day| day.date >= start && end.map_or(true, |end| day.date <= end))
            .collect())
    }

    /// [`QueryEngine::temperature_aggregate`] for raw `YYYY-MM-DD` path tokens
    pub async fn temperature_aggregate_from_tokens(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<DailyAggregate>, QueryError> {
        let start = parse_date(start)?;
        let end = end.map(parse_date).transpose()?;
        self.temperature_aggregate(start, end).await
    }

    fn trailing_window(
        &self,
        observations: &[Observation],
        key: &str,
    ) -> Result<DateWindow, QueryError> {
        let most_recent = observations
            .iter()
            .map(|o| o.date)
            .max()
            .ok_or_else(|| QueryError::NotFound {
                key: key.to_owned(),
            })?;

        Ok(DateWindow::ending_at(most_recent, self.leap_day)?)
    }
}

fn readings_within(
    observations: Vec<Observation>,
    window: &DateWindow,
    value: impl Fn(&Observation) -> Option<f64>,
) -> Vec<Reading> {
    observations
        .iter()
        .filter(|o| window.contains(o.date))
        .filter_map(|o| value(o).map(|value| Reading { date: o.date, value }))
        .collect()
}

/// Group temperatures by date, ignoring missing readings. Dates with no
/// temperature at all produce no aggregate. Output is sorted by date.
pub fn aggregate_by_date(observations: Vec<Observation>) -> Vec<DailyAggregate> {
    observations
        .into_iter()
        .filter_map(|o| o.temperature.map(|t| (o.date, t)))
        .into_group_map()
        .into_iter()
        .map(|(date, temps)| {
            let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
            let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let avg = temps.iter().sum::<f64>() / temps.len() as f64;
            DailyAggregate { date, min, max, avg }
        })
        .sorted_by_key(|day| day.date)
        .collect()
}
