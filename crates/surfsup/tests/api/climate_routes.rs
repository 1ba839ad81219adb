use crate::helpers::{
    body_json, mock_stations, observation, spawn_app, spawn_app_with_policy,
    MockObservationStore, REFERENCE_STATION,
};
use hyper::StatusCode;
use serde_json::json;
use std::sync::Arc;
use surfsup::{db, LeapDayPolicy};
use time::macros::date;

#[tokio::test]
async fn precipitation_covers_trailing_year_of_dataset() {
    let mut store = MockObservationStore::new();
    store.expect_observations().times(1).returning(|| {
        Ok(vec![
            observation(date!(2017 - 08 - 23), "USC00519281", Some(0.45), Some(81.0)),
            observation(date!(2017 - 08 - 23), "USC00519397", Some(0.0), Some(81.0)),
            observation(date!(2017 - 08 - 22), "USC00519397", None, Some(82.0)),
            observation(date!(2016 - 08 - 23), "USC00519397", Some(0.7), Some(80.0)),
            observation(date!(2016 - 08 - 22), "USC00519397", Some(0.4), Some(80.0)),
        ])
    });

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/precipitation").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([
            {"2017-08-23": 0.45},
            {"2017-08-23": 0.0},
            {"2016-08-23": 0.7}
        ])
    );
}

#[tokio::test]
async fn precipitation_on_empty_dataset_reports_error() {
    let mut store = MockObservationStore::new();
    store.expect_observations().returning(|| Ok(vec![]));

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/precipitation").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["Error"].is_string());
}

#[tokio::test]
async fn storage_failure_is_server_error() {
    let mut store = MockObservationStore::new();
    store
        .expect_observations()
        .returning(|| Err(db::Error::MissingTable(String::from("measurement"))));

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/precipitation").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["Error"]
        .as_str()
        .is_some_and(|msg| msg.contains("measurement")));
}

#[tokio::test]
async fn stations_lists_every_field() {
    let mut store = MockObservationStore::new();
    store
        .expect_stations()
        .times(1)
        .returning(|| Ok(mock_stations()));

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/stations").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(
        body[0],
        json!({
            "id": 1,
            "station": "USC00519397",
            "name": "WAIKIKI 717.2, HI US",
            "latitude": 21.2716,
            "longitude": -157.8168,
            "elevation": 3.0
        })
    );
}

#[tokio::test]
async fn tobs_defaults_to_reference_station() {
    let mut store = MockObservationStore::new();
    store
        .expect_station_observations()
        .withf(|station| station == REFERENCE_STATION)
        .times(1)
        .returning(|station| {
            Ok(vec![
                observation(date!(2017 - 08 - 18), station, None, Some(79.0)),
                observation(date!(2017 - 08 - 17), station, Some(0.1), None),
                observation(date!(2016 - 08 - 18), station, None, Some(80.0)),
                observation(date!(2016 - 08 - 17), station, None, Some(76.0)),
            ])
        });

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/tobs").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([
            {"Date": "2017-08-18", "Temperature": 79.0},
            {"Date": "2016-08-18", "Temperature": 80.0}
        ])
    );
}

#[tokio::test]
async fn tobs_station_can_be_overridden() {
    let mut store = MockObservationStore::new();
    store
        .expect_station_observations()
        .withf(|station| station == "USC00513117")
        .times(1)
        .returning(|station| {
            Ok(vec![observation(
                date!(2017 - 07 - 31),
                station,
                None,
                Some(77.0),
            )])
        });

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/tobs?station=USC00513117").await;

    assert_eq!(
        body_json(response).await,
        json!([{"Date": "2017-07-31", "Temperature": 77.0}])
    );
}

#[tokio::test]
async fn tobs_unknown_station_reports_error() {
    let mut store = MockObservationStore::new();
    store
        .expect_station_observations()
        .returning(|_| Ok(vec![]));

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/tobs?station=USC00000000").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"Error": "No observations found for USC00000000"})
    );
}

#[tokio::test]
async fn leap_day_anchor_follows_configured_policy() {
    let rows = || -> Result<Vec<surfsup::Observation>, db::Error> {
        Ok(vec![
            observation(date!(2016 - 02 - 29), "USC00519281", Some(0.1), Some(70.0)),
            observation(date!(2015 - 02 - 28), "USC00519281", Some(0.2), Some(68.0)),
        ])
    };

    let mut rejecting = MockObservationStore::new();
    rejecting.expect_observations().returning(rows);
    let response = spawn_app(Arc::new(rejecting))
        .await
        .get("/api/v1.0/precipitation")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["Error"].is_string());

    let mut clamping = MockObservationStore::new();
    clamping.expect_observations().returning(rows);
    let response = spawn_app_with_policy(Arc::new(clamping), LeapDayPolicy::Clamp)
        .await
        .get("/api/v1.0/precipitation")
        .await;
    assert_eq!(
        body_json(response).await,
        json!([{"2016-02-29": 0.1}, {"2015-02-28": 0.2}])
    );
}

fn aggregate_rows() -> Result<Vec<surfsup::Observation>, db::Error> {
    Ok(vec![
        observation(date!(2017 - 08 - 23), "USC00519397", None, Some(81.0)),
        observation(date!(2017 - 08 - 23), "USC00519281", None, Some(75.0)),
        observation(date!(2017 - 08 - 22), "USC00519397", None, None),
        observation(date!(2017 - 08 - 21), "USC00519397", None, Some(70.0)),
        observation(date!(2017 - 08 - 21), "USC00519281", None, Some(72.0)),
        observation(date!(2017 - 08 - 20), "USC00519281", None, Some(68.0)),
    ])
}

#[tokio::test]
async fn aggregate_from_start_date() {
    let mut store = MockObservationStore::new();
    store
        .expect_observations()
        .times(1)
        .returning(aggregate_rows);

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/2017-08-21").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([
            {"Date": "2017-08-21", "TMIN": 70.0, "TMAX": 72.0, "TAVG": 71.0},
            {"Date": "2017-08-23", "TMIN": 75.0, "TMAX": 81.0, "TAVG": 78.0}
        ])
    );
}

#[tokio::test]
async fn aggregate_between_dates_is_inclusive() {
    let mut store = MockObservationStore::new();
    store
        .expect_observations()
        .times(1)
        .returning(aggregate_rows);

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/2017-08-20/2017-08-21").await;

    assert_eq!(
        body_json(response).await,
        json!([
            {"Date": "2017-08-20", "TMIN": 68.0, "TMAX": 68.0, "TAVG": 68.0},
            {"Date": "2017-08-21", "TMIN": 70.0, "TMAX": 72.0, "TAVG": 71.0}
        ])
    );
}

#[tokio::test]
async fn aggregate_after_last_date_is_empty() {
    let mut store = MockObservationStore::new();
    store.expect_observations().returning(aggregate_rows);

    let test_app = spawn_app(Arc::new(store)).await;
    let response = test_app.get("/api/v1.0/2018-01-01").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn malformed_dates_report_error_without_querying() {
    let test_app = spawn_app(Arc::new(MockObservationStore::new())).await;

    for (uri, token) in [
        ("/api/v1.0/2017-13-01", "2017-13-01"),
        ("/api/v1.0/not-a-date", "not-a-date"),
        ("/api/v1.0/2017-02-30", "2017-02-30"),
        ("/api/v1.0/2017-01-01/2017-1-5", "2017-1-5"),
    ] {
        let response = test_app.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(
            body_json(response).await,
            json!({"Error": format!("Invalid date '{token}', expected format YYYY-MM-DD")}),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn inverted_range_reports_error_without_querying() {
    let test_app = spawn_app(Arc::new(MockObservationStore::new())).await;
    let response = test_app.get("/api/v1.0/2017-08-23/2017-08-01").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"Error": "End date 2017-08-01 is before start date 2017-08-23"})
    );
}
