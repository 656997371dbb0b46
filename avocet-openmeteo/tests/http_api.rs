use avocet_core::connector::AvocetConnector;
use avocet_core::types::Location;
use avocet_core::AvocetError;
use avocet_openmeteo::OpenMeteoConnector;
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn forecast_request_carries_coordinates_and_field_list() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/forecast")
                .query_param("latitude", "42.440000")
                .query_param("longitude", "-76.500000")
                .query_param("wind_speed_unit", "kmh");
            then.status(200).json_body(json!({
                "current": {
                    "time": "2024-05-14T11:00",
                    "temperature_2m": 17.3,
                    "relative_humidity_2m": 58.0,
                    "wind_speed_10m": 12.4,
                    "wind_direction_10m": 240.0,
                    "precipitation_probability": 35.0,
                    "weather_code": 61,
                    "is_day": 1
                }
            }));
        })
        .await;

    let c = OpenMeteoConnector::with_base_url(&format!("{}/", server.base_url())).unwrap();
    let conditions = c
        .as_weather_provider()
        .unwrap()
        .current_conditions(Location::new(42.44, -76.50))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(conditions.weather_code, 61);
    assert!((conditions.wind_speed - 12.4).abs() < f64::EPSILON);
}

#[tokio::test]
async fn server_errors_surface_as_connector_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/forecast");
            then.status(500);
        })
        .await;

    let c = OpenMeteoConnector::with_base_url(&format!("{}/", server.base_url())).unwrap();
    let err = c
        .as_weather_provider()
        .unwrap()
        .current_conditions(Location::new(42.44, -76.50))
        .await
        .unwrap_err();
    assert!(matches!(err, AvocetError::Connector { .. }));
}
