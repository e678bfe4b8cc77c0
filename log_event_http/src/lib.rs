use lambda_http::{Body, Error, Request, Response};
use log_event::{EventLogger, InboundEvent, LogEventError, RecordStore};
use serde_json::json;
use tracing::{debug, error};

fn json_response(status: u16, body: serde_json::Value) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(body.to_string().into())
        .map_err(Box::new)?)
}

/// API Gateway entry point. The request body is the inbound event.
pub async fn handle_request<S: RecordStore>(
    logger: &EventLogger<S>,
    event: Request,
) -> Result<Response<Body>, Error> {
    debug!("log_event_http request: {:?}", event);
    let inbound: serde_json::Result<InboundEvent> = match event.body() {
        Body::Text(s) => serde_json::from_str(s),
        Body::Binary(b) => serde_json::from_slice(b),
        Body::Empty => {
            return Ok(Response::builder()
                .status(400)
                .header("content-type", "text/plain")
                .body("Expected a request body.".into())
                .map_err(Box::new)?)
        }
    };

    let inbound = match inbound {
        Ok(inbound) => inbound,
        Err(e) => {
            error!("error parsing body: {}", e);
            return json_response(400, json!({ "error": e.to_string() }));
        }
    };

    match logger.log_event(inbound).await {
        Ok(r) => json_response(200, json!(r)),
        Err(e @ LogEventError::InvalidPayloadJson { .. }) => {
            json_response(400, json!({ "error": e.to_string() }))
        }
        Err(e @ LogEventError::StorageWriteFailed { .. }) => {
            json_response(500, json!({ "error": e.to_string() }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log_event::store::MockRecordStore;
    use log_event::Config;
    use serde_json::Value;

    fn logger(store: MockRecordStore) -> EventLogger<MockRecordStore> {
        EventLogger::new(Config::new("readings"), store)
    }

    fn body_json(response: &Response<Body>) -> Value {
        match response.body() {
            Body::Text(s) => serde_json::from_str(s).unwrap(),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn logs_request_body() {
        let mut store = MockRecordStore::new();
        store.expect_put_record().times(1).returning(|_, _| Ok(()));

        let request = Request::new(Body::Text("{\"device\":\"dht2\",\"temp\":18}".to_string()));
        let response = handle_request(&logger(store), request).await.unwrap();

        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(body_json(&response), json!({"success": true}));
    }

    #[tokio::test]
    async fn empty_body_is_bad_request() {
        let mut store = MockRecordStore::new();
        store.expect_put_record().times(0);

        let response = handle_request(&logger(store), Request::new(Body::Empty))
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn malformed_data_is_bad_request() {
        let mut store = MockRecordStore::new();
        store.expect_put_record().times(0);

        let request = Request::new(Body::Text(
            "{\"device\":\"dht3\",\"data\":\"not-json\",\"published_at\":\"x\"}".to_string(),
        ));
        let response = handle_request(&logger(store), request).await.unwrap();

        assert_eq!(response.status().as_u16(), 400);
        assert!(body_json(&response)["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to parse data JSON"));
    }

    #[tokio::test]
    async fn storage_failure_is_server_error() {
        let mut store = MockRecordStore::new();
        store
            .expect_put_record()
            .times(1)
            .returning(|_, _| Err("AccessDeniedException".to_string()));

        let request = Request::new(Body::Binary(b"{\"device\":\"dht2\"}".to_vec()));
        let response = handle_request(&logger(store), request).await.unwrap();

        assert_eq!(response.status().as_u16(), 500);
    }

    #[tokio::test]
    async fn non_object_body_is_bad_request() {
        let mut store = MockRecordStore::new();
        store.expect_put_record().times(0);

        let request = Request::new(Body::Text("[1,2,3]".to_string()));
        let response = handle_request(&logger(store), request).await.unwrap();

        assert_eq!(response.status().as_u16(), 400);
        assert!(body_json(&response).get("error").is_some());
    }
}
