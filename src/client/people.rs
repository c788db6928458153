use crate::client::{CancelScope, InfobipClient, InfobipError};
use crate::domain::ApiResponse;
use crate::models::people::{Person, PersonRequest};

impl InfobipClient {
    pub async fn create_person(
        &self,
        scope: &CancelScope,
        person: &PersonRequest,
    ) -> Result<ApiResponse<Person>, InfobipError> {
        self.post_json(scope, "people/2/persons", person, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::tests::{FakeTransport, make_client};

    use super::*;

    #[tokio::test]
    async fn created_person_is_returned() {
        let json = r#"{"firstName":"Jane","lastName":"Doe","type":"CUSTOMER","createdAt":"2024-05-01T10:00:00","tags":["vip"]}"#;
        let transport = FakeTransport::new(201, json);
        let client = make_client(transport.clone());
        let person = PersonRequest {
            first_name: Some("Jane".to_owned()),
            last_name: Some("Doe".to_owned()),
            tags: vec!["vip".to_owned()],
            ..Default::default()
        };

        let response = client
            .create_person(&CancelScope::new(), &person)
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        assert_eq!(response.result.kind.as_deref(), Some("CUSTOMER"));

        let body: serde_json::Value =
            serde_json::from_slice(&transport.last_request().body.unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"firstName":"Jane","lastName":"Doe","tags":["vip"]}));
    }

    #[tokio::test]
    async fn bad_gender_is_rejected() {
        let transport = FakeTransport::new(201, "{}");
        let client = make_client(transport.clone());
        let person = PersonRequest {
            gender: Some("OTHER".to_owned()),
            ..Default::default()
        };
        let err = client
            .create_person(&CancelScope::new(), &person)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(transport.requests().is_empty());
    }
}
