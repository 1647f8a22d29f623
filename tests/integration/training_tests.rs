//! Training endpoint tests.

use inspect_console::{ApiError, AuthApi, FilePart, Gateway, TrainingApi};

use super::test_utils::{test_png, MockService, MOCK_PASSWORD, MOCK_USER};

async fn signed_in_gateway(service: &MockService) -> Gateway {
    let gateway = service.gateway();
    AuthApi::new(gateway.clone())
        .login(MOCK_USER, MOCK_PASSWORD)
        .await
        .unwrap();
    gateway
}

fn upload(filename: &str) -> FilePart {
    FilePart::new(filename, test_png(8, 8))
}

#[tokio::test]
async fn test_train_counts_uploaded_images() {
    let service = MockService::spawn().await;
    let gateway = signed_in_gateway(&service).await;

    let outcome = TrainingApi::new(gateway)
        .train(
            "OBJ-1",
            vec![upload("ref-1.png"), upload("ref-2.png"), upload("ref-3.png")],
        )
        .await
        .unwrap();
    assert_eq!(outcome.images_used, 3);
}

#[tokio::test]
async fn test_train_with_no_files_never_reaches_the_service() {
    let service = MockService::spawn().await;
    let gateway = signed_in_gateway(&service).await;

    let err = TrainingApi::new(gateway)
        .train("OBJ-1", Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(service.state.hits("/objects/OBJ-1/train"), 0);
}

#[tokio::test]
async fn test_train_without_session_is_unauthorized() {
    let service = MockService::spawn().await;
    let err = TrainingApi::new(service.gateway())
        .train("OBJ-1", vec![upload("ref-1.png")])
        .await
        .unwrap_err();
    assert!(err.is_authorization());
}
