use azstack_storage_blobs::prelude::*;
use mockito::Matcher;
use rand::RngCore;
use url::Url;

const PAYLOAD_SIZE: usize = 5 * 1024;

fn emulator_container(container: &str) -> ContainerClient {
    let endpoint = Url::parse(&mockito::server_url()).expect("mock server url parses");
    ContainerClientBuilder::new("devstoreaccount1", container, StorageCredentials::emulator())
        .endpoint(endpoint)
        .build()
        .expect("client should build")
}

fn shared_key_header() -> Matcher {
    Matcher::Regex("^SharedKey devstoreaccount1:.+$".to_string())
}

#[tokio::test]
async fn container_create_reports_created_and_existing() {
    let created = mockito::mock("PUT", "/fresh?restype=container")
        .match_header("authorization", shared_key_header())
        .match_header("x-ms-version", "2019-12-12")
        .with_status(201)
        .create();
    let _exists = mockito::mock("PUT", "/taken?restype=container")
        .with_status(409)
        .with_body(r#"<Error><Code>ContainerAlreadyExists</Code></Error>"#)
        .create();

    assert!(emulator_container("fresh")
        .create_if_not_exists()
        .await
        .unwrap());
    created.assert();
    assert!(!emulator_container("taken")
        .create_if_not_exists()
        .await
        .unwrap());
}

#[tokio::test]
async fn container_create_rejects_other_conflicts() {
    let _m = mockito::mock("PUT", "/purging?restype=container")
        .with_status(409)
        .with_header("x-ms-error-code", "ContainerBeingDeleted")
        .with_body(r#"<Error><Code>ContainerBeingDeleted</Code></Error>"#)
        .create();

    let error = emulator_container("purging")
        .create_if_not_exists()
        .await
        .expect_err("a conflict other than already-exists must fail");
    assert!(error.to_string().contains("ContainerBeingDeleted"));
}

#[tokio::test]
async fn upload_then_download_round_trips_byte_count() {
    let mut payload = vec![0u8; PAYLOAD_SIZE];
    rand::thread_rng().fill_bytes(&mut payload);

    let put = mockito::mock("PUT", "/sample/blockblob")
        .match_header("authorization", shared_key_header())
        .match_header("x-ms-blob-type", "BlockBlob")
        .match_body(payload.clone())
        .with_status(201)
        .with_header("etag", "\"0x8D0000000000000\"")
        .create();
    let get = mockito::mock("GET", "/sample/blockblob")
        .match_header("authorization", shared_key_header())
        .with_body(payload.clone())
        .create();

    let blob = emulator_container("sample").blob_client("blockblob");

    let uploaded = blob
        .put_block_blob(payload.clone())
        .await
        .expect("upload should succeed");
    assert_eq!(uploaded.content_length, PAYLOAD_SIZE as u64);
    assert_eq!(uploaded.etag.as_deref(), Some("\"0x8D0000000000000\""));

    let downloaded = blob.get().await.expect("download should succeed");
    assert_eq!(downloaded.len(), PAYLOAD_SIZE);
    assert_eq!(&downloaded[..], &payload[..]);

    put.assert();
    get.assert();
}
