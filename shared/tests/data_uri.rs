use shared::data_uri::{self, DataUriError};

#[test]
fn decoding_restores_every_byte() {
    let buffers: Vec<Vec<u8>> = vec![
        Vec::new(),
        vec![0],
        b"ABCD".to_vec(),
        (0..=255u8).collect(),
        (0..4096u32).map(|i| (i * 31 % 251) as u8).collect(),
    ];
    for buf in buffers {
        let uri = data_uri::encode_mp3(&buf);
        assert!(uri.starts_with("data:audio/mp3;base64,"));
        let decoded = data_uri::decode(&uri).unwrap();
        assert_eq!(decoded.mime, "audio/mp3");
        assert_eq!(decoded.bytes, buf);
    }
}

#[test]
fn garbage_payload_is_rejected() {
    let err = data_uri::decode("data:audio/mp3;base64,@@@").unwrap_err();
    assert!(matches!(err, DataUriError::Payload(_)));
}
