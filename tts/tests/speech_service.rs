use async_trait::async_trait;
use futures::stream;
use shared::data_uri;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tts::{
    AudioStream, OutputFormat, SpeechError, SpeechRequest, SpeechService, Synthesizer, TTSError,
    PREVIEW_TEXT, SYNTHESIS_MODEL,
};

enum Chunk {
    Bytes(&'static [u8]),
    Fail,
}

/// Synthesizer that replays scripted chunks and records what it was asked.
struct ChunkedTts {
    chunks: Vec<Vec<u8>>,
    fail_after: Option<usize>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String, String, OutputFormat)>>,
}

impl ChunkedTts {
    fn new(script: Vec<Chunk>) -> Arc<Self> {
        let fail_after = script.iter().position(|c| matches!(c, Chunk::Fail));
        let chunks = script
            .into_iter()
            .filter_map(|c| match c {
                Chunk::Bytes(b) => Some(b.to_vec()),
                Chunk::Fail => None,
            })
            .collect();
        Arc::new(Self {
            chunks,
            fail_after,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Synthesizer for ChunkedTts {
    async fn stream_speech(&self, request: &SpeechRequest<'_>) -> tts::Result<AudioStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push((
            request.voice_id.to_string(),
            request.text.to_string(),
            request.model_id.to_string(),
            request.output_format,
        ));
        let mut items: Vec<tts::Result<Vec<u8>>> = self.chunks.iter().cloned().map(Ok).collect();
        if let Some(at) = self.fail_after {
            items.truncate(at);
            items.push(Err(TTSError::Stream("connection reset".into())));
        }
        Ok(Box::pin(stream::iter(items)))
    }
}

#[tokio::test]
async fn concatenates_chunks_in_order() {
    let tts = ChunkedTts::new(vec![Chunk::Bytes(b"AB"), Chunk::Bytes(b"CD")]);
    let service = SpeechService::new(tts.clone());
    let audio = service.synthesize("Hello world", "voice-1").await.unwrap();

    assert!(audio.audio_url.starts_with("data:audio/mp3;base64,"));
    assert_eq!(data_uri::decode(&audio.audio_url).unwrap().bytes, b"ABCD");
    assert_eq!(audio.duration, 1);

    let seen = tts.seen.lock().unwrap();
    assert_eq!(
        seen[0],
        (
            "voice-1".to_string(),
            "Hello world".to_string(),
            SYNTHESIS_MODEL.to_string(),
            OutputFormat::Mp3_44100_128
        )
    );
}

#[tokio::test]
async fn missing_fields_skip_the_provider() {
    let tts = ChunkedTts::new(vec![Chunk::Bytes(b"AB")]);
    let service = SpeechService::new(tts.clone());
    assert!(matches!(
        service.synthesize("", "voice-1").await,
        Err(SpeechError::MissingInput)
    ));
    assert!(matches!(
        service.synthesize("script", " ").await,
        Err(SpeechError::MissingInput)
    ));
    assert!(matches!(
        service.preview("").await,
        Err(SpeechError::MissingInput)
    ));
    assert_eq!(tts.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn mid_stream_failure_returns_no_audio() {
    let tts = ChunkedTts::new(vec![Chunk::Bytes(b"AB"), Chunk::Fail, Chunk::Bytes(b"CD")]);
    let service = SpeechService::new(tts);
    let err = service.synthesize("script", "voice-1").await.unwrap_err();
    assert!(matches!(err, SpeechError::Synthesis(TTSError::Stream(_))));
}

#[tokio::test]
async fn empty_stream_is_a_synthesis_error() {
    let tts = ChunkedTts::new(vec![]);
    let service = SpeechService::new(tts);
    let err = service.synthesize("script", "voice-1").await.unwrap_err();
    assert!(matches!(err, SpeechError::Synthesis(TTSError::EmptyAudio)));
}

#[tokio::test]
async fn preview_speaks_the_sample_sentence() {
    let tts = ChunkedTts::new(vec![Chunk::Bytes(b"pre"), Chunk::Bytes(b"view")]);
    let service = SpeechService::new(tts.clone());
    let url = service.preview("6qpxBH5KUSDb40bij36w").await.unwrap();
    assert_eq!(data_uri::decode(&url).unwrap().bytes, b"preview");
    let seen = tts.seen.lock().unwrap();
    assert_eq!(seen[0].0, "6qpxBH5KUSDb40bij36w");
    assert_eq!(seen[0].1, PREVIEW_TEXT);
}
