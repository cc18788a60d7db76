use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use frontend::{FlowError, FlowState, HttpPodcastApi, LocalStore, LogNotifier, PodcastFlow};
use futures::stream;
use llm::{ChatRequest, LLMClient, LLMError};
use podcaster::{AppState, RateLimiter, app, cors_layer};
use shared::{GeneratedPodcast, VOICES, data_uri};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;
use tts::{AudioStream, SpeechRequest, Synthesizer};

struct FixedScript {
    script: String,
    calls: AtomicUsize,
}

#[async_trait]
impl LLMClient for FixedScript {
    async fn complete(&self, _request: ChatRequest) -> Result<Option<String>, LLMError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.script.clone()))
    }
}

/// Four 1 KiB chunks.
struct ChunkedAudio {
    calls: AtomicUsize,
}

#[async_trait]
impl Synthesizer for ChunkedAudio {
    async fn stream_speech(&self, _request: &SpeechRequest<'_>) -> tts::Result<AudioStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let chunks: Vec<tts::Result<Vec<u8>>> = (0..4u8).map(|i| Ok(vec![i; 1024])).collect();
        Ok(Box::pin(stream::iter(chunks)))
    }
}

async fn serve(llm: Arc<FixedScript>, tts: Arc<ChunkedAudio>) -> String {
    let client_url = "http://localhost:5173";
    let state = AppState::new(llm, "gpt-4", tts, client_url);
    let limiter = Arc::new(RateLimiter::new(10, Duration::from_secs(900)));
    let router = app(state, limiter, cors_layer(client_url).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    format!("http://{addr}")
}

fn earlier() -> GeneratedPodcast {
    GeneratedPodcast {
        id: "1700000000000".into(),
        prompt: "Volcanoes".into(),
        script: "Volcanoes are vents in the crust.".into(),
        audio_url: "data:audio/mp3;base64,QUJDRA==".into(),
        created_at: Utc::now(),
        duration: 1,
        voice: VOICES[2].to_option(),
    }
}

fn hundred_words() -> String {
    let text = "Plants capture sunlight and turn water and carbon dioxide into sugar. ".repeat(10);
    text.split_whitespace().take(100).collect::<Vec<_>>().join(" ")
}

#[tokio::test]
async fn prompt_to_history_entry() {
    let script = hundred_words();
    assert_eq!(script.split_whitespace().count(), 100);
    let llm = Arc::new(FixedScript {
        script: script.clone(),
        calls: AtomicUsize::new(0),
    });
    let tts = Arc::new(ChunkedAudio {
        calls: AtomicUsize::new(0),
    });
    let base_url = serve(llm.clone(), tts.clone()).await;

    let dir = tempdir().unwrap();
    let mut store = LocalStore::open(dir.path()).unwrap();
    let prior = earlier();
    store.prepend(prior.clone()).unwrap();
    store
        .update_settings(|s| {
            s.prompt = "Explain photosynthesis".into();
            s.selected_voice = Some(VOICES[0].to_option());
        })
        .unwrap();

    let flow = PodcastFlow::new(HttpPodcastApi::new(base_url), store, Arc::new(LogNotifier));
    let podcast = flow.generate(&CancellationToken::new()).await.unwrap();

    assert_eq!(flow.state(), FlowState::Completed);
    let history = flow.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], podcast);
    assert_eq!(history[1], prior);
    assert_eq!(podcast.prompt, "Explain photosynthesis");
    assert_eq!(podcast.script, script);
    assert_eq!(podcast.duration, 1);

    let audio = data_uri::decode(&podcast.audio_url).unwrap();
    assert_eq!(audio.mime, "audio/mp3");
    assert_eq!(audio.bytes.len(), 4096);
    assert_eq!(&audio.bytes[1024..1027], &[1, 1, 1]);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    assert_eq!(tts.calls.load(Ordering::SeqCst), 1);

    let reopened = LocalStore::open(dir.path()).unwrap();
    assert_eq!(reopened.history()[0].id, podcast.id);
}

#[tokio::test]
async fn missing_voice_never_reaches_backend() {
    let llm = Arc::new(FixedScript {
        script: "Short.".into(),
        calls: AtomicUsize::new(0),
    });
    let tts = Arc::new(ChunkedAudio {
        calls: AtomicUsize::new(0),
    });
    let base_url = serve(llm.clone(), tts.clone()).await;

    let dir = tempdir().unwrap();
    let mut store = LocalStore::open(dir.path()).unwrap();
    store
        .update_settings(|s| s.prompt = "Explain photosynthesis".into())
        .unwrap();

    let flow = PodcastFlow::new(HttpPodcastApi::new(base_url), store, Arc::new(LogNotifier));
    let err = flow.generate(&CancellationToken::new()).await.unwrap_err();

    assert!(matches!(err, FlowError::MissingVoice));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    assert_eq!(tts.calls.load(Ordering::SeqCst), 0);
    assert!(flow.history().is_empty());
}

#[tokio::test]
async fn oversized_script_fails_without_audio() {
    let llm = Arc::new(FixedScript {
        script: "word ".repeat(151),
        calls: AtomicUsize::new(0),
    });
    let tts = Arc::new(ChunkedAudio {
        calls: AtomicUsize::new(0),
    });
    let base_url = serve(llm.clone(), tts.clone()).await;

    let dir = tempdir().unwrap();
    let mut store = LocalStore::open(dir.path()).unwrap();
    store
        .update_settings(|s| {
            s.prompt = "Explain photosynthesis".into();
            s.selected_voice = Some(VOICES[1].to_option());
        })
        .unwrap();

    let flow = PodcastFlow::new(HttpPodcastApi::new(base_url), store, Arc::new(LogNotifier));
    let err = flow.generate(&CancellationToken::new()).await.unwrap_err();

    match err {
        FlowError::Script(frontend::ApiError::Rejected { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("151 words"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(flow.state(), FlowState::Failed);
    assert_eq!(tts.calls.load(Ordering::SeqCst), 0);
    assert!(flow.history().is_empty());
}
