//! End-to-end loader scenarios on the synchronous test effects.

use brownbag_core::{ContentId, ContentState, FailureSchedule, LoadError, LoaderConfig};
use brownbag_effects::MemoryRepository;
use brownbag_loader::{AttemptPhase, ContentLoader};
use brownbag_testkit::{
    immediate_effects, post, post_collection, post_repository, sample_posts, Post,
    RecordingObserver,
};
use std::sync::Arc;
use std::thread;

fn item_loader(schedule: FailureSchedule) -> ContentLoader<Post> {
    ContentLoader::new(
        Arc::new(post_repository()),
        immediate_effects(),
        LoaderConfig::immediate().with_failure_schedule(schedule),
    )
}

#[test]
fn test_present_item_yields_loading_then_content() {
    let _ = tracing_subscriber::fmt::try_init();
    let repository = MemoryRepository::with_entries([("p1", post("p1", "A"))]);
    let loader: ContentLoader<Post> = ContentLoader::new(
        Arc::new(repository),
        immediate_effects(),
        LoaderConfig::immediate(),
    );
    let observer = RecordingObserver::new();

    let handle = loader.invoke(Some(ContentId::new("p1")), observer.clone());

    assert_eq!(
        observer.states(),
        vec![ContentState::Loading, ContentState::Content(post("p1", "A"))]
    );
    assert!(handle.is_finished());
    assert!(!handle.cancel());
    assert_eq!(observer.len(), 2);
}

#[test]
fn test_absent_item_yields_loading_then_error() {
    let loader: ContentLoader<Post> = ContentLoader::new(
        Arc::new(MemoryRepository::<Post>::new()),
        immediate_effects(),
        LoaderConfig::immediate(),
    );
    let observer = RecordingObserver::new();

    let handle = loader.invoke(Some("missing".into()), observer.clone());

    assert_eq!(
        observer.states(),
        vec![
            ContentState::Loading,
            ContentState::Error(LoadError::not_found(Some("missing".into())))
        ]
    );
    assert_eq!(handle.phase(), AttemptPhase::Error);
}

#[test]
fn test_first_attempt_fails_then_retry_succeeds() {
    let loader = item_loader(FailureSchedule::FirstAttempt);
    let expected = sample_posts().remove(0);

    let first = RecordingObserver::new();
    loader.invoke(Some("p1".into()), first.clone());
    assert_eq!(
        first.states(),
        vec![
            ContentState::Loading,
            ContentState::Error(LoadError::Injected { attempt: 1 })
        ]
    );

    let second = RecordingObserver::new();
    loader.invoke(Some("p1".into()), second.clone());
    assert_eq!(
        second.states(),
        vec![ContentState::Loading, ContentState::Content(expected)]
    );
    assert_eq!(first.len(), 2);
    assert_eq!(loader.delivered_attempts(), 2);
}

#[test]
fn test_demo_config_fails_first_attempt() {
    let loader: ContentLoader<Post> = ContentLoader::new(
        Arc::new(post_repository()),
        immediate_effects(),
        LoaderConfig::demo(),
    );
    let observer = RecordingObserver::new();

    loader.invoke(Some("p2".into()), observer.clone());
    loader.invoke(Some("p2".into()), observer.clone());

    let states = observer.states();
    assert!(states[1].is_error());
    assert_eq!(
        states[3].content().map(|p| p.title.as_str()),
        Some("Dagger in Kotlin: Gotchas and Optimizations")
    );
}

#[test]
fn test_collection_fetch_yields_all_posts() {
    let loader: ContentLoader<Vec<Post>> = ContentLoader::new(
        Arc::new(post_collection()),
        immediate_effects(),
        LoaderConfig::immediate(),
    );
    let observer = RecordingObserver::new();

    loader.invoke(None, observer.clone());

    assert_eq!(
        observer.states(),
        vec![ContentState::Loading, ContentState::Content(sample_posts())]
    );
}

#[test]
fn test_collection_loader_rejects_keyed_lookup() {
    let loader: ContentLoader<Vec<Post>> = ContentLoader::new(
        Arc::new(post_collection()),
        immediate_effects(),
        LoaderConfig::immediate(),
    );
    let observer = RecordingObserver::new();

    loader.invoke(Some("p1".into()), observer.clone());

    assert_eq!(
        observer.last(),
        Some(ContentState::Error(LoadError::not_found(Some("p1".into()))))
    );
}

#[test]
fn test_loading_arrives_before_invoke_returns_on_calling_thread() {
    let loader = item_loader(FailureSchedule::Never);
    let seen_before_return = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen_before_return);

    let handle = loader.invoke(Some("p3".into()), move |state: ContentState<Post>| {
        sink.lock().push((state.is_loading(), thread::current().id()));
    });

    let seen = seen_before_return.lock();
    assert_eq!(seen[0], (true, thread::current().id()));
    assert_ne!(handle.attempt_id(), uuid::Uuid::nil());
}

#[test]
fn test_from_fn_binds_closure() {
    let loader = ContentLoader::from_fn(
        |id: Option<&ContentId>| match id {
            Some(id) => Some(id.as_str().to_uppercase()),
            None => None,
        },
        immediate_effects(),
        LoaderConfig::immediate(),
    );
    let observer = RecordingObserver::new();

    loader.invoke(Some("abc".into()), observer.clone());
    loader.invoke(None, observer.clone());

    let states = observer.states();
    assert_eq!(states[1], ContentState::Content("ABC".to_string()));
    assert_eq!(
        states[3],
        ContentState::Error(LoadError::NotFound { id: None })
    );
}

#[test]
fn test_invoke_shared_reuses_observer() {
    let loader = item_loader(FailureSchedule::Never);
    let observer = RecordingObserver::new();
    let shared = observer.shared();

    loader.invoke_shared(Some("p1".into()), Arc::clone(&shared));
    loader.invoke_shared(Some("p4".into()), shared);

    assert_eq!(observer.len(), 4);
    assert_eq!(observer.terminal_count(), 2);
}

#[test]
fn test_simulated_delay_is_requested_per_attempt() {
    use brownbag_core::effects::LoaderEffects;
    use brownbag_effects::SimulatedTimeHandler;
    use brownbag_testkit::{InlineDeliveryContext, InlineTaskSpawner};

    let time = SimulatedTimeHandler::new_at_epoch();
    let effects = LoaderEffects::new(
        Arc::new(time.clone()),
        Arc::new(InlineTaskSpawner),
        Arc::new(InlineDeliveryContext),
    );
    let loader: ContentLoader<Post> =
        ContentLoader::new(Arc::new(post_repository()), effects, LoaderConfig::default());

    loader.invoke(Some("p1".into()), |_: ContentState<Post>| {});
    loader.invoke(Some("p2".into()), |_: ContentState<Post>| {});

    assert_eq!(time.total_slept_ms(), 4_000);
}
