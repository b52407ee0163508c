//! Loader wired to the production handlers.

use brownbag_core::{ContentState, LoaderConfig};
use brownbag_effects::{BlockingRepository, ProductionEffects};
use brownbag_loader::ContentLoader;
use brownbag_testkit::{post_repository, Post, RecordingObserver};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_terminal_state_arrives_on_delivery_thread() {
    let _ = tracing_subscriber::fmt::try_init();
    let production = ProductionEffects::start().unwrap();
    let loader: ContentLoader<Post> = ContentLoader::new(
        Arc::new(post_repository()),
        production.loader_effects(),
        LoaderConfig::immediate().with_delay_ms(10),
    );
    let observer = RecordingObserver::new();

    loader.invoke(Some("p1".into()), observer.clone());
    assert_eq!(observer.states(), vec![ContentState::Loading]);

    tokio::time::timeout(Duration::from_secs(5), observer.wait_for_len(2))
        .await
        .unwrap();

    let threads = observer.threads();
    assert_eq!(threads[0], thread::current().id());
    assert_eq!(threads[1], production.delivery.thread_id());
    assert!(observer.last().unwrap().is_content());

    production.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_real_delay_cancel_suppresses_terminal() {
    let production = ProductionEffects::start().unwrap();
    let loader: ContentLoader<Post> = ContentLoader::new(
        Arc::new(post_repository()),
        production.loader_effects(),
        LoaderConfig::immediate().with_delay_ms(200),
    );
    let observer = RecordingObserver::<Post>::new();

    let handle = loader.invoke(Some("p1".into()), observer.clone());
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(handle.cancel());

    tokio::time::sleep(Duration::from_millis(400)).await;
    production.shutdown();
    assert_eq!(observer.states(), vec![ContentState::Loading]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_repository_lookup() {
    let production = ProductionEffects::start().unwrap();
    let loader: ContentLoader<usize> = ContentLoader::new(
        Arc::new(BlockingRepository::new(|id: Option<&brownbag_core::ContentId>| {
            id.map(|id| id.as_str().len())
        })),
        production.loader_effects(),
        LoaderConfig::immediate(),
    );
    let observer = RecordingObserver::new();

    loader.invoke(Some("four".into()), observer.clone());
    tokio::time::timeout(Duration::from_secs(5), observer.wait_for_len(2))
        .await
        .unwrap();

    assert_eq!(observer.last(), Some(ContentState::Content(4)));
    production.shutdown();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cross_thread_cancel_waits_for_terminal_callback() {
    let production = ProductionEffects::start().unwrap();
    let loader: ContentLoader<Post> = ContentLoader::new(
        Arc::new(post_repository()),
        production.loader_effects(),
        LoaderConfig::immediate(),
    );

    let entered = Arc::new(AtomicBool::new(false));
    let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    let observer = {
        let entered = Arc::clone(&entered);
        let log = Arc::clone(&log);
        move |state: ContentState<Post>| {
            if state.is_terminal() {
                entered.store(true, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(300));
                log.lock().push("observer finished");
            }
        }
    };

    let handle = loader.invoke(Some("p1".into()), observer);
    tokio::time::timeout(Duration::from_secs(5), async {
        while !entered.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .unwrap();

    let cancel_log = Arc::clone(&log);
    let cancelled = tokio::task::spawn_blocking(move || {
        let cancelled = handle.cancel();
        cancel_log.lock().push("cancel returned");
        cancelled
    })
    .await
    .unwrap();

    assert!(!cancelled);
    assert_eq!(*log.lock(), vec!["observer finished", "cancel returned"]);
    production.shutdown();
}
