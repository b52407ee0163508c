//! News-post fixtures used across loader tests.

use brownbag_effects::{CollectionRepository, MemoryRepository};
use serde::{Deserialize, Serialize};

/// Outlet a post was published in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Display name
    pub name: String,
}

/// News post used as loader content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Repository key
    pub id: String,
    /// Headline
    pub title: String,
    /// Optional standfirst
    pub subtitle: Option<String>,
    /// Canonical link
    pub url: String,
    /// Publishing outlet, if any
    pub publication: Option<Publication>,
}

/// Minimal post with only an id and a title.
pub fn post(id: &str, title: &str) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: None,
        url: format!("https://example.com/posts/{id}"),
        publication: None,
    }
}

/// Four posts with ids `p1`..`p4`.
pub fn sample_posts() -> Vec<Post> {
    let publication = Some(Publication {
        name: "Android Developers".to_string(),
    });
    vec![
        Post {
            subtitle: Some("Use transitions to animate layout changes".to_string()),
            publication: publication.clone(),
            ..post("p1", "A Little Thing about Android Module Paths")
        },
        Post {
            subtitle: Some("How to configure module paths".to_string()),
            publication: publication.clone(),
            ..post("p2", "Dagger in Kotlin: Gotchas and Optimizations")
        },
        Post {
            publication,
            ..post("p3", "From Java Programming Language to Kotlin")
        },
        post("p4", "Locale changes and the AndroidViewModel antipattern"),
    ]
}

/// Keyed repository over [`sample_posts`].
pub fn post_repository() -> MemoryRepository<Post> {
    MemoryRepository::with_entries(sample_posts().into_iter().map(|p| (p.id.clone(), p)))
}

/// Collection repository over [`sample_posts`].
pub fn post_collection() -> CollectionRepository<Post> {
    CollectionRepository::new(sample_posts())
}
