//! Concurrency tests for the document store.
//!
//! Tests cover:
//! - Racing writers on one document with the same expected tag
//! - Parallel writers on different documents
//! - Readers never observing a half-published generation
//! - Racing loads and creates never sharing an id

use redline_db::{
    ChangeRequest, ChangeSpec, DbError, Document, DocumentId, DocumentStore, ErrorKind,
    SearchOptions, VersionTag,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_one_winner_per_tag() {
    let store = Arc::new(DocumentStore::default());
    let doc = store.create("Race", "counter: zero").unwrap();

    let outcomes: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = &store;
                let (id, version) = (doc.id, doc.version);
                s.spawn(move || {
                    let request =
                        ChangeRequest::new(vec![ChangeSpec::text("zero", 1, format!("w{}", i))])
                            .with_expected(version);
                    store.apply_changes(id, &request)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for err in outcomes.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    let current = store.get(doc.id).unwrap();
    assert!(current.content.starts_with("counter: w"));
    assert_eq!(current.version, VersionTag::of(&current.content));
}

#[test]
fn test_serialized_appends_on_one_document() {
    let store = DocumentStore::default();
    let doc = store.create("Log", "log").unwrap();

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..25 {
                    // No precondition: every request applies to whatever is current
                    let len = store.get(doc.id).unwrap().char_count();
                    let request = ChangeRequest::new(vec![ChangeSpec::range(0, 0, "x")]);
                    store.apply_changes(doc.id, &request).unwrap();
                    assert!(store.get(doc.id).unwrap().char_count() > len);
                }
            });
        }
    });

    let current = store.get(doc.id).unwrap();
    assert_eq!(current.char_count(), 103);
    assert!(current.is_consistent());
}

#[test]
fn test_parallel_documents() {
    let store = DocumentStore::default();
    let ids: Vec<_> = (0..6)
        .map(|i| store.create(format!("Doc {}", i), "alpha beta").unwrap().id)
        .collect();

    thread::scope(|s| {
        for &id in &ids {
            let store = &store;
            s.spawn(move || {
                for round in 0..20 {
                    let current = store.get(id).unwrap();
                    let request = ChangeRequest::new(vec![ChangeSpec::text(
                        "beta",
                        1,
                        format!("beta{}", round % 2),
                    )])
                    .with_expected(current.version);
                    // Sole writer for this id, so the tag is never stale
                    store.apply_changes(id, &request).unwrap();
                    let restore = ChangeRequest::new(vec![ChangeSpec::range(6, 11, "beta")]);
                    store.apply_changes(id, &restore).unwrap();
                }
            });
        }
    });

    for id in ids {
        assert_eq!(&*store.get(id).unwrap().content, "alpha beta");
    }
    assert_eq!(store.search("beta", &SearchOptions::new()).unwrap().total, 6);
    assert_eq!(store.search("beta0", &SearchOptions::new()).unwrap().total, 0);
}

#[test]
fn test_readers_see_whole_generations() {
    const A: &str = "red red red";
    const B: &str = "blue blue blue blue";

    let store = DocumentStore::default();
    let doc = store.create("Flip", A).unwrap();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..200 {
                let current = store.get(doc.id).unwrap();
                let next = if i % 2 == 0 { B } else { A };
                let len = current.char_count();
                let request = ChangeRequest::new(vec![ChangeSpec::range(0, len, next)])
                    .with_expected(current.version);
                store.apply_changes(doc.id, &request).unwrap();
            }
            done.store(true, Ordering::SeqCst);
        });

        for _ in 0..3 {
            s.spawn(|| {
                while !done.load(Ordering::SeqCst) {
                    let current = store.get(doc.id).unwrap();
                    assert!(&*current.content == A || &*current.content == B);
                    assert!(current.is_consistent());

                    let results = store.search("red blue", &SearchOptions::new()).unwrap();
                    let hit = &results.results[0];
                    // Postings and snippets come from the same generation
                    let snippet = hit.context.join(" ");
                    match hit.score {
                        3 => assert!(snippet.contains("red") && !snippet.contains("blue")),
                        4 => assert!(snippet.contains("blue") && !snippet.contains("red")),
                        other => panic!("mixed generation score {}", other),
                    }
                }
            });
        }
    });
}

#[test]
fn test_racing_loads_of_one_id() {
    for _ in 0..500 {
        let store = DocumentStore::default();
        let barrier = Barrier::new(2);

        let results: Vec<_> = thread::scope(|s| {
            let handles: Vec<_> = ["first draft", "second draft"]
                .into_iter()
                .map(|body| {
                    let (store, barrier) = (&store, &barrier);
                    s.spawn(move || {
                        barrier.wait();
                        store.load(Document::new(DocumentId(7), "Row", body))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(DbError::DocumentExists(DocumentId(7))))));

        // The published row and the index agree with the winner
        let current = store.get(DocumentId(7)).unwrap();
        assert_eq!(&current, winners[0]);
        let loser = if current.content.starts_with("first") { "second" } else { "first" };
        assert_eq!(store.search(loser, &SearchOptions::new()).unwrap().total, 0);
        assert_eq!(store.len(), 1);
    }
}

#[test]
fn test_create_racing_load_never_shares_an_id() {
    for _ in 0..500 {
        let store = DocumentStore::default();
        let barrier = Barrier::new(2);

        let (created, loaded) = thread::scope(|s| {
            let create = s.spawn(|| {
                barrier.wait();
                store.create("Created", "created body")
            });
            let load = s.spawn(|| {
                barrier.wait();
                store.load(Document::new(DocumentId(1), "Loaded", "loaded body"))
            });
            (create.join().unwrap(), load.join().unwrap())
        });

        // Whichever ran first owns id 1; create never reuses a live id
        let created = created.unwrap();
        match loaded {
            Ok(loaded) => {
                assert_ne!(created.id, loaded.id);
                assert_eq!(store.len(), 2);
                assert_eq!(store.get(loaded.id).unwrap(), loaded);
            }
            Err(err) => {
                assert_eq!(err, DbError::DocumentExists(DocumentId(1)));
                assert_eq!(created.id, DocumentId(1));
                assert_eq!(store.len(), 1);
            }
        }
        assert_eq!(store.get(created.id).unwrap(), created);
        assert_eq!(store.search("created", &SearchOptions::new()).unwrap().total, 1);
    }
}
