use retrieval::{Index, RetrievalConfig, Script};
use std::sync::Arc;
use std::thread;

fn latin_index() -> Index {
    Index::new(&RetrievalConfig { script: Script::Latin, ..RetrievalConfig::default() })
}

fn contents(docs: &[retrieval::Document]) -> Vec<&str> {
    docs.iter().map(|d| d.content.as_str()).collect()
}

#[test]
fn empty_index_returns_nothing() {
    let index = latin_index();
    assert!(index.search_similar("anything", 5).is_empty());
    assert_eq!(index.stats().document_count, 0);
    assert_eq!(index.stats().vocabulary_size, 0);
}

#[test]
fn end_to_end_chase_cats() {
    let index = latin_index();
    for text in ["cats chase mice", "dogs chase cats", "birds fly south"] {
        index.add_document(text);
    }
    let hits = index.search_scored("chase cats", 2);
    assert_eq!(hits.len(), 2);
    // Both documents contain both query terms, so they tie and keep insertion order.
    assert_eq!(hits[0].score, hits[1].score);
    assert_eq!(hits[0].document.content, "cats chase mice");
    assert_eq!(hits[1].document.content, "dogs chase cats");
    assert!(index.search_similar("chase cats", 10).iter().all(|d| d.content != "birds fly south"));
}

#[test]
fn duplicate_content_gets_distinct_ids_and_stable_slots() {
    let index = latin_index();
    let a = index.add_document("rust tokio serde");
    let slots: Vec<_> = ["rust", "tokio", "serde"].iter().map(|t| index.term_slot(t)).collect();
    let b = index.add_document("rust tokio serde");
    index.add_document("axum hyper rust");

    assert_ne!(a, b);
    assert_eq!(a, "doc_0");
    assert_eq!(b, "doc_1");
    let after: Vec<_> = ["rust", "tokio", "serde"].iter().map(|t| index.term_slot(t)).collect();
    assert_eq!(slots, after);
    assert_eq!(index.term_slot("axum"), Some(3));
    assert_eq!(index.stats().vocabulary_size, 5);
}

#[test]
fn self_similarity_is_near_one() {
    let index = latin_index();
    index.add_document("vector search finds similar texts");
    index.add_document("docker packages applications");
    let hits = index.search_scored("vector search finds similar texts", 1);
    assert_eq!(hits[0].document.content, "vector search finds similar texts");
    assert!((hits[0].score - 1.0).abs() < 1e-5);
}

#[test]
fn identical_documents_rank_by_insertion() {
    let index = latin_index();
    index.add_document("unrelated words here");
    let first = index.add_document("garbage collector runtime");
    let second = index.add_document("runtime garbage collector");
    let hits = index.search_similar("garbage collector", 5);
    assert_eq!(hits.iter().map(|d| d.id.as_str()).collect::<Vec<_>>(), vec![first.as_str(), second.as_str()]);
}

#[test]
fn top_k_truncates_and_returns_best() {
    let index = latin_index();
    index.add_document("alpha beta gamma delta epsilon");
    index.add_document("alpha beta gamma delta");
    index.add_document("alpha beta gamma");
    index.add_document("alpha beta");
    index.add_document("alpha zeta theta iota kappa");

    let hits = index.search_similar("alpha beta", 2);
    assert_eq!(contents(&hits), vec!["alpha beta", "alpha beta gamma"]);
    assert_eq!(index.search_similar("alpha beta", 100).len(), 5);
    assert!(index.search_similar("alpha beta", 0).is_empty());
}

#[test]
fn top_k_larger_than_matches_returns_all_matches() {
    let index = latin_index();
    index.add_document("cats chase mice");
    index.add_document("dogs chase cats");
    index.add_document("cats sleep");
    index.add_document("birds fly south");
    assert_eq!(index.search_similar("cats", 100).len(), 3);
}

#[test]
fn empty_document_never_matches() {
    let index = latin_index();
    let id = index.add_document("");
    index.add_document("cats chase mice");
    assert_eq!(index.get(&id).map(|d| d.tokens.len()), Some(0));
    let hits = index.search_similar("cats chase mice", 10);
    assert_eq!(contents(&hits), vec!["cats chase mice"]);
}

#[test]
fn custom_floor_filters_weak_matches() {
    let index = latin_index();
    index.add_document("alpha beta gamma delta epsilon zeta eta theta");
    assert_eq!(index.search_scored_with_floor("alpha", 5, 0.0).len(), 1);
    assert!(index.search_scored_with_floor("alpha", 5, 0.9).is_empty());
}

#[test]
fn zero_score_documents_never_match_below_zero_floor() {
    let index = latin_index();
    index.add_document("");
    index.add_document("cats chase mice");
    assert!(index.search_scored_with_floor("zebra", 10, -0.5).is_empty());
    assert!(index.search_scored_with_floor("cats", 10, f32::NAN).is_empty());
    let hits: Vec<_> = index.search_scored_with_floor("cats", 10, -0.5).into_iter().map(|h| h.document).collect();
    assert_eq!(contents(&hits), vec!["cats chase mice"]);
}

#[test]
fn stats_display_matches_counts() {
    let index = latin_index();
    index.add_document("cats chase mice");
    let stats = index.stats();
    assert_eq!(stats.document_count, 1);
    assert_eq!(stats.vocabulary_size, 3);
    assert_eq!(stats.to_string(), "1 docs, 3 words");
}

#[test]
fn concurrent_writers_get_unique_ids() {
    let index = Arc::new(latin_index());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let index = Arc::clone(&index);
            thread::spawn(move || {
                (0..10)
                    .map(|i| {
                        let id = index.add_document(&format!("writer{t} entry{i} shared"));
                        let hits = index.search_scored("shared", 3);
                        assert!(!hits.is_empty());
                        for hit in &hits {
                            assert!(hit.document.content.contains("shared"));
                            assert!(hit.score > 0.0 && hit.score <= 1.0 + 1e-6);
                        }
                        let stats = index.stats();
                        assert!(stats.document_count >= i + 1);
                        assert!(stats.vocabulary_size >= 3);
                        id
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<String> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 80);
    assert_eq!(index.stats().document_count, 80);
}
