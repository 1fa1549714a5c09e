use canon_engine::{Card, CardMeta, EmbeddingClient, PackBias, Retriever};

fn card(id: &str, pack: &str, weight: f32, text: &str) -> Card {
    Card {
        id: id.to_string(),
        pack: pack.to_string(),
        weight,
        text: text.to_string(),
        meta: CardMeta {
            title: id.to_string(),
            ..CardMeta::default()
        },
    }
}

fn sample_cards() -> Vec<Card> {
    vec![
        card(
            "startup-default-alive",
            "11_startup_canon",
            1.2,
            "startup fundraising burn rate default alive growth",
        ),
        card(
            "virtue-courage",
            "15_virtue_ethics",
            1.2,
            "courage virtue practical wisdom habituation character",
        ),
        card(
            "cynefin-domains",
            "18_sensemaking_cynefin",
            1.0,
            "complex complicated chaotic clear sensemaking probe",
        ),
    ]
}

#[test]
fn retrieval_is_deterministic_for_identical_inputs() {
    let retriever = Retriever::new(sample_cards(), EmbeddingClient::hash());
    let bias = PackBias::from_entries([("11_startup_canon", 1.25f32)]).unwrap();
    let first = retriever.retrieve("startup burn rate", 3, &bias).unwrap();
    let second = retriever.retrieve("startup burn rate", 3, &bias).unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.card.id, b.card.id);
        assert_eq!(a.score, b.score);
    }
}

#[test]
fn returns_at_most_top_k_sorted_by_non_increasing_score() {
    let retriever = Retriever::new(sample_cards(), EmbeddingClient::hash());
    let hits = retriever
        .retrieve("courage and character", 2, &PackBias::none())
        .unwrap();
    assert!(hits.len() <= 2);
    for window in hits.windows(2) {
        assert!(window[0].score >= window[1].score);
    }
}

#[test]
fn top_k_larger_than_corpus_returns_every_card() {
    let retriever = Retriever::new(sample_cards(), EmbeddingClient::hash());
    let hits = retriever
        .retrieve("anything at all", 50, &PackBias::none())
        .unwrap();
    assert_eq!(hits.len(), 3);
}

#[test]
fn card_queried_against_itself_scores_its_own_weight() {
    // Cosine similarity of a text against itself is 1.0 once both
    // sides go through the same normalization, so the final score
    // collapses to the card weight.
    let cards = vec![card(
        "only",
        "p",
        1.2,
        "a singular evidence card about antifragility",
    )];
    let text = cards[0].text.clone();
    let retriever = Retriever::new(cards, EmbeddingClient::hash());
    let hits = retriever.retrieve(&text, 1, &PackBias::none()).unwrap();
    assert_eq!(hits.len(), 1);
    assert!((hits[0].score - 1.2).abs() < 1e-3);
}

#[test]
fn concurrent_first_retrievals_build_the_index_exactly_once() {
    let client = EmbeddingClient::hash();
    let observer = client.clone();
    let retriever = Retriever::new(sample_cards(), client);

    const THREADS: usize = 8;
    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    retriever
                        .retrieve("growth courage sensemaking", 3, &PackBias::none())
                        .unwrap()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    for hits in &results[1..] {
        assert_eq!(hits.len(), results[0].len());
        for (a, b) in hits.iter().zip(results[0].iter()) {
            assert_eq!(a.card.id, b.card.id);
            assert_eq!(a.score, b.score);
        }
    }
    // One batched request for the matrix no matter how many threads
    // raced the first build, plus one request per query embedding.
    assert_eq!(observer.batch_calls(), 1 + THREADS);
}

#[test]
fn pack_bias_raises_scores_in_that_pack_only() {
    let retriever = Retriever::new(sample_cards(), EmbeddingClient::hash());
    // Query shares at least one token with every card so no baseline
    // similarity is zero.
    let query = "growth courage sensemaking";
    let plain = retriever.retrieve(query, 3, &PackBias::none()).unwrap();
    let bias = PackBias::from_entries([("15_virtue_ethics", 1.25f32)]).unwrap();
    let biased = retriever.retrieve(query, 3, &bias).unwrap();

    for hit in &biased {
        let baseline = plain
            .iter()
            .find(|other| other.card.id == hit.card.id)
            .unwrap();
        assert!(baseline.score > 0.0);
        if hit.card.pack == "15_virtue_ethics" {
            assert!(hit.score > baseline.score);
            assert!((hit.score / baseline.score - 1.25).abs() < 1e-5);
        } else {
            assert!((hit.score - baseline.score).abs() < 1e-6);
        }
    }
}
