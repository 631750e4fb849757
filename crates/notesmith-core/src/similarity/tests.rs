#[cfg(test)]
#[allow(clippy::module_inception)]
mod tests {
    use crate::note::Note;
    use crate::similarity::{
        cosine, heuristics, ngram, CorpusStats, OptimizedSimilarityEngine, Prefilter,
        RankingPipeline, Signal, SimilarityEngine, SimilarityResult,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};

    const EPSILON: f64 = 1e-9;

    const ESSAY: &str = "Rust programs manage memory without a garbage collector. \
        However, the borrow checker enforces strict ownership rules. \
        Therefore, most memory bugs are caught at compile time.";

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn create_note(id: &str, title: &str, tags: &[&str], content: &str, hours: i64) -> Note {
        let ts = base_time() + Duration::hours(hours);
        Note::new(id, title, content)
            .with_tags(tags.iter().copied())
            .with_timestamps(ts, ts)
    }

    fn sample_corpus() -> Vec<Note> {
        vec![
            create_note("n-1", "Rust ownership", &["rust", "memory"], ESSAY, 0),
            create_note(
                "n-2",
                "Rust borrowing",
                &["rust"],
                "The borrow checker enforces ownership. References must not outlive data.",
                2,
            ),
            create_note(
                "n-3",
                "Garbage collection",
                &["memory", "java"],
                "A garbage collector frees memory automatically. Pauses can hurt latency?",
                30,
            ),
            create_note("n-4", "Groceries", &["home"], "- milk\n- eggs\n- bread", 200),
            create_note("n-5", "", &[], "", 5),
            create_note(
                "n-6",
                "Weekly review",
                &["work"],
                "Review the week. Plan the next one. Close stale tasks before Friday.",
                1,
            ),
            create_note(
                "n-7",
                "Rust lifetimes",
                &["rust", "memory"],
                "Lifetimes describe how long references stay valid. The compiler checks them.",
                3,
            ),
            create_note("n-8", "ownership", &[], "ownership ownership ownership", 400),
        ]
    }

    fn pipelines() -> Vec<Box<dyn RankingPipeline>> {
        vec![
            Box::new(SimilarityEngine::default()),
            Box::new(OptimizedSimilarityEngine::default()),
        ]
    }

    fn ids<'a>(results: &'a [SimilarityResult<'_>]) -> Vec<&'a str> {
        results.iter().map(|r| r.note.id.as_str()).collect()
    }

    #[test]
    fn test_results_never_contain_target() {
        let corpus = sample_corpus();
        for pipeline in pipelines() {
            for target in &corpus {
                let results = pipeline.find_similar_notes(target, &corpus, corpus.len());
                assert!(
                    results.iter().all(|r| r.note.id != target.id),
                    "{} appeared in its own results",
                    target.id
                );
            }
        }
    }

    #[test]
    fn test_target_excluded_by_id_not_reference() {
        let corpus = sample_corpus();
        let detached = corpus[0].clone();
        let results = SimilarityEngine::default().find_similar_notes(&detached, &corpus, 10);
        assert!(results.iter().all(|r| r.note.id != detached.id));
    }

    #[test]
    fn test_scores_within_bounds() {
        let corpus = sample_corpus();
        for pipeline in pipelines() {
            for target in &corpus {
                for result in pipeline.find_similar_notes(target, &corpus, corpus.len()) {
                    assert!(result.score > 0.0 && result.score <= 1.0 + EPSILON);
                    assert_eq!(result.breakdown.len(), Signal::LOCAL.len());
                    for entry in result.breakdown.iter() {
                        assert!(
                            (0.0..=1.0 + EPSILON).contains(&entry.score),
                            "{} = {} for {} vs {}",
                            entry.signal,
                            entry.score,
                            target.id,
                            result.note.id
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_all_pairwise_signals_bounded() {
        let corpus = sample_corpus();
        let engine = SimilarityEngine::default();
        let stats = CorpusStats::build(&corpus);

        for a in &corpus {
            for b in &corpus {
                for entry in engine.score_pair(&stats, a, b).iter() {
                    assert!((0.0..=1.0 + EPSILON).contains(&entry.score));
                }
            }
        }
    }

    #[test]
    fn test_results_sorted_and_truncated() {
        let corpus = sample_corpus();
        for pipeline in pipelines() {
            let results = pipeline.find_similar_notes(&corpus[0], &corpus, 3);
            assert!(results.len() <= 3);
            assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn test_monotonic_truncation() {
        let corpus = sample_corpus();
        for pipeline in pipelines() {
            for n in 0..corpus.len() {
                let shorter = pipeline.find_similar_notes(&corpus[0], &corpus, n);
                let longer = pipeline.find_similar_notes(&corpus[0], &corpus, n + 1);
                assert!(shorter.len() <= longer.len());
                assert_eq!(shorter[..], longer[..shorter.len()]);
            }
        }
    }

    #[test]
    fn test_signals_are_symmetric() {
        let corpus = sample_corpus();
        for a in &corpus {
            for b in &corpus {
                assert_eq!(cosine::cosine_similarity(a, b), cosine::cosine_similarity(b, a));
                assert_eq!(ngram::ngram_similarity(a, b), ngram::ngram_similarity(b, a));
                assert_eq!(heuristics::tag_jaccard(a, b), heuristics::tag_jaccard(b, a));
                assert_eq!(
                    heuristics::title_similarity(a, b),
                    heuristics::title_similarity(b, a)
                );
            }
        }
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let corpus = sample_corpus();
        for pipeline in pipelines() {
            let first = pipeline.find_similar_notes(&corpus[1], &corpus, 5);
            let second = pipeline.find_similar_notes(&corpus[1], &corpus, 5);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_single_note_corpus_is_empty() {
        let corpus = vec![create_note("only", "Lonely", &["solo"], ESSAY, 0)];
        for pipeline in pipelines() {
            assert!(pipeline.find_similar_notes(&corpus[0], &corpus, 5).is_empty());
        }
    }

    #[test]
    fn test_empty_corpus_is_empty() {
        let target = create_note("t", "Target", &[], ESSAY, 0);
        for pipeline in pipelines() {
            assert!(pipeline.find_similar_notes(&target, &[], 5).is_empty());
        }
    }

    #[test]
    fn test_shared_tag_without_content_overlap() {
        let target = create_note("a", "Standup", &["work"], "Discussed deployment blockers.", 0);
        let other = create_note("b", "Invoices", &["work"], "Pay electricity bill tomorrow.", 0);
        let corpus = vec![target.clone(), other];

        let results = SimilarityEngine::default().find_similar_notes(&target, &corpus, 5);

        assert_eq!(ids(&results), vec!["b"]);
        assert_eq!(results[0].breakdown.get(Signal::Tags), Some(1.0));
        assert!(results[0].score >= 0.15);
    }

    #[test]
    fn test_identical_notes_rank_first() {
        let target = create_note("t", "Rust ownership", &["rust"], ESSAY, 0);
        let twin = create_note("twin", "Rust ownership", &["rust"], ESSAY, 0);
        let unrelated = create_note("u", "Pasta", &["food"], "Boil water then add pasta.", 500);
        let corpus = vec![target.clone(), unrelated, twin];

        let results = SimilarityEngine::default().find_similar_notes(&target, &corpus, 5);
        let best = &results[0];

        assert_eq!(best.note.id, "twin");
        assert_eq!(best.breakdown.get(Signal::Title), Some(1.0));
        assert!((best.breakdown.get(Signal::Cosine).unwrap() - 1.0).abs() < EPSILON);
        assert!((best.breakdown.get(Signal::Tfidf).unwrap() - 1.0).abs() < EPSILON);
        assert!((best.score - 1.0).abs() < EPSILON, "got {}", best.score);
    }

    #[test]
    fn test_empty_target_content_only_metadata_contributes() {
        let target = create_note("t", "Rust ownership", &["rust"], "", 0);
        let mut corpus = sample_corpus();
        corpus.push(target.clone());

        let engine = SimilarityEngine::default();
        let stats = CorpusStats::build(&corpus);

        for candidate in &corpus {
            let breakdown = engine.score_pair(&stats, &target, candidate);
            assert_eq!(breakdown.get(Signal::Cosine), Some(0.0));
            assert_eq!(breakdown.get(Signal::NGram), Some(0.0));
            assert_eq!(breakdown.get(Signal::Tfidf), Some(0.0));
            assert_eq!(breakdown.get(Signal::Coherence), Some(0.0));
            assert_eq!(breakdown.get(Signal::Jaccard), Some(0.0));
        }

        let results = engine.find_similar_notes(&target, &corpus, 10);
        assert!(results.iter().any(|r| r.note.id == "n-1"));
    }

    #[test]
    fn test_prefilter_keeps_tagged_notes_among_many() {
        let base = base_time();
        let target = create_note("target", "Project kickoff", &["alpha"], "Kickoff agenda for launch", 0);

        let mut corpus = vec![target.clone()];
        for i in 0..100 {
            let id = format!("c-{i:03}");
            let note = if i % 20 == 7 {
                create_note(&id, &format!("Tagged {i}"), &["alpha"], "unrelated filler text", 0)
            } else {
                Note::new(id, format!("Filler {i}"), format!("filler sentence number {i}"))
                    .with_tags([format!("tag-{i}")])
                    .with_timestamps(base - Duration::days(60), base - Duration::days(60))
            };
            corpus.push(note);
        }

        let survivors = Prefilter::default().select(&target, &corpus);
        assert!(survivors.len() <= 20);

        let tagged: Vec<_> = corpus
            .iter()
            .filter(|n| n.id != "target" && n.tags.contains("alpha"))
            .collect();
        assert_eq!(tagged.len(), 5);
        for note in tagged {
            assert!(survivors.iter().any(|s| s.id == note.id), "{} dropped", note.id);
        }
    }

    #[test]
    fn test_optimized_matches_full_when_all_survive_and_vocabulary_is_shared() {
        // Every candidate survives the pre-filter and every term is in every
        // note, so IDF is 0 for both corpora and the remaining signals agree
        let corpus: Vec<Note> = (0..5)
            .map(|i| {
                create_note(
                    &format!("n-{i}"),
                    "Release notes",
                    &["release"],
                    &format!("Version {i} ships faster builds and clearer errors."),
                    i,
                )
            })
            .collect();

        let full = SimilarityEngine::default().find_similar_notes(&corpus[0], &corpus, 10);
        let optimized =
            OptimizedSimilarityEngine::default().find_similar_notes(&corpus[0], &corpus, 10);

        assert_eq!(ids(&full), ids(&optimized));
        for (f, o) in full.iter().zip(&optimized) {
            assert_eq!(f.breakdown.get(Signal::Tfidf), Some(0.0));
            assert_eq!(o.breakdown.get(Signal::Tfidf), Some(0.0));
            assert!((f.score - o.score).abs() < EPSILON);
        }
    }
}
