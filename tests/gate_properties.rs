use proptest::prelude::*;
use rask_hec_relay::gate::{ContentGate, ToxicityCheck, Wordlist, word_checks};
use rask_hec_relay::test_support::CountingScorer;
use std::sync::Arc;

const BLOCKED: &[&str] = &["fuck", "shit", "bitch", "asshole", "bastard"];

const CLEAN: &[&str] = &[
    "hello", "world", "deploy", "finished", "render", "message", "status", "relay", "event",
    "health", "splunk", "queue", "green", "build", "release", "today", "thanks", "great",
    "jackals", "shifty", "banker",
];

fn gate_with_scorer() -> (ContentGate, Arc<CountingScorer>) {
    let scorer = Arc::new(CountingScorer::new(0.0));
    let mut checks = word_checks(Arc::new(Wordlist::builtin()), 0.94).unwrap();
    checks.push(Box::new(ToxicityCheck::new(scorer.clone(), 0.7)));
    (ContentGate::new(checks).unwrap(), scorer)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

/// A blocked word with random letter case and optional punctuation after
/// each letter.
fn disguised_word() -> impl Strategy<Value = String> {
    (
        prop::sample::select(BLOCKED),
        prop::collection::vec(
            (any::<bool>(), prop::sample::select(vec!["", "", ".", "*", "-", "_", "!!", ",", "~"])),
            16,
        ),
    )
        .prop_map(|(word, styles)| {
            word.chars()
                .zip(styles)
                .map(|(c, (upper, punct))| {
                    let c = if upper { c.to_ascii_uppercase() } else { c };
                    format!("{c}{punct}")
                })
                .collect()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn disguised_blocked_words_never_reach_the_scorer(
        word in disguised_word(),
        prefix in prop::sample::select(CLEAN),
        suffix in prop::sample::select(CLEAN),
    ) {
        let (gate, scorer) = gate_with_scorer();
        let message = format!("{prefix} {word} {suffix}");
        let verdict = runtime().block_on(gate.evaluate(&message));
        prop_assert!(verdict.is_blocked(), "{message:?} -> {verdict:?}");
        prop_assert_eq!(scorer.calls(), 0);
    }

    #[test]
    fn clean_sentences_are_approved(
        words in prop::collection::vec(prop::sample::select(CLEAN), 1..12),
        shout in any::<bool>(),
    ) {
        let (gate, scorer) = gate_with_scorer();
        let mut message = words.join(" ");
        if shout {
            message = message.to_uppercase();
        }
        let verdict = runtime().block_on(gate.evaluate(&message));
        prop_assert!(verdict.is_approved(), "{message:?} -> {verdict:?}");
        prop_assert_eq!(scorer.calls(), 1);
    }
}
