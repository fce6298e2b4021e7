use affine_digraph::{
    encrypt, mod_inverse, recover_key, AffineKey, Alphabet, CandidateSearch, CrackerConfig,
    PairingStrategy, SearchOutcome,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SAMPLE: &str = include_str!("fixtures/sample_plaintext.txt");

fn sample() -> &'static str {
    SAMPLE.trim()
}

#[test]
fn recovers_known_key_from_russian_text() {
    let config = CrackerConfig::default();
    let ciphertext = encrypt(sample(), AffineKey::new(7, 3), &config.alphabet).unwrap();

    let recovery = match recover_key(&ciphertext, &config).unwrap() {
        SearchOutcome::Found(recovery) => recovery,
        other => panic!("expected a key, got {other:?}"),
    };

    assert_eq!(recovery.key, AffineKey::new(7, 3));
    assert_eq!((recovery.key.a * mod_inverse(7, 961).unwrap()) % 961, 1);
    assert_eq!(recovery.plaintext, sample());
    assert!(recovery.entropy.symbol < 4.5);
    assert!(recovery.entropy.digraph < 4.2);
}

#[test]
fn recovery_is_deterministic() {
    let config = CrackerConfig::default();
    let ciphertext = encrypt(sample(), AffineKey::new(7, 3), &config.alphabet).unwrap();

    let first = recover_key(&ciphertext, &config).unwrap();
    let second = recover_key(&ciphertext, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn recovers_other_keys() {
    let config = CrackerConfig::default();
    for key in [AffineKey::new(11, 100), AffineKey::new(2, 5), AffineKey::new(30, 900)] {
        let ciphertext = encrypt(sample(), key, &config.alphabet).unwrap();
        let outcome = recover_key(&ciphertext, &config).unwrap();
        let recovery = outcome.recovery().unwrap();
        assert_eq!(recovery.key, key);
        assert_eq!(recovery.plaintext, sample());
    }
}

#[test]
fn all_pairs_strategy_also_recovers() {
    let config = CrackerConfig::default().with_pairing(PairingStrategy::AllPairs);
    let ciphertext = encrypt(sample(), AffineKey::new(7, 3), &config.alphabet).unwrap();

    let outcome = recover_key(&ciphertext, &config).unwrap();
    assert_eq!(outcome.recovery().unwrap().key, AffineKey::new(7, 3));
}

#[test]
fn declined_candidates_resume_the_search() {
    let config = CrackerConfig::default();
    let ciphertext = encrypt(sample(), AffineKey::new(7, 3), &config.alphabet).unwrap();

    let mut search = CandidateSearch::new(&config, &ciphertext).unwrap();
    let first = search.next().unwrap();
    let tried = search.candidates_tried();

    // Every later hit comes strictly after the first one
    if search.next().is_some() {
        assert!(search.candidates_tried() > tried);
    }
    assert_eq!(first.key, AffineKey::new(7, 3));
}

#[test]
fn random_noise_rarely_yields_a_key() {
    let config = CrackerConfig::default();
    let symbols = Alphabet::russian().symbols().to_vec();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let trials = 20;
    let false_positives = (0..trials)
        .filter(|_| {
            let noise: String = (0..400).map(|_| symbols[rng.gen_range(0..symbols.len())]).collect();
            matches!(recover_key(&noise, &config).unwrap(), SearchOutcome::Found(_))
        })
        .count();

    assert!(false_positives <= 1, "{false_positives} of {trials} noise texts passed");
}
