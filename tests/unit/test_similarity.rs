use ragline::error::RagError;
use ragline::models::Embedding;
use ragline::services::cosine_similarity;

fn emb(values: &[f32]) -> Embedding {
    Embedding::new(values.to_vec()).unwrap()
}

#[test]
fn test_reflexive() {
    for values in [&[1.0, 2.0, 3.0][..], &[-0.5, 0.25][..], &[7.0][..]] {
        let e = emb(values);
        let score = cosine_similarity(&e, &e).unwrap();
        assert!((score - 1.0).abs() < 1e-6, "score {score} for {values:?}");
    }
}

#[test]
fn test_symmetric() {
    let a = emb(&[0.3, -1.2, 4.0, 0.0]);
    let b = emb(&[2.0, 0.1, -0.7, 5.5]);
    assert_eq!(
        cosine_similarity(&a, &b).unwrap(),
        cosine_similarity(&b, &a).unwrap()
    );
}

#[test]
fn test_known_values() {
    let x = emb(&[1.0, 0.0]);
    let y = emb(&[0.0, 1.0]);
    let neg = emb(&[-1.0, 0.0]);

    assert!(cosine_similarity(&x, &y).unwrap().abs() < 1e-6);
    assert!((cosine_similarity(&x, &neg).unwrap() + 1.0).abs() < 1e-6);
}

#[test]
fn test_scale_invariant_and_bounded() {
    let a = emb(&[1.0, 2.0, 2.0]);
    let b = emb(&[10.0, 20.0, 20.0]);
    assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-6);

    let samples = [
        emb(&[0.9, -0.1, 0.3]),
        emb(&[-3.0, 2.0, 1.0]),
        emb(&[0.0, 0.0, 1.0]),
        emb(&[5.0, 5.0, -5.0]),
    ];
    for p in &samples {
        for q in &samples {
            let score = cosine_similarity(p, q).unwrap();
            assert!((-1.0 - 1e-6..=1.0 + 1e-6).contains(&score));
        }
    }
}

#[test]
fn test_mismatched_lengths() {
    let error = cosine_similarity(&emb(&[1.0, 2.0]), &emb(&[1.0, 2.0, 3.0])).unwrap_err();
    assert!(matches!(
        error,
        RagError::DimensionMismatch {
            expected: 2,
            actual: 3
        }
    ));
}

#[test]
fn test_zero_vector() {
    let error = cosine_similarity(&emb(&[0.0, 0.0]), &emb(&[1.0, 0.0])).unwrap_err();
    assert!(matches!(error, RagError::EmptyVector));
}

#[test]
fn test_embedding_rejects_invalid_values() {
    assert!(Embedding::new(vec![]).is_err());
    assert!(Embedding::new(vec![1.0, f32::NAN]).is_err());
    assert!(Embedding::new(vec![f32::INFINITY]).is_err());
}

#[test]
fn test_large_finite_components() {
    let a = emb(&[1e20, 1.0]);
    let score = cosine_similarity(&a, &a).unwrap();
    assert!((score - 1.0).abs() < 1e-6, "score {score}");

    let b = emb(&[-1e20, 3.0]);
    let score = cosine_similarity(&a, &b).unwrap();
    assert!((score + 1.0).abs() < 1e-6, "score {score}");
}
