use rfm_core::{classify, Segment};

const LABELS: [&str; 8] = [
    "VIP", "Loyal", "Big Spender", "New", "Promising", "At Risk", "Lapsed", "Hibernating",
];

#[test]
fn every_score_triple_gets_a_known_label() {
    for bins in 3..=7u8 {
        for r in 1..=bins {
            for f in 1..=bins {
                for m in 1..=bins {
                    let seg = classify(r, f, m, bins);
                    assert!(
                        LABELS.contains(&seg.label()),
                        "({r},{f},{m}) bins={bins} gave unknown label {}", seg.label()
                    );
                }
            }
        }
    }
}

/// Top of every scale satisfies VIP, Loyal and Big Spender; VIP wins.
#[test]
fn perfect_scores_are_vip_for_four_bins_and_up() {
    for bins in 4..=7u8 {
        assert_eq!(classify(bins, bins, bins, bins), Segment::Vip, "bins={bins}");
    }
}

/// With 3 bins, `high` is still 4, so no score can reach it.
#[test]
fn three_bins_cannot_produce_vip() {
    for r in 1..=3u8 {
        for f in 1..=3u8 {
            for m in 1..=3u8 {
                assert_ne!(classify(r, f, m, 3), Segment::Vip);
            }
        }
    }
}

#[test]
fn rule_table_with_five_bins() {
    let cases = [
        ((5, 5, 5), Segment::Vip),
        ((4, 4, 4), Segment::Vip),
        ((4, 5, 1), Segment::Loyal),
        ((1, 5, 5), Segment::BigSpender),
        ((3, 4, 5), Segment::BigSpender),
        ((5, 1, 1), Segment::New),
        ((5, 2, 3), Segment::New),
        ((4, 1, 1), Segment::Promising),
        ((4, 2, 5), Segment::Promising),
        ((2, 4, 1), Segment::AtRisk),
        ((1, 5, 1), Segment::AtRisk),
        ((1, 3, 3), Segment::Lapsed),
        ((3, 3, 3), Segment::Hibernating),
        ((4, 3, 3), Segment::Hibernating),
    ];
    for ((r, f, m), expected) in cases {
        assert_eq!(classify(r, f, m, 5), expected, "({r},{f},{m})");
    }
}

#[test]
fn high_threshold_tracks_bins_minus_one_for_seven_bins() {
    assert_eq!(classify(6, 6, 6, 7), Segment::Vip);
    assert_eq!(classify(5, 7, 7, 7), Segment::BigSpender);
    assert_eq!(classify(6, 7, 1, 7), Segment::Loyal);
    assert_eq!(classify(7, 2, 7, 7), Segment::New);
    assert_eq!(classify(6, 2, 7, 7), Segment::Promising);
}

#[test]
fn labels_serialize_as_display_text() {
    let json = serde_json::to_string(&Segment::BigSpender).unwrap();
    assert_eq!(json, "\"Big Spender\"");
    let back: Segment = serde_json::from_str("\"At Risk\"").unwrap();
    assert_eq!(back, Segment::AtRisk);
}
