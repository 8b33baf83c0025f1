use proptest::prelude::*;
use scriptorium_canon::{Canon, Testament, BOOKS, CANON_SIZE};

proptest! {
    #[test]
    fn prop_every_valid_reference_resolves(
        book_idx in 0..CANON_SIZE,
        chapter_seed in 0u16..200,
        verse in 1u32..180,
    ) {
        let book = &BOOKS[book_idx];
        let chapter = chapter_seed % book.chapters + 1;
        let canon = Canon::timeline();

        let input = format!("{} {}:{}", canon.name_of(book), chapter, verse);
        let resolved = canon.resolve(&input);

        prop_assert!(resolved.is_some(), "{} did not resolve", input);
        let resolved = resolved.unwrap();
        prop_assert!(canon.book(&resolved.book).is_some());
        prop_assert_eq!(resolved.chapter, chapter);
        prop_assert_eq!(resolved.verse, verse);
    }

    #[test]
    fn prop_garbage_never_panics(input in ".{0,40}") {
        let _ = Canon::timeline().resolve(&input);
        let _ = Canon::passage_lookup().resolve(&input);
    }

    #[test]
    fn prop_positions_stay_in_unit_interval(name in "[A-Za-z ]{0,20}") {
        let position = Canon::timeline().canon_position(&name).value();
        prop_assert!((0.0..1.0).contains(&position));
    }
}

#[test]
fn test_positions_strictly_increase_in_canon_order() {
    let canon = Canon::timeline();
    let positions: Vec<_> = canon
        .books()
        .map(|b| canon.canon_position(canon.name_of(b)))
        .collect();

    assert_eq!(positions.len(), CANON_SIZE);
    assert_eq!(positions[0].value(), 0.0);
    for pair in positions.windows(2) {
        assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
    }
}

#[test]
fn test_first_and_last_reference_of_canon() {
    let canon = Canon::timeline();
    assert!(canon.resolve("Genesis 1:1").is_some());
    assert!(canon.resolve("Revelation 22:21").is_some());
}

#[test]
fn test_both_psalms_spellings_at_their_call_sites() {
    let timeline = Canon::timeline().resolve("Psalms 22:1").unwrap();
    let passage = Canon::passage_lookup().resolve("Psalm 22:1").unwrap();

    assert_eq!(timeline.book, "Psalms");
    assert_eq!(passage.book, "Psalm");
    assert_eq!(timeline.chapter, passage.chapter);
    assert_eq!(
        Canon::timeline().canon_position("Psalms"),
        Canon::passage_lookup().canon_position("Psalm")
    );
}

#[test]
fn test_testament_membership_is_total_over_canon_only() {
    let canon = Canon::timeline();
    let old = canon
        .books()
        .filter(|b| canon.testament(canon.name_of(b)) == Some(Testament::Old))
        .count();
    let new = canon
        .books()
        .filter(|b| canon.testament(canon.name_of(b)) == Some(Testament::New))
        .count();

    assert_eq!(old, 39);
    assert_eq!(new, 27);
    assert_eq!(canon.testament("Tobit"), None);
}

#[test]
fn test_reference_serializes_as_struct() {
    let reference = Canon::timeline().resolve("John 3:16").unwrap();
    let json = serde_json::to_value(&reference).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "book": "John", "chapter": 3, "verse": 16 })
    );
}
