use goteam::model::{StripError, strip};

#[test]
fn test_order_of_ranges_does_not_matter() {
    let text = "Pay rent !1 #home @friday";
    let ascending = strip(text, &[9..12, 12..18, 18..25]).unwrap();
    let shuffled = strip(text, &[12..18, 18..25, 9..12]).unwrap();
    assert_eq!(ascending, "Pay rent ");
    assert_eq!(ascending, shuffled);
}

#[test]
fn test_text_outside_ranges_is_kept_in_order() {
    let text = "a[x]b[yy]c[zzz]d";
    assert_eq!(strip(text, &[10..15, 1..4, 5..9]).unwrap(), "abcd");
    assert_eq!(strip(text, &[]).unwrap(), text);
    assert_eq!(strip(text, &[0..text.len()]).unwrap(), "");
}

#[test]
fn test_empty_and_abutting_ranges_are_fine() {
    assert_eq!(strip("abcdef", &[2..2, 0..2, 2..4]).unwrap(), "ef");
}

#[test]
fn test_overlap_is_rejected() {
    let err = strip("abcdef", &[0..3, 2..5]).unwrap_err();
    assert_eq!(err, StripError::Overlap(0..3, 2..5));
    assert!(err.to_string().contains("overlap"));
}

#[test]
fn test_invalid_ranges_are_rejected() {
    assert!(matches!(
        strip("abc", &[1..9]),
        Err(StripError::OutOfBounds { .. })
    ));
    #[allow(clippy::reversed_empty_ranges)]
    let inverted = 2..1;
    assert!(matches!(strip("abc", &[inverted]), Err(StripError::Inverted(_))));
    // 'é' is two bytes; offset 2 splits it.
    assert!(matches!(
        strip("héllo", &[0..2]),
        Err(StripError::NotCharBoundary(_))
    ));
}
