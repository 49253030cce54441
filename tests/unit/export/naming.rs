use super::*;

#[test]
fn filenames_are_slugged_and_stamped() {
    assert_eq!(
        suggested_filename_at("Round Badge!", "png", 1_700_000_000_123),
        "round-badge-1700000000123.png"
    );
    assert_eq!(suggested_filename_at("  ", "svg", 5), "badge-5.svg");
}

#[test]
fn current_time_stamp_is_used() {
    let before = chrono::Utc::now().timestamp_millis();
    let name = suggested_filename("Sticker", "pdf");
    let stamp: i64 = name
        .trim_start_matches("sticker-")
        .trim_end_matches(".pdf")
        .parse()
        .unwrap();
    assert!(stamp >= before);
}
