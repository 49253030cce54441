use super::*;

#[test]
fn only_one_panel_is_open() {
    let mut s = ExpansionState::new();
    s.toggle("fill");
    s.toggle("stroke");
    assert!(s.is_expanded("stroke"));
    assert!(!s.is_expanded("fill"));
    assert_eq!(s.expanded(), Some("stroke"));
}

#[test]
fn toggle_and_close() {
    let mut s = ExpansionState::new();
    s.toggle("font");
    s.toggle("font");
    assert_eq!(s.expanded(), None);

    s.toggle("font");
    s.close("other");
    assert!(s.is_expanded("font"));
    s.close("font");
    assert_eq!(s, ExpansionState::default());
}
