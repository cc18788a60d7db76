use lingproc::{WORDS_PER_MINUTE, WordBudget, max_words, word_count};

#[test]
fn blank_text_has_no_words() {
    assert_eq!(word_count(""), 0);
    assert_eq!(word_count("   "), 0);
    assert_eq!(word_count("\n\t \r\n"), 0);
}

#[test]
fn counts_whitespace_separated_runs() {
    assert_eq!(word_count("hello"), 1);
    assert_eq!(word_count("  hello   world \n"), 2);
    assert_eq!(word_count("Welcome back!\n\nToday: photosynthesis -- plants & light."), 8);
    assert_eq!(word_count("tab\tseparated\u{00A0}nbsp"), 3);
}

#[test]
fn limit_scales_with_duration() {
    assert_eq!(WORDS_PER_MINUTE, 150);
    assert_eq!(max_words(1), 150);
    assert_eq!(max_words(3), 450);
    assert_eq!(max_words(0), 0);
    assert_eq!(WordBudget::new(2).max_words(), 300);
}

#[test]
fn check_reports_count_and_limit() {
    let budget = WordBudget::new(1);
    let exact = vec!["word"; 150].join(" ");
    let check = budget.check(&exact);
    assert_eq!((check.words, check.limit), (150, 150));
    assert!(check.within());

    let over = vec!["word"; 151].join(" ");
    let check = budget.check(&over);
    assert_eq!(check.words, 151);
    assert!(!check.within());

    assert!(budget.check("").within());
}

#[test]
fn check_serializes_for_logging() {
    let check = WordBudget::new(1).check("one two");
    let json = serde_json::to_value(check).unwrap();
    assert_eq!(json["words"], 2);
    assert_eq!(json["limit"], 150);
}
