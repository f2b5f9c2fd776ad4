use retrieval::tokenizer::{Script, Tokenizer};

#[test]
fn it_lowercases_and_filters_russian_stopwords() {
    let words = Tokenizer::new(Script::Cyrillic).tokenize("Поиск и генерация, это Очень просто!");
    assert_eq!(words, vec!["поиск", "генерация", "просто"]);
}

#[test]
fn it_rejects_foreign_script_and_short_words() {
    let words = Tokenizer::new(Script::Cyrillic).tokenize("Docker я контейнеры API");
    assert_eq!(words, vec!["контейнеры"]);
}

#[test]
fn it_keeps_duplicates_in_order() {
    let words = Tokenizer::new(Script::Latin).tokenize("chase cats, chase mice");
    assert_eq!(words, vec!["chase", "cats", "chase", "mice"]);
}

#[test]
fn it_filters_english_stopwords() {
    let words = Tokenizer::new(Script::Latin).tokenize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(words.contains(&"fox".to_string()));
}

#[test]
fn it_normalizes_compatibility_forms() {
    // Fullwidth letters fold to ASCII under NFKC.
    let words = Tokenizer::new(Script::Latin).tokenize("ＲＵＳＴ");
    assert_eq!(words, vec!["rust"]);
}

#[test]
fn empty_input_yields_nothing() {
    assert!(Tokenizer::default().tokenize("").is_empty());
    assert!(Tokenizer::default().tokenize("  ,,, !!").is_empty());
}

#[test]
fn term_frequencies_count_repeats() {
    let tf = Tokenizer::new(Script::Latin).term_frequencies("rust rust tokio");
    assert_eq!(tf.get("rust"), Some(&2));
    assert_eq!(tf.get("tokio"), Some(&1));
}
