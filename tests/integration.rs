use perplexity_guard::{
    analyze, burstiness, check_input, classify, Analyzer, Error, FrequencyTable, Label, Score,
    Thresholds, UnigramModel, WordListCorpus,
};

#[test]
fn familiar_prose_has_finite_perplexity() {
    let text = "The city by the river. People walk to work along the water every day.";
    let result = analyze(text);
    assert!(
        matches!(result.perplexity, Score::Value(v) if v.is_finite() && v > 0.0),
        "Known words should give a finite perplexity, got {}",
        result.perplexity
    );
    assert!(matches!(result.burstiness, Score::Value(_)));
}

#[test]
fn everyday_sentence_scores_against_builtin_corpus() {
    let text = "I went to the store yesterday and bought some milk, bread and eggs for breakfast.";
    let result = analyze(text);
    assert_eq!(result.token_count, 8);
    assert!(
        matches!(result.perplexity, Score::Value(v) if v.is_finite()),
        "An ordinary sentence should be in vocabulary, got {}",
        result.perplexity
    );
}

#[test]
fn underscore_only_tokens_are_not_words() {
    let result = analyze("foo_bar __ ___ _");
    assert_eq!(result.token_count, 1);
    let labels: Vec<&str> = result.most_common.bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["foo_bar"]);
}

#[test]
fn unknown_words_give_infinite_perplexity() {
    let result = analyze("Quantum blockchain synergy leverages hyperscale paradigms.");
    assert_eq!(result.perplexity, Score::Infinite);
    assert_eq!(result.label, Label::NotGenerated);
}

#[test]
fn stopwords_only_text_is_degenerate() {
    let result = analyze("the the the");
    assert_eq!(result.token_count, 0);
    assert_eq!(result.perplexity, Score::Undefined);
    assert_eq!(result.burstiness, Score::Undefined);
    assert_eq!(result.label, Label::NotGenerated);
    assert!(result.most_common.is_empty());
    assert!(result.repeated.is_empty());
}

#[test]
fn empty_input_is_rejected_before_scoring() {
    assert!(matches!(check_input("   \n"), Err(Error::EmptyInput)));
}

#[test]
fn charts_exclude_stopwords_and_punctuation() {
    let text = "The river, the river, and the stone! Stone walls. A river.";
    let result = analyze(text);
    let labels: Vec<&str> = result
        .most_common
        .bars
        .iter()
        .map(|b| b.label.as_str())
        .collect();
    assert_eq!(labels, vec!["river", "stone", "walls"]);
    assert_eq!(result.most_common.bars[0].count, 3);
    assert!(result.repeated.bars.iter().all(|b| b.count > 1));
    assert_eq!(result.repeated.bars.len(), 2);
}

#[test]
fn charts_are_capped_at_ten_bars() {
    let text = (0..30)
        .map(|i| format!("word{i} word{i}"))
        .collect::<Vec<_>>()
        .join(" ");
    let result = analyze(&text);
    assert_eq!(result.most_common.bars.len(), 10);
    assert_eq!(result.repeated.bars.len(), 10);
    assert_eq!(result.repeated.bars[0].label, "word0");
}

#[test]
fn burstiness_example_values() {
    let table = FrequencyTable::from_tokens(&["a", "a", "b"]);
    let score = burstiness(&table).value().unwrap();
    assert!((score - 0.1111).abs() < 1e-3, "got {score}");
}

#[test]
fn classification_examples() {
    assert_eq!(classify(50.0, 0.5), Label::Generated);
    assert_eq!(classify(200.0, 0.5), Label::NotGenerated);
    assert_eq!(classify(50.0, 2.0), Label::NotGenerated);
}

#[test]
fn uniform_familiar_text_is_flagged_as_generated() {
    let model = UnigramModel::train(&WordListCorpus::new(
        "sun rain sun wind rain sun snow wind".split_whitespace(),
    ))
    .unwrap();
    let analyzer = Analyzer::new(&model, Thresholds::default());
    let result = analyzer.analyze("Sun, rain, wind.");
    assert_eq!(result.label, Label::Generated);

    let strict = Analyzer::new(&model, Thresholds::new(2.0, 1.0).unwrap());
    assert_eq!(strict.analyze("Sun, rain, wind.").label, Label::NotGenerated);
}

#[test]
fn json_output_is_valid() {
    let result = analyze("The river runs past the mill. The river is cold.");
    let json = serde_json::to_string_pretty(&result).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed.get("token_count").is_some());
    assert!(parsed.get("distinct_tokens").is_some());
    assert!(parsed.get("perplexity").is_some());
    assert!(parsed.get("burstiness").is_some());
    assert_eq!(parsed["label"], "not-generated");
    assert_eq!(parsed["thresholds"]["max_perplexity"], 100.0);
    assert_eq!(parsed["most_common"]["kind"], "most_common");
    assert_eq!(parsed["repeated"]["bars"][0]["label"], "river");
    assert_eq!(parsed["repeated"]["bars"][0]["count"], 2);
}

#[test]
fn degenerate_scores_serialize_as_strings() {
    let result = analyze("... the !!");
    let parsed = serde_json::to_value(&result).unwrap();
    assert_eq!(parsed["perplexity"], "undefined");
    assert_eq!(parsed["burstiness"], "undefined");
}
