use pasim::{
    detect_texts, fingerprint_tokens, ingest_text, lex, DetectorConfig, FingerprintConfig,
    IngestConfig, LexConfig, PlagiarismResult,
};

fn ingest_defaults() -> IngestConfig {
    IngestConfig::default()
}

fn detector_defaults() -> DetectorConfig {
    DetectorConfig::default()
}

const STATS: &str = "\
program Stats;
var
  data: array[1..20] of integer;
  i, total, biggest: integer;
begin
  total := 0;
  biggest := 0;
  for i := 1 to 20 do
    data[i] := (i * 7) mod 13;
  for i := 20 downto 1 do
  begin
    total := total + data[i];
    if data[i] > biggest then
      biggest := data[i];
  end;
  writeln('total: ', total);
  writeln('biggest: ', biggest);
end.
";

const OTHER: &str = "\
program Fact;
var n, f, k: integer;
begin
  f := 1;
  readln(n);
  for k := 2 to n do
    f := f * k;
  writeln(f);
end.
";

fn detect(left: &str, right: &str) -> PlagiarismResult {
    detect_texts(
        "left.pas",
        left,
        "right.pas",
        right,
        &ingest_defaults(),
        &detector_defaults(),
    )
    .expect("detection should succeed")
}

/// Everything except the wall-clock timing field.
fn comparable(result: &PlagiarismResult) -> serde_json::Value {
    let mut value = serde_json::to_value(result).unwrap();
    value
        .as_object_mut()
        .unwrap()
        .remove("processingTime")
        .expect("processingTime field present");
    value
}

#[test]
fn repeated_runs_are_bit_identical() {
    let first = detect(STATS, OTHER);
    let second = detect(STATS, OTHER);
    let third = detect(STATS, OTHER);

    assert_eq!(comparable(&first), comparable(&second));
    assert_eq!(comparable(&second), comparable(&third));
}

#[test]
fn similarity_is_symmetric_and_coverages_swap() {
    let ab = detect(STATS, OTHER);
    let ba = detect(OTHER, STATS);

    assert_eq!(ab.overall_similarity, ba.overall_similarity);
    assert_eq!(ab.syntactic_similarity, ba.syntactic_similarity);
    assert_eq!(ab.coverage1, ba.coverage2);
    assert_eq!(ab.coverage2, ba.coverage1);
    assert_eq!(ab.shared_fragments, ba.shared_fragments);
}

#[test]
fn byte_identical_copy_scores_exactly_one() {
    let result = detect(STATS, STATS);
    assert_eq!(result.overall_similarity, 1.0);
    assert_eq!(result.coverage1, 1.0);
    assert_eq!(result.coverage2, 1.0);
    assert!(result.is_plagiarism);
}

#[test]
fn renaming_identifiers_changes_nothing() {
    let renamed = STATS
        .replace("data", "values")
        .replace("total", "accum")
        .replace("biggest", "peak");

    let against_other = detect(STATS, OTHER);
    let renamed_against_other = detect(&renamed, OTHER);
    assert_eq!(
        against_other.overall_similarity,
        renamed_against_other.overall_similarity
    );

    let direct = detect(STATS, &renamed);
    assert_eq!(direct.overall_similarity, 1.0);
}

#[test]
fn comments_and_blank_lines_change_nothing() {
    let commented = STATS
        .replace("begin\n", "begin\n  { accumulate and track the maximum }\n")
        .replace("end.\n", "(* done *)\nend.\n")
        .replace("  total := 0;\n", "\n  total := 0; // reset\n\n");

    let plain = detect(STATS, OTHER);
    let noisy = detect(&commented, OTHER);
    assert_eq!(plain.overall_similarity, noisy.overall_similarity);

    let direct = detect(STATS, &commented);
    assert_eq!(direct.overall_similarity, 1.0);
}

#[test]
fn winnowing_density_stays_below_bound() {
    // A long, periodic program: statement pair repeats 200 times, giving a
    // hash stream of period 12 against a window of 15.
    let mut body = String::from("program Dense;\nvar x, y: integer;\nbegin\n");
    for _ in 0..200 {
        body.push_str("  x := x + 1; y := y - 2;\n");
    }
    body.push_str("end.\n");

    let lexed = lex("dense.pas", &body, &LexConfig::default()).unwrap();
    let texts: Vec<&str> = lexed.texts().collect();

    let cfg = FingerprintConfig::default();
    let fp = fingerprint_tokens(&texts, &cfg).unwrap();

    let kgram_count = texts.len() - cfg.k + 1;
    assert_eq!(fp.meta.kgram_count, kgram_count);

    let bound = (2 * kgram_count).div_ceil(cfg.window + 1) + 1;
    assert!(
        fp.len() <= bound,
        "selected {} fingerprints from {kgram_count} k-grams, bound is {bound}",
        fp.len()
    );
}

#[test]
fn fragment_fingerprints_never_exceed_overlap() {
    let appended = {
        let mut b = STATS.to_string();
        for i in 0..40 {
            b.push_str(&format!("junk{i} := {i} xor {};\n", i + 1));
        }
        b
    };

    let result = detect(STATS, &appended);
    let total_in_fragments: usize = result
        .mapped_fragments
        .iter()
        .map(|m| m.shared_fingerprints)
        .sum();
    assert!(total_in_fragments <= result.shared_fragments);
    assert!(result.total_shared_lines >= result.significant_mapped_fragments as u32);
}

#[test]
fn raising_the_threshold_is_monotone() {
    let mut was_plagiarism = true;
    for threshold in [0.0, 0.1, 0.3, 0.5, 0.7, 0.9, 1.0] {
        let cfg = detector_defaults().with_threshold(Some(threshold));
        let result = detect_texts(
            "a.pas",
            STATS,
            "b.pas",
            OTHER,
            &ingest_defaults(),
            &cfg,
        )
        .unwrap();
        assert!(
            was_plagiarism || !result.is_plagiarism,
            "threshold {threshold} flipped the verdict from false back to true"
        );
        was_plagiarism = result.is_plagiarism;
    }
}

#[test]
fn fingerprints_identical_for_equivalent_inputs() {
    // CRLF endings and comment noise do not reach the fingerprint layer.
    let crlf = STATS.replace('\n', "\r\n");
    let ingest_cfg = ingest_defaults();

    let plain = ingest_text("a.pas", STATS, &ingest_cfg).unwrap();
    let windows = ingest_text("b.pas", &crlf, &ingest_cfg).unwrap();
    assert_eq!(plain.text, windows.text);

    let lex_cfg = LexConfig::default();
    let fp_cfg = FingerprintConfig::default();

    let ta = lex(&plain.name, &plain.text, &lex_cfg).unwrap();
    let tb = lex(&windows.name, &windows.text, &lex_cfg).unwrap();

    let fa = fingerprint_tokens(&ta.texts().collect::<Vec<_>>(), &fp_cfg).unwrap();
    let fb = fingerprint_tokens(&tb.texts().collect::<Vec<_>>(), &fp_cfg).unwrap();
    assert_eq!(fa.selected, fb.selected);
}
