use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pasim::{ingest_text, Detector, DetectorConfig, IngestConfig, SourceFile};

fn statements(range: std::ops::Range<usize>, salt: usize) -> String {
    let mut out = String::new();
    for i in range {
        match (i + salt) % 4 {
            0 => out.push_str(&format!("  a := a + {i};\n")),
            1 => out.push_str(&format!("  b := b * {i} + a;\n")),
            2 => out.push_str(&format!("  if a > {i} then c := c - b;\n")),
            _ => out.push_str(&format!("  while c < {i} do c := c + a;\n")),
        }
    }
    out
}

fn program_of(body: &str) -> String {
    format!("program Bench;\nvar a, b, c: integer;\nbegin\n{body}  writeln(a, b, c);\nend.\n")
}

fn sources() -> (SourceFile, SourceFile) {
    let ingest_cfg = IngestConfig::default();
    // Two programs sharing their first half.
    let left = program_of(&statements(0..200, 0));
    let right = {
        let mut body = statements(0..100, 0);
        body.push_str(&statements(100..200, 1));
        program_of(&body)
    };
    (
        ingest_text("left.pas", &left, &ingest_cfg).unwrap(),
        ingest_text("right.pas", &right, &ingest_cfg).unwrap(),
    )
}

fn bench_detect_pair(c: &mut Criterion) {
    let detector = Detector::new(DetectorConfig::default()).unwrap();
    let (left, right) = sources();

    c.bench_function("detect_pair_200stmt", |b| {
        b.iter(|| {
            let result = detector.detect(black_box(&left), black_box(&right)).unwrap();
            black_box(result.overall_similarity)
        })
    });
}

fn bench_detect_batch(c: &mut Criterion) {
    let detector = Detector::new(DetectorConfig::default()).unwrap();
    let ingest_cfg = IngestConfig::default();
    let files: Vec<SourceFile> = (0..8)
        .map(|i| {
            let text = program_of(&statements(0..120, i));
            ingest_text(&format!("file{i}.pas"), &text, &ingest_cfg).unwrap()
        })
        .collect();

    c.bench_function("detect_batch_8files", |b| {
        b.iter(|| {
            let batch = detector.detect_batch(black_box(&files)).unwrap();
            black_box(batch.suspicious_pairs)
        })
    });
}

criterion_group!(benches, bench_detect_pair, bench_detect_batch);
criterion_main!(benches);
