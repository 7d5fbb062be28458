use criterion::{black_box, criterion_group, criterion_main, Criterion};

use eduflex_core::difficulty::classify;
use eduflex_core::model::{AnswerLedger, Question, QuizOption, SubjectWeaknessMap};
use eduflex_core::scoring::score;
use eduflex_core::subjects::Subject;
use eduflex_core::weakness::analyze_weakness;

fn make_quiz(n: usize) -> (Vec<Question>, AnswerLedger) {
    let questions = (0..n)
        .map(|i| Question {
            id: format!("bench-{i}"),
            subject_id: "bench".into(),
            prompt: format!("Question {i}"),
            options: ["A", "B", "C", "D"]
                .iter()
                .map(|l| QuizOption::new(*l, format!("option {l}")))
                .collect(),
            correct_label: Some("C".into()),
        })
        .collect();
    let answers = (0..n).map(|i| (i, if i % 3 == 0 { "b" } else { " c " })).collect();
    (questions, answers)
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");

    for n in [10, 100, 1000] {
        let (questions, answers) = make_quiz(n);
        group.bench_function(format!("questions={n}"), |b| {
            b.iter(|| score(black_box(Some(questions.as_slice())), black_box(&answers)))
        });
    }

    group.finish();
}

fn bench_classify_and_weakness(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    group.bench_function("sweep", |b| {
        b.iter(|| {
            (0..=1000)
                .map(|p| classify(black_box(p as f64 / 10.0)))
                .count()
        })
    });

    let scores =
        SubjectWeaknessMap::from_scores((0..200).map(|i| (format!("subject-{i}"), (i % 97) as f64)))
            .unwrap();
    group.bench_function("weakness_200_subjects", |b| {
        b.iter(|| analyze_weakness(black_box(&scores), black_box(Some(50.0))))
    });

    group.bench_function("standardize_subject", |b| {
        b.iter(|| Subject::standardize(black_box("Introduction to Business Analytics")))
    });

    group.finish();
}

criterion_group!(benches, bench_score, bench_classify_and_weakness);
criterion_main!(benches);
