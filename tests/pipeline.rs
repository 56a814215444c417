//! Integration test: загрузка -> разбиение -> трансформация -> повторное применение препроцессора

use std::path::Path;

use mlproject::components::train_test_split;
use mlproject::components::transformation::split_target;
use mlproject::config::{IngestionConfig, TransformationConfig};
use mlproject::utils::{load_object, read_csv, write_csv};
use mlproject::{
    build_pipeline, pipeline, DataTransformation, FeatureSchema, Fit, FittedPreprocessor,
    PipelineConfig, Table, Transform,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const HEADERS: [&str; 8] = [
    "gender",
    "race_ethnicity",
    "parental_level_of_education",
    "lunch",
    "test_preparation_course",
    "math_score",
    "reading_score",
    "writing_score",
];

fn create_student_dataset(n: usize, seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    let genders = ["female", "male"];
    let groups = ["group A", "group B", "group C", "group D", "group E"];
    let education = [
        "some high school",
        "high school",
        "some college",
        "associate's degree",
        "bachelor's degree",
        "master's degree",
    ];
    let lunch = ["standard", "free/reduced"];
    let prep = ["none", "completed"];

    let rows = (0..n)
        .map(|_| {
            let reading: u32 = rng.gen_range(20..=100);
            let writing: u32 = (reading + rng.gen_range(0..10)).min(100);
            let math: u32 = (reading * 9 / 10 + rng.gen_range(0..15)).min(100);
            vec![
                genders.choose(&mut rng).unwrap().to_string(),
                groups.choose(&mut rng).unwrap().to_string(),
                education.choose(&mut rng).unwrap().to_string(),
                lunch.choose(&mut rng).unwrap().to_string(),
                prep.choose(&mut rng).unwrap().to_string(),
                math.to_string(),
                reading.to_string(),
                writing.to_string(),
            ]
        })
        .collect();

    Table::new(HEADERS.iter().map(|h| h.to_string()).collect(), rows).unwrap()
}

fn config_for(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        ingestion: IngestionConfig {
            source_path: dir.join("data/stud.csv"),
            artifacts_dir: dir.join("artifacts"),
            ..IngestionConfig::default()
        },
        transformation: TransformationConfig {
            preprocessor_path: dir.join("artifacts/preprocessor.json"),
        },
        ..PipelineConfig::default()
    }
}

fn prepare_source(dir: &Path, table: &Table) {
    std::fs::create_dir_all(dir.join("data")).unwrap();
    write_csv(table, dir.join("data/stud.csv")).unwrap();
}

#[test]
fn test_full_pipeline_1000_rows() {
    let dir = tempfile::tempdir().unwrap();
    prepare_source(dir.path(), &create_student_dataset(1000, 1));
    let config = config_for(dir.path());

    let output = pipeline::run(&config).unwrap();
    let train = &output.transformation.train;
    let test = &output.transformation.test;

    assert_eq!(train.nrows(), 800);
    assert_eq!(test.nrows(), 200);
    assert_eq!(train.ncols(), test.ncols());
    assert!(output.ingestion.raw_path.exists());

    let fitted: FittedPreprocessor = load_object(&output.transformation.preprocessor_path).unwrap();
    // 2 числовых + 2 + 5 + 6 + 2 + 2 категорий + цель
    let n_categories: usize = fitted
        .categorical()
        .encoder()
        .categories()
        .iter()
        .map(Vec::len)
        .sum();
    assert_eq!(n_categories, 17);
    assert_eq!(train.ncols(), 2 + n_categories + 1);

    // Перезагруженный препроцессор воспроизводит признаки тестовой выборки
    let test_df = read_csv(&output.ingestion.test_path).unwrap();
    let (test_features, _) = split_target(&test_df, "math_score").unwrap();
    let reproduced = fitted.transform(&test_features).unwrap();
    let n_features = fitted.n_features_out();
    for i in 0..test.nrows() {
        for j in 0..n_features {
            assert_eq!(reproduced[[i, j]], test[[i, j]]);
        }
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let table = create_student_dataset(200, 3);

    let first_dir = tempfile::tempdir().unwrap();
    prepare_source(first_dir.path(), &table);
    let first = pipeline::run(&config_for(first_dir.path())).unwrap();

    let second_dir = tempfile::tempdir().unwrap();
    prepare_source(second_dir.path(), &table);
    let second = pipeline::run(&config_for(second_dir.path())).unwrap();

    assert_eq!(
        read_csv(&first.ingestion.train_path).unwrap(),
        read_csv(&second.ingestion.train_path).unwrap()
    );
    assert_eq!(first.transformation.train, second.transformation.train);
    assert_eq!(first.transformation.test, second.transformation.test);
}

#[test]
fn test_learned_state_ignores_test_partition() {
    let dir = tempfile::tempdir().unwrap();
    let table = create_student_dataset(100, 5);
    let (train, test) = train_test_split(&table, 0.2, 42).unwrap();

    // Тестовая выборка с другими числами и новыми категориями
    let perturbed_rows = test
        .rows()
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row[0] = "unknown".to_string();
            row[3] = "premium".to_string();
            row[6] = "0".to_string();
            row[7] = "100".to_string();
            row
        })
        .collect();
    let perturbed = Table::new(test.headers().to_vec(), perturbed_rows).unwrap();

    let train_path = dir.path().join("train.csv");
    let test_path = dir.path().join("test.csv");
    let perturbed_path = dir.path().join("test_perturbed.csv");
    write_csv(&train, &train_path).unwrap();
    write_csv(&test, &test_path).unwrap();
    write_csv(&perturbed, &perturbed_path).unwrap();

    let run_with = |test_csv: &Path, artifact: &str| {
        let config = TransformationConfig {
            preprocessor_path: dir.path().join(artifact),
        };
        DataTransformation::new(config, FeatureSchema::default())
            .run(&train_path, test_csv)
            .unwrap()
    };
    let baseline = run_with(&test_path, "baseline.json");
    let other = run_with(&perturbed_path, "perturbed.json");

    let baseline_fitted: FittedPreprocessor = load_object(&baseline.preprocessor_path).unwrap();
    let other_fitted: FittedPreprocessor = load_object(&other.preprocessor_path).unwrap();
    assert_eq!(baseline_fitted, other_fitted);
    assert_eq!(baseline.train, other.train);
    assert_ne!(baseline.test, other.test);
}

#[test]
fn test_transform_is_repeatable() {
    let table = create_student_dataset(100, 6);
    let (train_features, _) = split_target(&table, "math_score").unwrap();
    let fitted = build_pipeline(&FeatureSchema::default())
        .unwrap()
        .fit(&train_features)
        .unwrap();

    let once = fitted.transform(&train_features).unwrap();
    let twice = fitted.transform(&train_features).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_missing_values_imputed_from_training_data() {
    let dir = tempfile::tempdir().unwrap();
    let table = create_student_dataset(50, 9);
    let headers = table.headers().to_vec();
    let rows = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut row = row.clone();
            if i % 5 == 0 {
                row[0] = String::new();
                row[7] = "NA".to_string();
            }
            row
        })
        .collect();
    prepare_source(dir.path(), &Table::new(headers, rows).unwrap());

    let output = pipeline::run(&config_for(dir.path())).unwrap();
    assert!(output.transformation.train.iter().all(|v| v.is_finite()));
    assert!(output.transformation.test.iter().all(|v| v.is_finite()));
}

#[test]
fn test_empty_source_fails_with_data_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(dir.path().join("data/stud.csv"), HEADERS.join(",") + "\n").unwrap();

    let err = pipeline::run(&config_for(dir.path())).unwrap_err();
    assert_eq!(err.kind(), mlproject::ErrorKind::Data);
    assert!(!dir.path().join("artifacts/preprocessor.json").exists());
}
