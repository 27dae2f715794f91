use conjugation_trainer::domain::model::{ExerciseOrigin, Selection, Tense};
use conjugation_trainer::utils::validation::Validate;
use conjugation_trainer::{CliConfig, ExerciseGenerator, Prefetcher, TomlConfig};
use clap::Parser;
use httpmock::prelude::*;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn went_only() -> Selection {
    Selection::new(vec![Tense::PastSimple], vec!["To Go".to_string()])
}

fn config_for(server: &MockServer, library: bool) -> TomlConfig {
    let content = format!(
        r#"
[practice]
round_size = 3
seed = 11

[corpus]
endpoint = "{}"
timeout_seconds = 5

[library]
enabled = {}
"#,
        server.url("/search"),
        library
    );
    TomlConfig::from_toml_str(&content).unwrap()
}

#[tokio::test]
async fn test_corpus_then_templates() -> anyhow::Result<()> {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(GET).path("/search").query_param("query", "went");
        then.status(200).json_body(serde_json::json!({
            "results": [
                {"text": "We went to the market.", "translations": [[{"text": "Fuimos al mercado."}]]}
            ]
        }));
    });

    let config = config_for(&server, false);
    config.validate()?;
    let generator = ExerciseGenerator::from_config(&config)?;
    assert_eq!(generator.source_names(), vec!["corpus"]);

    let exercises = generator.get_exercises(3, &went_only()).await?;

    // 只有一個 pattern，所以只查一次外部來源，其餘由模板補齊
    search.assert_hits(1);
    assert_eq!(exercises.len(), 3);
    assert_eq!(exercises[0].origin, ExerciseOrigin::Corpus);
    assert_eq!(exercises[0].spanish_sentence, "Fuimos al mercado.");
    assert!(exercises[1..]
        .iter()
        .all(|e| e.origin == ExerciseOrigin::Template));
    assert!(exercises.iter().all(|e| e.answer.eq_ignore_ascii_case("went")));

    let unique: HashSet<&str> = exercises.iter().map(|e| e.spanish_sentence.as_str()).collect();
    assert_eq!(unique.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_corpus_falls_back_to_library() -> anyhow::Result<()> {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(502);
    });

    let generator = ExerciseGenerator::from_config(&config_for(&server, true))?;
    let exercises = generator.get_exercises(2, &went_only()).await?;

    search.assert_hits(1);
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0].origin, ExerciseOrigin::Library);
    assert_eq!(
        exercises[0].english_sentence(),
        "She went to bed early last night."
    );
    Ok(())
}

#[tokio::test]
async fn test_offline_flag_never_touches_network() -> anyhow::Result<()> {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(serde_json::json!({"results": []}));
    });

    let mut file = NamedTempFile::new()?;
    write!(
        file,
        "[corpus]\nendpoint = \"{}\"\n\n[practice]\ntenses = [\"Past Simple\"]\nverbs = [\"go\"]\n",
        server.url("/search")
    )?;

    let path = file.path().to_string_lossy().to_string();
    let cli = CliConfig::parse_from(["conjugation-trainer", "--config", &path, "--offline", "--round-size", "4"]);
    let config = cli.load()?;
    config.validate()?;

    let generator = ExerciseGenerator::from_config(&config)?;
    let selection = generator
        .catalog()
        .resolve_selection(&config.practice.tenses, &config.practice.verbs)?;
    assert_eq!(selection, went_only());

    let exercises = generator.get_exercises(4, &selection).await?;

    search.assert_hits(0);
    assert_eq!(exercises.len(), 4);
    assert!(exercises
        .iter()
        .all(|e| matches!(e.origin, ExerciseOrigin::Library | ExerciseOrigin::Template)));
    Ok(())
}

#[tokio::test]
async fn test_prefetcher_serves_rounds_from_corpus() -> anyhow::Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/search");
        then.status(200).json_body(serde_json::json!({
            "results": [
                {"text": "They went out.", "translations": [[{"text": "Salieron."}]]}
            ]
        }));
    });

    let generator = Arc::new(ExerciseGenerator::from_config(&config_for(&server, false))?);
    let mut prefetcher = Prefetcher::new(generator, 2);
    let selection = went_only();

    let first = prefetcher.next_round(&selection).await?;
    prefetcher.start(&selection);
    let second = prefetcher.next_round(&selection).await?;

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    assert_eq!(first[0].origin, ExerciseOrigin::Corpus);
    assert_eq!(second[0].origin, ExerciseOrigin::Corpus);
    Ok(())
}
