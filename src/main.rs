use clap::Parser;
use conjugation_trainer::app::PracticeApp;
use conjugation_trainer::domain::model::Tense;
use conjugation_trainer::domain::ports::ConfigProvider;
use conjugation_trainer::utils::error::ErrorSeverity;
use conjugation_trainer::utils::{logger, validation::Validate};
use conjugation_trainer::{CliConfig, ExerciseGenerator, Prefetcher, Result, TomlConfig, TrainerError};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting conjugation-trainer");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Practice failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<()> {
    if cli.list_tenses {
        for tense in Tense::sorted() {
            println!("{}", tense);
        }
        return Ok(());
    }

    let config = load_config(cli)?;
    let generator = ExerciseGenerator::from_config(&config)?;

    if let Some(term) = &cli.list_verbs {
        let matches = generator.catalog().search(term);
        if matches.is_empty() {
            println!("No verbs match '{}'", term);
        }
        for verb in matches {
            println!("{} ({})", verb.infinitive, verb.spanish);
        }
        return Ok(());
    }

    // 未指定時預設全選
    let tenses = or_all(&config.practice.tenses);
    let verbs = or_all(&config.practice.verbs);
    let selection = generator.catalog().resolve_selection(&tenses, &verbs)?;
    if !selection.is_startable() {
        return Err(TrainerError::NoEligiblePatterns);
    }
    tracing::info!(
        "🎯 Practicing {} tense(s) across {} verb(s)",
        selection.tenses.len(),
        selection.verbs.len()
    );

    let round_size = config.round_size();
    let generator = Arc::new(generator);

    if cli.json {
        let exercises = generator.get_exercises(round_size, &selection).await?;
        println!("{}", serde_json::to_string_pretty(&exercises)?);
        return Ok(());
    }

    let prefetcher = Prefetcher::new(generator, round_size);
    let stdin = std::io::stdin();
    let mut app = PracticeApp::new(prefetcher, selection, stdin.lock(), std::io::stdout());
    let outcome = app.run().await?;
    tracing::debug!("Outcome: {:?}", outcome);

    Ok(())
}

fn load_config(cli: &CliConfig) -> Result<TomlConfig> {
    let config = cli.load()?;

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        return Err(e);
    }
    Ok(config)
}

fn or_all(names: &[String]) -> Vec<String> {
    if names.is_empty() {
        vec!["all".to_string()]
    } else {
        names.to_vec()
    }
}
