use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use photo_rename_core::{
    app_paths, load_config, rename_entries, save_config, traverse_dir_for_images,
    validate_date_format, RenameEntry, ScanOutcome,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "photo-rename")]
#[command(about = "EXIFの撮影日時でJPG写真のファイル名に日付プレフィックスを付けます")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rename(RenameArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct RenameArgs {
    /// 対象フォルダ
    input: PathBuf,
    /// 日付プレフィックスの書式 (設定より優先)
    #[arg(long)]
    format: Option<String>,
    /// リネームから外すエントリ番号 (一覧の#列)
    #[arg(long)]
    skip: Vec<usize>,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    Set(ConfigSetArgs),
}

#[derive(Debug, Args)]
struct ConfigSetArgs {
    #[arg(long)]
    output_date_format: Option<String>,
    #[arg(long)]
    table_date_format: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Set(args) => cmd_config_set(args),
        },
    }
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let mut config = load_config()?;
    if let Some(format) = args.format {
        config.output_date_format = format;
    }
    validate_date_format(&config.output_date_format)?;
    validate_date_format(&config.table_date_format)?;

    let mut outcome = traverse_dir_for_images(&args.input, &config)?;

    for issue in &outcome.issues {
        eprintln!("警告: {}", issue.error);
    }

    if outcome.entries.is_empty() {
        eprintln!("リネーム対象が見つかりませんでした: {}", args.input.display());
        return Ok(());
    }

    apply_skips(&mut outcome.entries, &args.skip)?;

    match args.output {
        OutputFormat::Json => print_json(&outcome)?,
        OutputFormat::Table => print_table(&outcome, &config.table_date_format),
    }

    if args.apply {
        let selected: Vec<_> = outcome
            .entries
            .iter()
            .filter(|entry| entry.selected)
            .cloned()
            .collect();
        let report = rename_entries(&args.input, &selected)?;
        eprintln!(
            "適用完了: {}件 (変更なし {}件)",
            report.renamed, report.unchanged
        );
    } else {
        eprintln!("dry-runモード: 実ファイルは変更していません。適用するには --apply を指定してください。");
    }

    Ok(())
}

fn apply_skips(entries: &mut [RenameEntry], skips: &[usize]) -> Result<()> {
    for index in skips {
        let count = entries.len();
        let entry = entries.get_mut(*index).ok_or_else(|| {
            anyhow::anyhow!("--skip の番号が範囲外です: {index} (有効範囲: 0..{count})")
        })?;
        entry.selected = false;
    }
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("設定ファイル: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_set(args: ConfigSetArgs) -> Result<()> {
    let mut config = load_config()?;
    if let Some(format) = args.output_date_format {
        validate_date_format(&format)?;
        config.output_date_format = format;
    }
    if let Some(format) = args.table_date_format {
        validate_date_format(&format)?;
        config.table_date_format = format;
    }
    save_config(&config)?;
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn print_json(outcome: &ScanOutcome) -> Result<()> {
    let issues: Vec<String> = outcome
        .issues
        .iter()
        .map(|issue| issue.error.to_string())
        .collect();
    let body = serde_json::json!({
        "entries": outcome.entries,
        "issues": issues,
        "stats": outcome.stats,
    });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn print_table(outcome: &ScanOutcome, table_date_format: &str) {
    println!("# 元ファイル -> 新ファイル (撮影日時)");
    for (index, entry) in outcome.entries.iter().enumerate() {
        let marker = if entry.selected { " " } else { "x" };
        println!(
            "{index:>3}{marker} {} -> {} ({})",
            entry.filename,
            entry.output,
            entry.date.format(table_date_format)
        );
    }

    println!(
        "\n集計: scanned={} image={} non_image_skip={} no_date={} planned={}",
        outcome.stats.scanned_files,
        outcome.stats.image_files,
        outcome.stats.skipped_non_image,
        outcome.stats.no_date,
        outcome.stats.planned
    );
}
