use clap::Parser;
use std::path::Path;
use tourism_reports::adapters::loader::{self, DatasetSource};
use tourism_reports::adapters::output;
use tourism_reports::config::{Command, InitDbArgs, RunArgs};
use tourism_reports::core::{reports, ConfigProvider};
use tourism_reports::utils::error::ErrorSeverity;
use tourism_reports::utils::{logger, validation::Validate};
use tourism_reports::{CliConfig, ReportEngine, ReportError, ReportId, ReportsConfig, SqliteSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 載入配置
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logging() {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::List => {
            print_report_list(&config);
            Ok(())
        }
        Command::Run(args) => run_report(&config, args).await,
        Command::InitDb(args) => init_db(&config, args),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
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

async fn run_report(config: &ReportsConfig, args: &RunArgs) -> Result<(), ReportError> {
    let report = args.report_id()?;
    let format = args.output_format(config)?;
    let params = args.params();

    let source = SqliteSource::new(config.database_path());
    tracing::info!("📊 Running report {} against {}", report, source.path().display());
    let engine = ReportEngine::from_config(source, config);

    let rows = engine.run_report(report, &params).await?;

    let columns = reports::column_names(report);
    print!("{}", output::render(report, &columns, &rows, format)?);
    Ok(())
}

fn init_db(config: &ReportsConfig, args: &InitDbArgs) -> Result<(), ReportError> {
    let path = Path::new(config.database_path());
    let source = match &args.data_dir {
        Some(dir) => DatasetSource::CsvDir(dir.as_path()),
        None => DatasetSource::Demo,
    };

    tracing::info!("🗄️ Initializing database at {}", path.display());
    let stats = loader::init_database(path, source)?;

    println!("✅ Database ready: {}", path.display());
    println!(
        "📁 {} attractions, {} opening hours, {} tickets",
        stats.attractions, stats.opening_hours, stats.tickets
    );
    Ok(())
}

fn print_report_list(config: &ReportsConfig) {
    println!("📋 Available reports:");
    for report in ReportId::ALL {
        let required = report.required_parameters();
        let params = if required.is_empty() {
            match report {
                ReportId::TopExpensiveTickets => format!("limit (default {})", config.default_limit()),
                ReportId::CheapTickets => {
                    format!("max_price (default {})", config.default_max_price())
                }
                ReportId::TicketPriceByTypePrefix => {
                    format!("type_prefix (default \"{}\")", config.default_type_prefix())
                }
                _ => "none".to_string(),
            }
        } else {
            required.join(", ")
        };
        println!("  {:<28} {}", report.name(), report.describe());
        println!("  {:<28} params: {}", "", params);
    }
}
