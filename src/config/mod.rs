pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, InitDbArgs, RunArgs};

#[cfg(feature = "cli")]
mod cli {
    use crate::adapters::output::OutputFormat;
    use crate::config::toml_config::ReportsConfig;
    use crate::core::{ReportId, ReportParams};
    use crate::utils::error::Result;
    use clap::{Args, Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "tourism-reports")]
    #[command(about = "Read-only reports over a tourism attractions database")]
    pub struct CliConfig {
        /// Path to TOML configuration file
        #[arg(short, long, global = true)]
        pub config: Option<PathBuf>,

        /// Override the database path from the config
        #[arg(long, global = true, env = "TOURISM_DB")]
        pub database: Option<String>,

        /// Enable verbose output
        #[arg(short, long, global = true)]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// List the available reports
        List,
        /// Run one report
        Run(RunArgs),
        /// Create the database and load a dataset into it
        InitDb(InitDbArgs),
    }

    #[derive(Debug, Clone, Args)]
    pub struct RunArgs {
        /// Report name, e.g. attractions_by_city
        pub report: String,

        #[arg(long)]
        pub city: Option<String>,

        #[arg(long = "day")]
        pub day_of_week: Option<String>,

        #[arg(long = "attraction")]
        pub attraction_name: Option<String>,

        #[arg(long)]
        pub limit: Option<usize>,

        #[arg(long)]
        pub max_price: Option<f64>,

        #[arg(long)]
        pub type_prefix: Option<String>,

        /// table, csv, tsv or json
        #[arg(short, long)]
        pub format: Option<String>,
    }

    #[derive(Debug, Clone, Args)]
    pub struct InitDbArgs {
        /// Directory holding attractions.csv, opening_hours.csv and tickets.csv
        #[arg(long, conflicts_with = "demo", required_unless_present = "demo")]
        pub data_dir: Option<PathBuf>,

        /// Load the bundled Paris demo dataset
        #[arg(long)]
        pub demo: bool,
    }

    impl CliConfig {
        /// 載入設定檔並套用命令列覆蓋
        pub fn load_config(&self) -> Result<ReportsConfig> {
            let mut config = match &self.config {
                Some(path) => ReportsConfig::from_file(path)?,
                None => ReportsConfig::default(),
            };
            if let Some(database) = &self.database {
                config.database.path = database.clone();
            }
            Ok(config)
        }
    }

    impl RunArgs {
        pub fn report_id(&self) -> Result<ReportId> {
            self.report.parse()
        }

        pub fn params(&self) -> ReportParams {
            ReportParams {
                city: self.city.clone(),
                day_of_week: self.day_of_week.clone(),
                attraction_name: self.attraction_name.clone(),
                limit: self.limit,
                max_price: self.max_price,
                type_prefix: self.type_prefix.clone(),
            }
        }

        pub fn output_format(&self, config: &ReportsConfig) -> Result<OutputFormat> {
            match &self.format {
                Some(format) => format.parse(),
                None => Ok(config.output_format()),
            }
        }
    }

}
