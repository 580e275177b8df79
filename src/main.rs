use clap::{Args, Parser, Subcommand};
use std::io::Write as _;

mod advisor;
mod config;
mod error;
mod footprint;
mod form;
mod llm;
mod logger;
mod prompt;
mod render;
use crate::render as render_mod;
use config::{AdvisorConfig, CliOverrides};
use error::{ConfigurationError, GenerationError, InputError};
use footprint::{UsageInputs, WATER_FOOTPRINT_FACTORS};

#[derive(Parser, Debug, Clone)]
#[command(name = "aqua", version, about = "AquaAdvisor: estimate your water footprint and get water-saving tips", long_about = None)]
struct Cli {
    /// Active profile name
    #[arg(short = 'p', long = "profile", global = true)]
    profile: Option<String>,

    /// Model override (e.g., gemini-1.5-flash)
    #[arg(short = 'm', long = "model", global = true)]
    model: Option<String>,

    /// Provider override (gemini, mock)
    #[arg(long = "provider", global = true)]
    provider: Option<String>,

    /// Output JSON instead of human-readable text
    #[arg(long = "json", global = true)]
    json: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Compute the daily water footprint only
    Estimate(UsageArgs),

    /// Print the advisor prompt without sending it
    Prompt(UsageArgs),

    /// Compute the footprint and ask the model for three tips
    Advise(UsageArgs),

    /// Interactive form: fill in the fields, get advice, repeat
    Form,

    /// Write a profile to the config file
    Init(InitArgs),
}

#[derive(Args, Debug, Clone)]
struct UsageArgs {
    /// Daily shower time in minutes
    #[arg(long, default_value_t = 10.0, value_parser = form::parse_non_negative)]
    shower: f64,
    /// Daily toilet flushes
    #[arg(long, default_value_t = 5)]
    flushes: u32,
    /// Weekly laundry loads
    #[arg(long, default_value_t = 3)]
    laundry: u32,
    /// Weekly bottled water consumption in liters
    #[arg(long, default_value_t = 2.0, value_parser = form::parse_non_negative)]
    bottled: f64,
}

impl UsageArgs {
    fn to_inputs(&self) -> Result<UsageInputs, InputError> {
        UsageInputs::new(self.shower, self.flushes, self.laundry, self.bottled)
    }
}

#[derive(Args, Debug, Clone)]
struct InitArgs {
    /// Default model
    #[arg(long)]
    default_model: Option<String>,
    /// API base URL override
    #[arg(long)]
    api_base: Option<String>,
}

#[derive(Debug, Clone)]
struct GlobalOpts {
    profile: Option<String>,
    model: Option<String>,
    provider: Option<String>,
    json: bool,
}

impl GlobalOpts {
    fn overrides(&self) -> CliOverrides<'_> {
        CliOverrides {
            profile: self.profile.as_deref(),
            provider: self.provider.as_deref(),
            model: self.model.as_deref(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let Cli {
        profile,
        model,
        provider,
        json,
        verbose,
        command,
    } = cli;

    logger::init_cli_logger(verbose);

    let globals = GlobalOpts {
        profile,
        model,
        provider,
        json,
    };

    let result = match command {
        Commands::Estimate(args) => cmd_estimate(&globals, args),
        Commands::Prompt(args) => cmd_prompt(&globals, args),
        Commands::Advise(args) => cmd_advise(&globals, args).await,
        Commands::Form => cmd_form(&globals).await,
        Commands::Init(args) => cmd_init(&globals, args),
    };

    if let Err(e) = result {
        if globals.json {
            let (code, hint) = classify_error(&e);
            let msg = format!("{:#}", e);
            render_mod::print_json_error(code, &msg, hint);
        } else {
            eprintln!("🚨 {:#}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

fn classify_error(e: &anyhow::Error) -> (&'static str, Option<&'static str>) {
    if let Some(ce) = e.downcast_ref::<ConfigurationError>() {
        return match ce {
            ConfigurationError::MissingApiKey { .. } => ("missing_api_key", Some("set GEMINI_API_KEY in env or .env")),
            ConfigurationError::UnsupportedProvider(_) => ("provider_unsupported", Some("use --provider gemini or --provider mock")),
            ConfigurationError::ConfigDir(_) | ConfigurationError::ConfigFile { .. } => ("config_error", None),
        };
    }
    if e.downcast_ref::<InputError>().is_some() {
        return ("invalid_input", None);
    }
    if e.downcast_ref::<GenerationError>().is_some() {
        return ("generation_error", None);
    }
    ("unknown", None)
}

fn cmd_estimate(globals: &GlobalOpts, args: UsageArgs) -> anyhow::Result<()> {
    let inputs = args.to_inputs()?;
    let estimate = footprint::estimate(&inputs, &WATER_FOOTPRINT_FACTORS);
    if globals.json {
        render_mod::print_json(&render_mod::EstimateOut { inputs: &inputs, liters_per_day: estimate, note: footprint::GLOBAL_AVERAGE_NOTE });
    } else {
        render_mod::render_estimate(estimate);
    }
    Ok(())
}

fn cmd_prompt(globals: &GlobalOpts, args: UsageArgs) -> anyhow::Result<()> {
    let inputs = args.to_inputs()?;
    let estimate = footprint::estimate(&inputs, &WATER_FOOTPRINT_FACTORS);
    let text = prompt::build_advice_prompt(&inputs, estimate);
    if globals.json {
        #[derive(serde::Serialize)]
        struct Out<'a> { prompt: &'a str }
        render_mod::print_json(&Out { prompt: &text });
    } else {
        print!("{}", text);
    }
    Ok(())
}

/// Credential and generator are settled before any input is touched.
fn startup(globals: &GlobalOpts) -> anyhow::Result<(AdvisorConfig, Box<dyn llm::TextGenerator>)> {
    let cfg = AdvisorConfig::from_environment(&globals.overrides())?;
    tracing::debug!(?cfg, "advisor configured");
    let generator = llm::build_generator(&cfg)?;
    Ok((cfg, generator))
}

async fn cmd_advise(globals: &GlobalOpts, args: UsageArgs) -> anyhow::Result<()> {
    let (cfg, generator) = startup(globals)?;
    let inputs = args.to_inputs()?;
    let pending = advisor::begin_cycle(inputs, &WATER_FOOTPRINT_FACTORS);
    if !globals.json {
        render_mod::render_estimate(pending.estimate);
        println!("\n⏳ Generating your personalized tips...");
    }
    let outcome = pending.request_advice(generator.as_ref()).await;
    render_mod::render_outcome(&outcome, &cfg.model, globals.json);
    Ok(())
}

async fn cmd_form(globals: &GlobalOpts) -> anyhow::Result<()> {
    if globals.json {
        anyhow::bail!("--json is not supported by the interactive form; use `advise --json`");
    }
    let (cfg, generator) = startup(globals)?;
    println!("💧 AquaAdvisor – Your AI Water & Sanitation Guide");
    println!("Use this form to estimate your water footprint and get personalized water-saving tips.\n");

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();
    let mut defaults = UsageInputs::default();
    loop {
        let Some(inputs) = form::read_inputs(&mut input, &mut out, &defaults)? else { break };
        let pending = advisor::begin_cycle(inputs, &WATER_FOOTPRINT_FACTORS);
        render_mod::render_estimate(pending.estimate);
        println!("\n⏳ Generating your personalized tips...");
        let outcome = pending.request_advice(generator.as_ref()).await;
        render_mod::render_outcome(&outcome, &cfg.model, false);
        defaults = inputs;
        if form::ask_next(&mut input, &mut out)? == form::Next::Quit {
            break;
        }
    }
    out.flush().ok();
    Ok(())
}

/// Provider and profile come from the global `--provider` / `--profile` flags.
fn cmd_init(globals: &GlobalOpts, mut args: InitArgs) -> anyhow::Result<()> {
    use config::{default_config_path, load_config_if_exists, write_config, Profile};
    use std::io::IsTerminal as _;

    let path = default_config_path()?;
    let mut cfg = load_config_if_exists(&path)?.unwrap_or_default();

    let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();

    let mut provider = globals.provider.clone();
    if provider.is_none() && interactive {
        let p = prompt_line("Provider [gemini|mock] (default: gemini): ")?;
        provider = Some(if p.is_empty() { "gemini".to_string() } else { p });
    }
    let provider = provider.unwrap_or_else(|| "gemini".to_string());
    if llm::Provider::from_str(&provider).is_none() {
        return Err(ConfigurationError::UnsupportedProvider(provider).into());
    }

    if args.default_model.is_none() && interactive {
        let m = prompt_line(&format!("Default model (default: {}): ", llm::DEFAULT_MODEL))?;
        args.default_model = Some(if m.is_empty() { llm::DEFAULT_MODEL.to_string() } else { m });
    }

    let profile_name = globals.profile.clone().unwrap_or_else(|| "default".to_string());
    let prof = cfg.profiles.entry(profile_name.clone()).or_insert_with(Profile::default);
    prof.provider = Some(provider);
    if let Some(model) = args.default_model { prof.model = Some(model); }
    if let Some(base) = args.api_base { prof.api_base = Some(base); }
    if cfg.default_profile.is_none() { cfg.default_profile = Some(profile_name); }

    write_config(&path, &cfg)?;
    println!("config written: {}", path.display());
    if std::env::var(config::API_KEY_VAR).is_err() {
        println!("note: {} is read from the environment or .env, never from the config file", config::API_KEY_VAR);
    }
    Ok(())
}

fn prompt_line(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    std::io::stdout().flush().ok();
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
