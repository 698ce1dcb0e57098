//! Brand Forge - AI-assisted brand naming studio
//!
//! Generates a batch of brand names, lets the user pick a shortlist and
//! validates only that shortlist against domains, trademarks and SEO.

use anyhow::{bail, Context};
use async_trait::async_trait;
use brand_forge::{
    domain::{DomainValidator, RegistryProbe, ResultCache},
    llm::{
        providers::PERSONALITIES,
        story::{BrandStory, StorySource},
        NameGenerator, StoryGenerator,
    },
    seo::HeuristicSeoOptimizer,
    session::JsonlSessionLog,
    trademark::TrademarkAssessor,
    types::{Availability, BrandBrief, Confidence, DomainCheck, SeoOutcome},
    validation::{ValidationCoordinator, ValidationProgress, ValidationRecord, ValidationReport},
    workflow::{PromptRequest, PromptResponse, Prompter, Workflow, WorkflowOutcome, WorkflowState},
    BrandForgeError, Settings,
};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{validator::Validation, Confirm, InquireError, Select, Text};
use parking_lot::Mutex;
use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize the library
    if let Err(e) = brand_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("brand-forge {}", brand_forge::VERSION);
        return;
    }

    let description = args.join(" ");
    if let Err(e) = run(description.trim()).await {
        match e.downcast_ref::<BrandForgeError>() {
            Some(BrandForgeError::Cancelled) => println!("⏹️  Cancelled"),
            Some(err) => {
                eprintln!("{}", err.user_message());
                process::exit(1);
            }
            None => {
                eprintln!("❌ Error: {:#}", e);
                process::exit(1);
            }
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the quiet default
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(description: &str) -> anyhow::Result<()> {
    println!("🔥 Brand Forge - AI-assisted brand naming");
    println!("═════════════════════════════════════════");
    println!();

    let settings = Settings::from_env().context("Invalid configuration")?;

    let generator = NameGenerator::new();
    for config in &settings.llm {
        generator
            .add_provider(config)
            .with_context(|| format!("Failed to configure provider '{}'", config.provider))?;
    }
    if !generator.is_ready() {
        bail!(BrandForgeError::config(
            "No LLM providers configured. Set OPENAI_API_KEY, ANTHROPIC_API_KEY or OLLAMA_MODEL"
        ));
    }

    let brief = ask_brief(description)?;
    let storyteller = StoryGenerator::new(generator.providers());

    let probe = Arc::new(RegistryProbe::with_config(&settings.check));
    let cache = Arc::new(ResultCache::with_ttl(settings.check.cache_ttl));
    let validator = DomainValidator::new(probe, cache, settings.check.clone());
    let trademark = TrademarkAssessor::from_strategy(&settings.trademark, settings.check.timeout);
    if trademark.is_enhanced() {
        println!("⚖️  Trademark checks: enhanced (USPTO status API)");
    } else {
        println!("⚖️  Trademark checks: simulated heuristic");
    }
    let coordinator = Arc::new(ValidationCoordinator::new(
        validator,
        trademark,
        Arc::new(HeuristicSeoOptimizer::new()),
    ));
    let session_log = Arc::new(JsonlSessionLog::new(&settings.session_dir));
    tracing::info!(path = %session_log.path().display(), "Session log opened");

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let mut workflow = Workflow::new(
        brief,
        settings.workflow.clone(),
        Arc::new(generator),
        coordinator.clone(),
        session_log,
    )
    .with_cancellation(cancel)
    .with_generation_config(settings.generation.clone());

    let prompter = CliPrompter;
    let progress = SpinnerProgress::new();

    let outcome = loop {
        if matches!(workflow.state(), WorkflowState::Generate) {
            println!("🤖 Generating names...");
        }
        match workflow.run(&prompter, &progress).await {
            Ok(outcome) => break outcome,
            Err(e @ BrandForgeError::Generation { .. }) => {
                progress.clear();
                eprintln!("{}", e.user_message());
                let retry = Confirm::new("Retry name generation?")
                    .with_default(true)
                    .prompt()
                    .unwrap_or(false);
                if !retry {
                    workflow.abort("generation failed");
                }
            }
            Err(e) => {
                progress.clear();
                return Err(e.into());
            }
        }
    };

    match outcome {
        WorkflowOutcome::Accepted { report, warning } => {
            println!();
            if let Some(warning) = warning {
                println!("⚠️  {}", warning);
            }
            print_final_summary(&report);
            offer_export(&report)?;
            offer_story(&storyteller, &report, workflow.context().brief()).await?;
        }
        WorkflowOutcome::Aborted { reason } => {
            println!("⏹️  Session ended: {}", reason);
        }
    }

    let metrics = coordinator.domain_validator().metrics();
    tracing::info!(
        probes = metrics.probes_issued,
        cache_hits = metrics.cache_hits,
        fallbacks = metrics.fallbacks,
        "Session finished"
    );
    Ok(())
}

/// First Ctrl-C cancels in-flight validation, a second one exits
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::warn!("Interrupt received, cancelling validation");
        cancel.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("⏹️  Interrupted");
            process::exit(130);
        }
    });
}

/// Ask for the brief fields not given on the command line
fn ask_brief(description: &str) -> anyhow::Result<BrandBrief> {
    let required = |input: &str| -> Result<Validation, inquire::CustomUserError> {
        if input.trim().is_empty() {
            Ok(Validation::Invalid("This field is required".into()))
        } else {
            Ok(Validation::Valid)
        }
    };

    let product_description = if description.is_empty() {
        Text::new("What does your product do?")
            .with_validator(required)
            .prompt()
            .map_err(inquire_error)?
    } else {
        println!("🎯 Product: {}", description);
        description.to_string()
    };

    let target_audience = Text::new("Who is it for?")
        .with_validator(required)
        .prompt()
        .map_err(inquire_error)?;

    let brand_personality = Select::new("Brand personality:", PERSONALITIES.to_vec())
        .with_starting_cursor(1)
        .prompt()
        .map_err(inquire_error)?;

    let industry = Text::new("Industry (optional):")
        .prompt()
        .map_err(inquire_error)?;

    Ok(BrandBrief::new(
        product_description.trim(),
        target_audience.trim(),
        brand_personality,
        industry.trim(),
    ))
}

fn inquire_error(err: InquireError) -> anyhow::Error {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => BrandForgeError::Cancelled.into(),
        other => anyhow::Error::new(other).context("Prompt failed"),
    }
}

/// Terminal prompter: renders each request and reads one line
struct CliPrompter;

#[async_trait]
impl Prompter for CliPrompter {
    async fn prompt(&self, request: &PromptRequest) -> brand_forge::Result<PromptResponse> {
        let message = match request {
            PromptRequest::Select {
                batch,
                min,
                max,
                iteration,
                can_regenerate,
            } => {
                print_batch(batch, *iteration);
                let mut options = format!("Pick {}-{} names (e.g. 1,4,7) or 'all'", min, max);
                if *can_regenerate {
                    options.push_str(", 'regenerate'");
                }
                options.push_str(" or 'abort':");
                options
            }
            PromptRequest::Decide {
                report,
                can_regenerate,
                ..
            } => {
                print_report(report);
                if *can_regenerate {
                    "Happy with these names? [y]es / [n]o to generate new ones / abort:".to_string()
                } else {
                    "Happy with these names? [y]es / [n]o (no more regenerations, accepts as is) / abort:"
                        .to_string()
                }
            }
        };

        let answer = tokio::task::spawn_blocking(move || Text::new(&message).prompt())
            .await
            .map_err(|e| BrandForgeError::internal(format!("Prompt task failed: {}", e)))?;

        match answer {
            Ok(input) => Ok(PromptResponse::from(input)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Err(BrandForgeError::Cancelled)
            }
            Err(e) => Err(BrandForgeError::io(e.to_string(), None)),
        }
    }

    fn on_invalid_input(&self, error: &BrandForgeError) {
        eprintln!("{}", error.user_message());
    }
}

/// Spinner shown while a selection is validated
struct SpinnerProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl SpinnerProgress {
    fn new() -> Self {
        Self { bar: Mutex::new(None) }
    }

    fn clear(&self) {
        if let Some(bar) = self.bar.lock().take() {
            bar.finish_and_clear();
        }
    }
}

impl ValidationProgress for SpinnerProgress {
    fn on_name_start(&self, index: usize, total: usize, name: &str) {
        let mut slot = self.bar.lock();
        let bar = slot.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner();
            bar.enable_steady_tick(Duration::from_millis(100));
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        });
        bar.set_message(format!("Validating [{}/{}]: {}", index, total, name));
    }

    fn on_name_complete(&self, index: usize, total: usize, _record: &ValidationRecord) {
        if index == total {
            self.clear();
        }
    }
}

fn print_batch(batch: &[brand_forge::CandidateName], iteration: u32) {
    println!();
    if iteration > 0 {
        println!("🎨 Generated Names (round {}, {}):", iteration + 1, batch.len());
    } else {
        println!("🎨 Generated Names ({}):", batch.len());
    }
    println!("═══════════════════════");
    for (i, candidate) in batch.iter().enumerate() {
        print!("{:2}. {:<16}", i + 1, candidate.brand_name);
        if !candidate.naming_strategy.is_empty() {
            print!(" [{}]", candidate.naming_strategy);
        }
        if !candidate.tagline.is_empty() {
            print!(" {}", candidate.tagline);
        }
        println!();
    }
    println!();
}

fn print_report(report: &ValidationReport) {
    println!();
    println!("🔍 Validation Results ({}):", report.len());
    println!("═══════════════════════════");

    for (i, record) in report.records.iter().enumerate() {
        println!();
        print_record(i + 1, record);
    }

    let summary = report.summary();
    println!();
    println!("📈 Summary:");
    println!("   🟢 Clear: {}", summary.clear);
    println!("   🟡 Caution: {}", summary.caution);
    println!("   🔴 Blocked: {}", summary.blocked);
    println!(
        "   🌐 Domains: {} available, {} taken, {} unknown",
        summary.domains_available, summary.domains_taken, summary.domains_unknown
    );
    println!();
}

fn print_record(position: usize, record: &ValidationRecord) {
    let verdict = &record.verdict;
    println!(
        "{}. {} - {} ({}/100)",
        position,
        record.name(),
        verdict.status.to_string().to_uppercase(),
        verdict.score
    );

    let domains = &record.domains;
    if let Some(error) = &domains.error_message {
        println!("   ⚠️  Domains not checked: {}", error);
    } else {
        print_domain_group("✅ Available", domains.available());
        print_domain_group("❌ Taken", domains.taken());
        print_domain_group("⚠️  Unknown", domains.unknown());
    }

    let alternatives = record.alternative_suggestions();
    if !alternatives.is_empty() {
        println!("   💡 Alternatives: {}", alternatives.join(", "));
    }

    let trademark = &record.trademark;
    print!(
        "   ⚖️  Trademark: {} risk, {} potential conflict(s) ({})",
        trademark.risk, trademark.conflicts, trademark.source
    );
    if record.trademark_degraded {
        print!(" [external check unavailable]");
    }
    println!();

    match &record.seo {
        SeoOutcome::Optimized(seo) => {
            println!(
                "   📊 SEO: {}/100, keywords: {}",
                seo.seo_score,
                seo.primary_keywords.join(", ")
            );
        }
        SeoOutcome::Unknown { reason } => println!("   📊 SEO: unknown ({})", reason),
    }

    println!("   💬 {}", verdict.recommendation);
    for concern in &verdict.concerns {
        println!("   • {}", concern);
    }
}

fn print_domain_group<'a>(label: &str, checks: impl Iterator<Item = &'a DomainCheck>) {
    let rendered: Vec<String> = checks.map(render_check).collect();
    if !rendered.is_empty() {
        println!("   {}: {}", label, rendered.join(", "));
    }
}

fn render_check(check: &DomainCheck) -> String {
    match (check.availability, check.confidence) {
        (Availability::Available, Confidence::AssumedAvailable) => format!("{} (unverified)", check.domain),
        (_, Confidence::Cancelled) => format!("{} (cancelled)", check.domain),
        _ => check.domain.clone(),
    }
}

fn print_final_summary(report: &ValidationReport) {
    println!("🏁 Final shortlist:");
    for record in report.ranked() {
        let best = record
            .verdict
            .best_available
            .as_deref()
            .unwrap_or("no premium domain");
        println!(
            "   {:<16} {:>3}/100  {:<8} {}",
            record.name(),
            record.verdict.score,
            record.verdict.status.to_string(),
            best
        );
    }
    println!();
}

fn offer_export(report: &ValidationReport) -> anyhow::Result<()> {
    let export = Confirm::new("Export the report as JSON?")
        .with_default(false)
        .prompt()
        .unwrap_or(false);
    if !export {
        return Ok(());
    }

    let path = Text::new("File name:")
        .with_default("brand-forge-report.json")
        .prompt()
        .map_err(inquire_error)?;
    let path = PathBuf::from(path.trim());
    report
        .export_json(&path)
        .with_context(|| format!("Failed to export report to {}", path.display()))?;
    println!("💾 Report saved to {}", path.display());
    Ok(())
}

/// Offer brand story copy for one of the accepted names
async fn offer_story(storyteller: &StoryGenerator, report: &ValidationReport, brief: &BrandBrief) -> anyhow::Result<()> {
    let names: Vec<String> = report.ranked().iter().map(|r| r.name().to_string()).collect();
    if names.is_empty() {
        return Ok(());
    }

    let write = Confirm::new("Write taglines and a brand story for one of these names?")
        .with_default(false)
        .prompt()
        .unwrap_or(false);
    if !write {
        return Ok(());
    }

    let name = Select::new("Which name?", names).prompt().map_err(inquire_error)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Writing the {} story...", name));
    spinner.enable_steady_tick(Duration::from_millis(120));
    let story = storyteller.generate_story(&name, brief).await;
    spinner.finish_and_clear();

    print_story(&story);
    Ok(())
}

fn print_story(story: &BrandStory) {
    println!();
    println!("📖 {}", story.brand_name);
    println!("─────────────────────────────────────────");
    println!("Taglines:");
    for (i, tagline) in story.taglines.iter().enumerate() {
        println!("  {}. {}", i + 1, tagline);
    }
    println!();
    println!("Story:\n  {}", story.brand_story);
    println!();
    println!("Hero copy:\n  {}", story.hero_copy);
    println!();
    println!("Value proposition:\n  {}", story.value_proposition);
    if story.source == StorySource::Template {
        println!();
        println!("ℹ️  No model answered; this copy was written from templates");
    }
}

/// Print help information
fn print_help() {
    println!("🔥 Brand Forge - AI-assisted brand naming");
    println!("═════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    brand-forge [PRODUCT DESCRIPTION]");
    println!();
    println!("EXAMPLES:");
    println!("    brand-forge                                # Answer every question interactively");
    println!("    brand-forge \"AI meal planner for parents\"  # Start from a product description");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Print this help");
    println!("    -V, --version    Print version");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    OPENAI_API_KEY                   OpenAI (or compatible) API key");
    println!("    OPENAI_MODEL / OPENAI_BASE_URL   Model (default: gpt-4.1-mini) and endpoint");
    println!("    ANTHROPIC_API_KEY                Anthropic API key");
    println!("    ANTHROPIC_MODEL                  Model (default: claude-sonnet-4-5)");
    println!("    OLLAMA_MODEL / OLLAMA_BASE_URL   Local Ollama model and endpoint");
    println!("    USPTO_API_KEY                    Enables trademark status confirmation");
    println!();
    println!("    BRAND_FORGE_SUFFIXES             Domain suffixes (default: com,ai,io,so,app,co,is,me,net,to)");
    println!("    BRAND_FORGE_PREFIXES             Alternative prefixes (default: get,try,your,my,hello,use)");
    println!("    BRAND_FORGE_INCLUDE_PREFIXES     Check prefix domains for every name (default: false)");
    println!("    BRAND_FORGE_BATCH_SIZE           Names per batch (default: 20)");
    println!("    BRAND_FORGE_MIN_SELECT           Minimum names to validate (default: 5)");
    println!("    BRAND_FORGE_MAX_SELECT           Maximum names to validate (default: 10)");
    println!("    BRAND_FORGE_MAX_LOOP_ITERATIONS  Regeneration limit (default: 3)");
    println!("    BRAND_FORGE_CACHE_TTL_SECS       Domain result cache lifetime (default: 300)");
    println!("    BRAND_FORGE_PROBE_CONCURRENCY    Parallel domain probes (default: 10)");
    println!("    BRAND_FORGE_PROBE_TIMEOUT_SECS   Per-probe timeout (default: 8)");
    println!("    BRAND_FORGE_PROBE_RETRIES        Retries after a transient failure (default: 2)");
    println!("    BRAND_FORGE_RETRY_BACKOFF_MS     Linear retry backoff step (default: 250)");
    println!("    BRAND_FORGE_STAGGER_THRESHOLD    Batch size that triggers staggering (default: 10)");
    println!("    BRAND_FORGE_STAGGER_MS           Stagger step (default: 50)");
    println!("    BRAND_FORGE_SESSION_DIR          Session log directory (default: .sessions)");
    println!("    RUST_LOG                         Log filter (default: warn)");
    println!();
    println!("Made with ❤️ and 🦀 Rust");
}
