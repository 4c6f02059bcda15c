//! droidcfg CLI
//!
//! Resolves the Android build configuration of a Flutter project, prints
//! it, diagnoses problems, and hands release builds to Gradle.

use anyhow::Result;
use clap::{Parser, Subcommand};
use droidcfg_android::doctor::{self, Diagnosis, SourceStatus};
use droidcfg_android::gradle::{self, GradleInvocation};
use droidcfg_android::{BuildDescriptor, BuildVariant, Resolver};
use droidcfg_cli::output::{format_count, Status};
use droidcfg_core::config::Config;
use droidcfg_core::error::exit_codes;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "droidcfg")]
#[command(about = "Resolve and validate Android build configuration for Flutter projects")]
#[command(version)]
struct Cli {
    /// Android project root (holds key.properties and local.properties)
    #[arg(short = 'C', long, global = true, default_value = ".", env = "DROIDCFG_PROJECT_DIR")]
    project_dir: PathBuf,

    /// Packaging module directory, relative to the project root
    #[arg(short, long, global = true)]
    module: Option<String>,

    /// Settings file path (defaults to droidcfg.toml in the project root)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and print the build descriptor
    Resolve {
        /// Build variant: debug, release
        #[arg(long, default_value = "debug")]
        variant: BuildVariant,
        /// Output as JSON (passwords masked)
        #[arg(long)]
        json: bool,
        /// Fail if the keystore file does not exist
        #[arg(long)]
        verify_keystore: bool,
    },

    /// Resolve, then run the Gradle packaging task
    Build {
        /// Build variant: debug, release
        #[arg(long, default_value = "debug")]
        variant: BuildVariant,
        /// Build bundle (AAB) instead of APK
        #[arg(long)]
        bundle: bool,
        /// Clean before building
        #[arg(long)]
        clean: bool,
        /// Print the Gradle invocation without running it
        #[arg(long)]
        dry_run: bool,
        /// Fail if the keystore file does not exist
        #[arg(long)]
        verify_keystore: bool,
    },

    /// Report the state of every configuration source
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    init_logging(cli.verbose, cli.quiet, cli.no_color)?;

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            Status::error(&e.to_string());
            e.exit_code()
        }
    };

    std::process::exit(exit_code);
}

fn init_logging(verbose: u8, quiet: bool, no_color: bool) -> Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "droidcfg={level},droidcfg_android={level},droidcfg_core={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

fn run(cli: &Cli) -> droidcfg_core::Result<i32> {
    let mut config = Config::load(cli.config.as_deref(), &cli.project_dir)?;
    if let Some(module) = &cli.module {
        config.settings.android.module = module.clone();
    }
    tracing::debug!(
        settings = ?config.path,
        module = %config.settings.android.module,
        "settings loaded"
    );

    match &cli.command {
        Commands::Resolve {
            variant,
            json,
            verify_keystore,
        } => {
            config.settings.signing.verify_keystore |= *verify_keystore;
            run_resolve(cli, config, *variant, *json)
        }
        Commands::Build {
            variant,
            bundle,
            clean,
            dry_run,
            verify_keystore,
        } => {
            config.settings.signing.verify_keystore |= *verify_keystore;
            run_build(cli, config, *variant, *bundle, *clean, *dry_run)
        }
        Commands::Doctor { json } => run_doctor(cli, &config, *json),
    }
}

fn resolve_descriptor(project_dir: &Path, config: Config, variant: BuildVariant) -> droidcfg_core::Result<BuildDescriptor> {
    let resolver = Resolver::discover(project_dir, config.settings)?;
    Ok(resolver.build_descriptor(variant)?)
}

fn run_resolve(cli: &Cli, config: Config, variant: BuildVariant, json: bool) -> droidcfg_core::Result<i32> {
    let descriptor = resolve_descriptor(&cli.project_dir, config, variant)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else if !cli.quiet {
        print_descriptor(&descriptor);
    }

    Ok(exit_codes::SUCCESS)
}

fn print_descriptor(descriptor: &BuildDescriptor) {
    Status::header(&format!("Build configuration ({})", descriptor.variant()));
    Status::field("application id", descriptor.application_id());
    Status::field("namespace", descriptor.namespace());
    Status::field("compile sdk", descriptor.compile_sdk_version());
    Status::field("target sdk", descriptor.target_sdk_version());
    Status::field("min sdk", descriptor.min_sdk_version());
    Status::field("ndk", descriptor.ndk_version());
    Status::field(
        "version",
        format!("{} ({})", descriptor.version_name(), descriptor.version_code()),
    );
    Status::field(
        "java",
        format!(
            "{} / jvmTarget {}",
            descriptor.java_compatibility().gradle_constant(),
            descriptor.java_compatibility().jvm_target()
        ),
    );
    Status::field("flutter sdk", descriptor.toolchain().sdk_root().display());
    Status::field("flutter source", descriptor.framework_source().display());

    match descriptor.signing() {
        Some(signing) => {
            Status::field("keystore", signing.store_file().display());
            Status::field("key alias", signing.key_alias());
            Status::field("store password", signing.store_password());
            Status::field("key password", signing.key_password());
        }
        None => Status::field("signing", "debug keystore (packager default)"),
    }
    println!();
    Status::success("Configuration is complete");
}

fn run_build(
    cli: &Cli,
    config: Config,
    variant: BuildVariant,
    bundle: bool,
    clean: bool,
    dry_run: bool,
) -> droidcfg_core::Result<i32> {
    let descriptor = resolve_descriptor(&cli.project_dir, config, variant)?;
    let invocation = GradleInvocation::for_descriptor(&descriptor, &cli.project_dir, bundle);

    if dry_run {
        println!("{}", invocation.describe());
        return Ok(exit_codes::SUCCESS);
    }

    if clean {
        if !cli.quiet {
            Status::info("Cleaning...");
        }
        let result = gradle::clean(&cli.project_dir)?;
        if !result.success {
            Status::error("Clean failed");
            eprintln!("{}", result.combined_output());
            return Ok(exit_codes::FAILURE);
        }
    }

    if !cli.quiet {
        Status::info(&format!(
            "Building {} {}...",
            variant,
            if bundle { "bundle" } else { "APK" }
        ));
    }

    run_gradle(&invocation, &cli.project_dir, cli.quiet)
}

fn run_gradle(invocation: &GradleInvocation, project_dir: &Path, quiet: bool) -> droidcfg_core::Result<i32> {
    let code = invocation.run(project_dir)?;
    if code == 0 {
        if !quiet {
            Status::success("Build succeeded");
        }
        Ok(exit_codes::SUCCESS)
    } else {
        Status::error(&format!("Gradle exited with code {}", code));
        Ok(exit_codes::FAILURE)
    }
}

fn run_doctor(cli: &Cli, config: &Config, json: bool) -> droidcfg_core::Result<i32> {
    let diagnosis = doctor::diagnose(&cli.project_dir, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&diagnosis)?);
    } else if !cli.quiet {
        print_diagnosis(&diagnosis);
    }

    // A machine that can only build debug is still usable for development
    let debug_ready = diagnosis
        .variant(BuildVariant::Debug)
        .is_some_and(|v| v.ready);
    Ok(if debug_ready {
        exit_codes::SUCCESS
    } else {
        exit_codes::CONFIG_ERROR
    })
}

fn print_diagnosis(diagnosis: &Diagnosis) {
    Status::header("Configuration check");

    match &diagnosis.settings_file {
        Some(path) => Status::success(&format!("settings: {}", path.display())),
        None => Status::info("settings: built-in defaults"),
    }

    for source in &diagnosis.sources {
        let label = format!("{} (required for {})", source.name, source.required_for);
        match &source.status {
            SourceStatus::Found { entries } => {
                Status::success(&format!("{}: {}", label, format_count(*entries, "entry", "entries")));
            }
            SourceStatus::Missing => Status::warning(&format!("{}: not found at {}", label, source.path.display())),
            SourceStatus::Invalid { reason } => Status::error(&format!("{}: {}", label, reason)),
        }
    }

    if diagnosis.gradle_wrapper {
        Status::success("gradle wrapper: found");
    } else {
        Status::warning("gradle wrapper: not found");
    }

    Status::header("Variants");
    for report in &diagnosis.variants {
        match &report.error {
            None => Status::success(&format!("{}: ready", report.variant)),
            Some(error) => Status::error(&format!("{}: {}", report.variant, error)),
        }
    }

    println!();
    if diagnosis.is_healthy() {
        Status::success("Ready for debug and release builds");
    } else {
        Status::warning("Not every variant can be built yet");
    }
}
