//! CLI command handlers
//!
//! Each handler resolves the vault around its input, runs the library
//! pipeline and prints the result. Nothing here invokes pandoc.

use crate::cli_bin::args::*;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use pandoc_prep::core::{front_matter, schema, violations, OutputFormat};
use pandoc_prep::io::fs::{absolutize, find_vault_root, replace_extension};
use pandoc_prep::io::{resolve_files, write_atomic, write_temporary};
use pandoc_prep::{
    ConverterInvocation, ExportConfig, Exporter, FsStore, PrepError, PreparedExport,
    VaultLinkResolver,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Merge the configuration file with command-line overrides
pub fn load_config(settings: &SettingsOverrides) -> Result<ExportConfig> {
    let mut config = match &settings.config {
        Some(path) => ExportConfig::load(path)?,
        None => ExportConfig::default(),
    };

    if let Some(vault) = &settings.vault {
        config.vault_root = Some(vault.clone());
    }
    if let Some(folder) = &settings.template_folder {
        config.template_folder = Some(folder.clone());
    }
    if let Some(policy) = settings.schema_policy {
        config.schema_policy = policy;
    }
    if let Some(folder) = &settings.output_folder {
        config.output_folder = Some(folder.clone());
    }
    if let Some(pandoc) = &settings.pandoc {
        config.pandoc = pandoc.clone();
    }

    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// A document located inside its vault
struct Workspace {
    document: PathBuf,
    root: PathBuf,
    links: VaultLinkResolver,
}

impl Workspace {
    fn open(config: &ExportConfig, file: &Path) -> Result<Self> {
        let document = absolutize(file)?;
        let root = match &config.vault_root {
            Some(root) => absolutize(root)?,
            None => find_vault_root(&document),
        };
        debug!("Vault root: {}", root.display());

        let links = VaultLinkResolver::scan_with_config(&root, &config.vault_config())?;
        Ok(Self {
            document,
            root,
            links,
        })
    }

    async fn prepare(&self, config: &ExportConfig) -> Result<PreparedExport> {
        let prepared = Exporter::new(&FsStore, &self.links, config)
            .prepare(&self.document, &self.root)
            .await?;
        let failures = prepared.failures().count();
        if failures > 0 {
            warn!(
                "{} embeds in {} could not be inlined",
                failures,
                self.document.display()
            );
        }
        Ok(prepared)
    }
}

/// Execute the flatten command
pub async fn flatten_command(config: &ExportConfig, args: FlattenArgs) -> Result<()> {
    debug!("Executing flatten command with args: {:?}", args);

    let workspace = Workspace::open(config, &args.file)?;
    let rendered = workspace.prepare(config).await?.render()?;

    match &args.output {
        Some(output) => {
            write_atomic(output, &rendered)?;
            info!("Wrote {}", output.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Execute the args command
pub async fn arguments_command(config: &ExportConfig, args: ArgumentsArgs) -> Result<()> {
    debug!("Executing args command with args: {:?}", args);

    let workspace = Workspace::open(config, &args.file)?;
    for arg in workspace.prepare(config).await?.args() {
        println!("{}", arg);
    }
    Ok(())
}

/// Execute the command command
pub async fn command_command(config: &ExportConfig, args: CommandArgs) -> Result<()> {
    debug!("Executing command command with args: {:?}", args);

    let format = OutputFormat::lookup(&args.to)?;
    let workspace = Workspace::open(config, &args.file)?;
    let prepared = workspace.prepare(config).await?;
    let rendered = prepared.render()?;

    let input = if args.temp {
        write_temporary(&rendered)?
    } else {
        let input = replace_extension(&workspace.document, "prepared.md");
        write_atomic(&input, &rendered)?;
        input
    };
    info!("Prepared document written to {}", input.display());

    let invocation = ConverterInvocation::build(
        config,
        format,
        &input,
        &workspace.document,
        &workspace.root,
        &prepared.arguments,
    );
    debug!("Run from {}", invocation.working_dir.display());
    println!("{}", invocation);
    Ok(())
}

/// Execute the check command
pub fn check_command(args: CheckArgs) -> Result<()> {
    debug!("Executing check command");

    let files = resolve_files(&args.files);
    if files.is_empty() {
        warn!("No files found to process");
        return Ok(());
    }

    let mut failed = 0;
    let mut unreadable = Vec::new();

    for file in &files {
        debug!("Checking file: {}", file.display());

        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read {}: {}", file.display(), e);
                unreadable.push(PrepError::Io(e));
                continue;
            }
        };

        let found = violations(&front_matter::extract(&content));
        if found.is_empty() {
            println!("{}: OK", file.display());
            continue;
        }

        failed += 1;
        for violation in &found {
            println!("{}: {}", file.display(), violation);
        }
        if args.fail_fast {
            break;
        }
    }

    if !unreadable.is_empty() {
        return Err(PrepError::multiple(unreadable).into());
    }
    if failed > 0 {
        return Err(PrepError::validation(format!(
            "{} files have invalid pandoc options",
            failed
        ))
        .into());
    }

    info!("All {} files passed", files.len());
    Ok(())
}

/// Execute the options command
pub fn options_command(args: OptionsArgs) -> Result<()> {
    if args.json {
        let json = if args.formats {
            serde_json::to_string_pretty(OutputFormat::all())
        } else {
            serde_json::to_string_pretty(schema::PANDOC_OPTIONS)
        }
        .context("failed to serialize table")?;
        println!("{}", json);
        return Ok(());
    }

    if args.formats {
        for format in OutputFormat::all() {
            println!(
                "{:<12} {:<20} .{}{}",
                format.name,
                format.label,
                format.extension,
                if format.needs_latex { " (LaTeX)" } else { "" }
            );
        }
        return Ok(());
    }

    for option in schema::iter() {
        let kind = if option.flag_only {
            "flag".to_string()
        } else {
            option.option_type.to_string()
        };
        print!("--{:<32} {:<8} {}", option.name, kind, option.description);
        if !option.choices.is_empty() {
            print!(" [{}]", option.choices.join("|"));
        }
        println!();
    }
    Ok(())
}
