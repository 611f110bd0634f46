use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use lcms_sdk::{
    Cms, CmsConfig, LandingContent, LandingId, LandingPatch, Menu, MenuNode, MenuSync, NewLanding,
    NodeKind, ResourceDescriptor, ResourceId,
};

use crate::cli::*;

pub fn run_command(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let cms = open(&cli)?;
    let format = cli.format;
    match cli.command {
        Command::Landing(cmd) => cmd_landing(&cms, cmd, format, out),
        Command::Menu(cmd) => cmd_menu(&cms, cmd, format, out),
        Command::Resource(cmd) => cmd_resource(&cms, cmd, format, out),
    }
}

fn open(cli: &Cli) -> anyhow::Result<Cms> {
    let mut config = match &cli.config {
        Some(path) => CmsConfig::load(path)?,
        None => CmsConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    debug!(data_dir = %config.data_dir.display(), config = ?cli.config, "opening cms");
    Ok(Cms::open(&config)?)
}

fn json(out: &mut impl Write, value: &impl Serialize) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn landing_id(raw: &str) -> anyhow::Result<LandingId> {
    LandingId::parse(raw).with_context(|| format!("invalid landing id {raw:?}"))
}

fn print_sync(out: &mut impl Write, sync: &MenuSync) -> anyhow::Result<()> {
    match sync {
        MenuSync::Synced { nodes } => writeln!(out, "  menu: {} node(s) updated", nodes)?,
        MenuSync::Skipped => writeln!(out, "  menu: {}", "unchanged".dimmed())?,
        MenuSync::Failed { reason } => {
            writeln!(out, "  {} menu not updated: {}", "warning:".yellow().bold(), reason)?
        }
    }
    Ok(())
}

// ---- Landings ----

fn cmd_landing(
    cms: &Cms,
    cmd: LandingCommand,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match cmd {
        LandingCommand::List => {
            let entries = cms.list_landings()?;
            if format == OutputFormat::Json {
                return json(out, &entries);
            }
            if entries.is_empty() {
                writeln!(out, "No landings.")?;
            }
            for entry in &entries {
                let star = if entry.is_featured {
                    "*".yellow().to_string()
                } else {
                    " ".into()
                };
                write!(
                    out,
                    "{star} {}  {}  {}",
                    entry.id.as_str().dimmed(),
                    entry.slug.bold(),
                    entry.name
                )?;
                if !entry.menu_category.is_empty() {
                    write!(out, "  [{}]", entry.menu_category.cyan())?;
                }
                writeln!(out)?;
            }
            Ok(())
        }
        LandingCommand::Show { id } => {
            let landing = cms.get_landing(&landing_id(&id)?)?;
            if format == OutputFormat::Json {
                return json(out, &landing);
            }
            writeln!(out, "{}  {}", landing.name.bold(), landing.slug.cyan())?;
            writeln!(out, "  id:       {}", landing.id)?;
            if !landing.menu_category.is_empty() {
                writeln!(out, "  category: {}", landing.menu_category)?;
            }
            writeln!(out, "  featured: {}", landing.is_featured)?;
            writeln!(out, "  created:  {}", landing.created_at.to_rfc3339())?;
            writeln!(out, "  updated:  {}", landing.updated_at.to_rfc3339())?;
            let resources = &landing.content.resources.enabled_resource_ids;
            writeln!(out, "  resources: {}", resources.len())?;
            Ok(())
        }
        LandingCommand::Create(args) => {
            let mut fields = NewLanding::new(args.name, args.slug);
            fields.menu_category = args.category;
            fields.is_featured = args.featured;
            let created = cms.create_landing_with(fields)?;
            if format == OutputFormat::Json {
                return json(out, &created);
            }
            writeln!(
                out,
                "{} Created landing {} ({})",
                "✓".green().bold(),
                created.value.slug.bold(),
                created.value.id
            )?;
            print_sync(out, &created.menu)
        }
        LandingCommand::Update(args) => {
            let id = landing_id(&args.id)?;
            let content = match &args.content {
                Some(path) => Some(read_json::<LandingContent>(path)?),
                None => None,
            };
            let patch = LandingPatch {
                name: args.name,
                slug: args.slug,
                menu_category: args.category,
                is_featured: args.featured,
                content,
            };
            if patch.is_empty() {
                anyhow::bail!("nothing to update; pass at least one field");
            }
            let updated = cms.update_landing(&id, patch)?;
            if format == OutputFormat::Json {
                return json(out, &updated);
            }
            writeln!(
                out,
                "{} Updated landing {} ({})",
                "✓".green().bold(),
                updated.value.slug.bold(),
                updated.value.id
            )?;
            print_sync(out, &updated.menu)
        }
        LandingCommand::Delete { id } => {
            let deleted = cms.delete_landing(&landing_id(&id)?)?;
            if format == OutputFormat::Json {
                return json(out, &deleted);
            }
            match &deleted.value {
                Some(slug) => {
                    writeln!(out, "{} Deleted landing {}", "✓".green().bold(), slug.bold())?
                }
                None => writeln!(out, "Landing {} was already absent.", id)?,
            }
            print_sync(out, &deleted.menu)
        }
    }
}

// ---- Menu ----

fn cmd_menu(
    cms: &Cms,
    cmd: MenuCommand,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let menu = match cmd {
        MenuCommand::Show => cms.get_menu()?,
        MenuCommand::Replace { file } => {
            let menu: Menu = read_json(&file)?;
            let menu = cms.replace_menu(menu)?;
            if format == OutputFormat::Text {
                writeln!(out, "{} Menu replaced", "✓".green().bold())?;
            }
            menu
        }
    };
    if format == OutputFormat::Json {
        return json(out, &menu);
    }
    print_nodes(out, menu.roots(), 0)
}

fn print_nodes(out: &mut impl Write, nodes: &[MenuNode], depth: usize) -> anyhow::Result<()> {
    for node in nodes {
        let indent = "  ".repeat(depth);
        match node.kind {
            NodeKind::Category => writeln!(out, "{indent}{}", node.label.bold())?,
            NodeKind::Link => writeln!(out, "{indent}{} -> {}", node.label, node.href.blue())?,
            NodeKind::Landing => writeln!(out, "{indent}{} -> {}", node.label, node.href.cyan())?,
        }
        print_nodes(out, &node.items, depth + 1)?;
    }
    Ok(())
}

// ---- Resources ----

fn cmd_resource(
    cms: &Cms,
    cmd: ResourceCommand,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match cmd {
        ResourceCommand::List => {
            let resources = cms.list_resources()?;
            if format == OutputFormat::Json {
                return json(out, &resources);
            }
            if resources.is_empty() {
                writeln!(out, "No resources.")?;
            }
            for r in &resources {
                writeln!(out, "{}  {}  {}", r.id.as_str().dimmed(), r.title.bold(), r.url.blue())?;
            }
            Ok(())
        }
        ResourceCommand::Upsert(args) => {
            let id = match &args.id {
                Some(raw) => ResourceId::parse(raw.as_str())
                    .with_context(|| format!("invalid resource id {raw:?}"))?,
                None => ResourceId::default(),
            };
            let saved = cms.upsert_resource(ResourceDescriptor {
                id,
                title: args.title,
                description: args.description,
                url: args.url,
                button_text: args.button_text,
            })?;
            if format == OutputFormat::Json {
                return json(out, &saved);
            }
            writeln!(
                out,
                "{} Saved resource {} ({})",
                "✓".green().bold(),
                saved.title.bold(),
                saved.id
            )?;
            Ok(())
        }
        ResourceCommand::Delete { id } => {
            let id = ResourceId::parse(id.as_str())
                .with_context(|| format!("invalid resource id {id:?}"))?;
            let removed = cms.delete_resource(&id)?;
            if format == OutputFormat::Json {
                return json(out, &serde_json::json!({ "id": id, "removed": removed }));
            }
            if removed {
                writeln!(out, "{} Deleted resource {}", "✓".green().bold(), id)?;
            } else {
                writeln!(out, "Resource {} was already absent.", id)?;
            }
            Ok(())
        }
    }
}
