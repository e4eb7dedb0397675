use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use wireframe_editor::{export_document, Node, NodeKind, SessionConfig, Tree};

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Layout document to create
    #[arg(short, long, default_value = "layout.json")]
    pub layout: String,

    /// Prefix for generated node ids
    #[arg(long)]
    pub id_seed: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing wireframe...".bright_blue().bold());

    // Create starter layout if it doesn't exist
    let layout_path = PathBuf::from(cwd).join(&args.layout);
    if !layout_path.exists() {
        if let Some(dir) = layout_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&layout_path, starter_layout()?)?;
        println!("  {} Created {}", "✓".green(), args.layout);
    }

    let config = Config {
        layout: args.layout.clone(),
        session: SessionConfig {
            id_seed: args.id_seed,
            ..SessionConfig::default()
        },
    };

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Wireframe initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Write an editing script (JSON array of steps)");
    println!("  2. Run: wireframe replay script.json");
    println!("  3. Run: wireframe inspect");

    Ok(())
}

/// A root holding one empty container
fn starter_layout() -> Result<String> {
    let root = Node::root().with_child(Node::new("main", NodeKind::Container));
    Ok(export_document(&Tree::from_root(root))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wireframe_editor::parse_document;

    fn args(force: bool) -> InitArgs {
        InitArgs {
            layout: "pages/home.json".to_string(),
            id_seed: Some("home".to_string()),
            force,
        }
    }

    #[test]
    fn test_init_writes_config_and_layout() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();

        init(args(false), cwd).unwrap();

        let config = Config::load(cwd).unwrap();
        assert_eq!(config.layout, "pages/home.json");
        assert_eq!(config.session.id_seed.as_deref(), Some("home"));

        let layout = fs::read_to_string(dir.path().join("pages/home.json")).unwrap();
        let root = parse_document(&layout).unwrap();
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn test_init_keeps_existing_config_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"layout": "mine.json"}"#).unwrap();

        init(args(false), cwd).unwrap();
        assert_eq!(Config::load(cwd).unwrap().layout, "mine.json");

        init(args(true), cwd).unwrap();
        assert_eq!(Config::load(cwd).unwrap().layout, "pages/home.json");
    }
}
