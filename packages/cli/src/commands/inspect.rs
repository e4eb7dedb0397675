use super::open_layout;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use wireframe_editor::{display_class_name, EditSession};

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Layout document (defaults to the configured layout)
    pub layout: Option<String>,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = config.layout_path(cwd, args.layout.as_deref());
    let session = open_layout(&path, &config.session)?;

    println!("{} {}", "🔍".bright_blue(), path.display());
    for line in outline(&session) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per node: indent, kind, id, classes, effective style
pub fn outline(session: &EditSession) -> Vec<String> {
    session
        .state()
        .tree
        .walk()
        .map(|visit| {
            let node = visit.node;
            let mut line = format!(
                "{}{} {}",
                "  ".repeat(visit.depth),
                node.kind.label().bold(),
                node.id.as_str().dimmed()
            );
            if !node.props.class_refs.is_empty() {
                let classes: Vec<&str> = node.props.class_refs.iter().map(display_class_name).collect();
                line.push_str(&format!(" .{}", classes.join(" .")).cyan().to_string());
            }
            if let Some(style) = session.effective_style(&node.id) {
                if !style.is_empty() {
                    line.push_str(&format!(" {{{}}}", style));
                }
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wireframe_editor::SessionConfig;

    #[test]
    fn test_outline_shows_nesting_and_style() {
        colored::control::set_override(false);
        let json = r#"{
            "id": "root", "kind": "container",
            "children": [
                { "id": "row", "kind": "container", "props": { "style": "display:flex" },
                  "children": [{ "id": "go", "kind": "button", "props": { "classRefs": "user-cta" } }] }
            ]
        }"#;
        let session = EditSession::open(json, SessionConfig::default()).unwrap();

        let lines = outline(&session);
        assert_eq!(
            lines,
            vec![
                "Container root".to_string(),
                "  Container row {display:flex}".to_string(),
                "    Button go .cta".to_string(),
            ]
        );
    }

    #[test]
    fn test_outline_matches_exported_document() {
        colored::control::set_override(false);
        let mut session = EditSession::new();
        let root = wireframe_editor::NodeId::root();
        let card = session
            .create_node(&root, wireframe_editor::NodeKind::Container)
            .unwrap()
            .unwrap();
        session.lock(&card).unwrap();

        // Locks are session state; the outline shows only what a layout file holds
        let json = session.export_json().unwrap();
        let reopened = EditSession::open(&json, SessionConfig::default()).unwrap();
        assert_eq!(outline(&session), outline(&reopened));
    }
}
