//! Command dispatch: each subcommand drives the tree store and renders its state

use std::collections::VecDeque;
use std::io;

use clap::CommandFactory;
use serde_json::{Map, Value};
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::{RequestKey, RequestStatus, TreeStore};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{NewNode, Node, NodeId, Severity};
use crate::infrastructure::di::ServiceContainer;

pub async fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    match command {
        Commands::Config { command } => _config(cli, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        command => {
            if cli.lang.as_deref().is_some_and(|l| l.trim().is_empty()) {
                return Err(CliError::InvalidArgs("--lang must not be empty".into()));
            }
            let container = ServiceContainer::new(load_settings(cli)?)?;
            let mut store = container.tree_store();
            let lang = cli.lang.as_deref();
            match command {
                Commands::Tree { depth } => _tree(&mut store, lang, *depth).await,
                Commands::Children { id } => _children(&mut store, lang, id).await,
                Commands::Locales => _locales(&mut store, lang).await,
                Commands::Create {
                    title,
                    parent,
                    fields,
                } => {
                    let data = new_node(title.clone(), parent.clone(), fields);
                    _create(&mut store, lang, &data).await
                }
                Commands::Delete { id, parent } => {
                    _delete(&mut store, lang, id, parent.as_ref()).await
                }
                Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
            }
        }
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = cli
        .config_dir
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let mut settings = Settings::load(dir.as_deref())?;
    if let Some(url) = &cli.base_url {
        settings.api.base_url = url.clone();
    }
    debug!(?settings, "effective settings");
    Ok(settings)
}

/// Load locales and translations, then apply the requested language.
async fn prepare_language(store: &mut TreeStore, lang: Option<&str>) {
    if let RequestStatus::Failed(msg) = store.fetch_locales().await {
        output::warning(&format!("cannot load locales: {msg}"));
    }
    store.fetch_translations().await;
    if let Some(lang) = lang {
        if !store.set_language(lang) {
            output::warning(&format!(
                "locale {lang} not available, using {}",
                store.current_language()
            ));
        }
    }
}

#[instrument(skip(store))]
async fn _tree(store: &mut TreeStore, lang: Option<&str>, depth: usize) -> CliResult<()> {
    prepare_language(store, lang).await;

    if let RequestStatus::Failed(msg) = store.fetch_root_nodes().await {
        return Err(CliError::Unavailable(format!(
            "cannot load root nodes: {msg}"
        )));
    }

    // breadth-first so every level is complete before descending
    let mut frontier: VecDeque<(NodeId, usize)> = store
        .nodes()
        .iter()
        .map(|node| (node.id.clone(), 1))
        .collect();
    while let Some((id, level)) = frontier.pop_front() {
        if level > depth {
            continue;
        }
        store.toggle_node(&id).await;
        frontier.extend(
            store
                .get_node_children(&id)
                .iter()
                .map(|child| (child.id.clone(), level + 1)),
        );
    }

    let view: &TreeStore = store;
    let root = Tree::new(format!("nodes ({})", view.current_language())).with_leaves(
        view.nodes()
            .iter()
            .map(|node| render_node(view, node))
            .collect::<Vec<_>>(),
    );
    output::info(&root);

    // "no children" notices are expected while expanding, only failures matter here
    if let Some(n) = store.take_notification() {
        if n.severity == Severity::Danger {
            output::notification(&n);
        }
    }
    Ok(())
}

fn render_node(store: &TreeStore, node: &Node) -> Tree<String> {
    let mut label = format!("{} [{}]", store.get_node_title(node), node.id);
    if !store.children_state(&node.id).is_loaded() {
        label.push_str(" +");
    }

    let leaves = if store.is_node_expanded(&node.id) {
        store
            .get_node_children(&node.id)
            .iter()
            .map(|child| render_node(store, child))
            .collect()
    } else {
        Vec::new()
    };
    Tree::new(label).with_leaves(leaves)
}

#[instrument(skip(store))]
async fn _children(store: &mut TreeStore, lang: Option<&str>, id: &NodeId) -> CliResult<()> {
    prepare_language(store, lang).await;

    // 404 means "no children" and is settled as a success here
    store.load_children(id).await;
    if let Some(RequestStatus::Failed(msg)) =
        store.request_status(&RequestKey::Children(id.clone()))
    {
        return Err(CliError::Unavailable(format!(
            "cannot load children of {id}: {msg}"
        )));
    }

    let children = store.get_node_children(id);
    if children.is_empty() {
        output::info(&store.get_notification_text("noChildren"));
        return Ok(());
    }
    output::header(&format!("Children of {id}"));
    for child in children {
        output::detail(&format!("{} [{}]", store.get_node_title(child), child.id));
    }
    Ok(())
}

#[instrument(skip(store))]
async fn _locales(store: &mut TreeStore, lang: Option<&str>) -> CliResult<()> {
    if let RequestStatus::Failed(msg) = store.fetch_locales().await {
        return Err(CliError::Unavailable(format!("cannot load locales: {msg}")));
    }
    if let Some(lang) = lang {
        if !store.set_language(lang) {
            output::warning(&format!("locale {lang} not available"));
        }
    }

    output::header("Locales");
    for locale in store.locales() {
        let marker = if locale.locale == store.current_language() {
            "*"
        } else {
            " "
        };
        match locale.label() {
            Some(label) => output::detail(&format!("{marker} {} ({label})", locale.locale)),
            None => output::detail(&format!("{marker} {}", locale.locale)),
        }
    }
    Ok(())
}

#[instrument(skip(store))]
async fn _create(store: &mut TreeStore, lang: Option<&str>, data: &NewNode) -> CliResult<()> {
    prepare_language(store, lang).await;

    let created = store.create_node(data).await;
    if let Some(n) = store.take_notification() {
        output::notification(&n);
    }
    if !created {
        let cause = store.error().unwrap_or("create failed").to_string();
        return Err(CliError::Unavailable(cause));
    }
    Ok(())
}

#[instrument(skip(store))]
async fn _delete(
    store: &mut TreeStore,
    lang: Option<&str>,
    id: &NodeId,
    parent: Option<&NodeId>,
) -> CliResult<()> {
    prepare_language(store, lang).await;

    let deleted = store.delete_node(id, parent).await;
    if let Some(n) = store.take_notification() {
        output::notification(&n);
    }
    if !deleted {
        let cause = match store.request_status(&RequestKey::DeleteNode(id.clone())) {
            Some(RequestStatus::Failed(cause)) => cause.clone(),
            _ => format!("cannot delete node {id}"),
        };
        return Err(CliError::Unavailable(cause));
    }
    Ok(())
}

fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory on this platform"),
        },
    }
    Ok(())
}

/// Assemble a create payload; field values are JSON when they parse as such.
fn new_node(title: Option<String>, parent: Option<NodeId>, fields: &[(String, String)]) -> NewNode {
    let extra: Map<String, Value> = fields
        .iter()
        .map(|(key, raw)| {
            let value =
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            (key.clone(), value)
        })
        .collect();
    NewNode {
        parent,
        title,
        extra,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_fields_when_building_payload_then_parses_json_values() {
        let data = new_node(
            Some("Docs".into()),
            Some(NodeId::Number(2)),
            &[
                ("order".into(), "3".into()),
                ("color".into(), "red".into()),
            ],
        );

        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"parent": 2, "title": "Docs", "order": 3, "color": "red"})
        );
    }

    #[test]
    fn given_root_payload_when_serializing_then_sends_null_parent() {
        let data = new_node(None, None, &[]);
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({"parent": null}));
    }
}
