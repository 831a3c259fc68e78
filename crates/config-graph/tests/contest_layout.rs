//! End-to-end lookups against a merged contest configuration.

use cph_config_graph::{
    bindings, resolve_bool, resolve_first_as, resolve_int, resolve_list, resolve_string,
    ConfigError, ConfigTree, ExpandConfig,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn merged_config() -> ConfigTree {
    ConfigTree::build(&json!({
        "paths": {
            "local_workspace_path": "./workspace",
            "contest_current_path": "{local_workspace_path}/contest_current",
            "contest_stock_path": "{local_workspace_path}/contest_stock/{language_name}/{contest_name}/{problem_name}"
        },
        "timeout": {"default": 300},
        "debug": "off",
        "python": {
            "aliases": ["py"],
            "language_id": "5078",
            "source_file_name": "main.py",
            "run_command": "python3",
            "commands": {
                "test": {
                    "aliases": ["t"],
                    "steps": [
                        {"type": "shell", "cmd": ["{run_command}", "{contest_current_path}/{source_file_name}"]},
                        {"type": "oj", "cmd": ["oj", "test"]}
                    ]
                },
                "submit": {"aliases": ["s"], "steps": []}
            }
        },
        "rust": {
            "aliases": ["rs"],
            "language_id": "5054",
            "source_file_name": "src/main.rs"
        }
    }))
    .expect("merged config builds")
}

#[test]
fn language_lookups_honor_aliases() {
    let tree = merged_config();
    assert_eq!(resolve_string(&tree, ["py", "language_id"]).unwrap(), "5078");
    assert_eq!(resolve_string(&tree, ["rs", "language_id"]).unwrap(), "5054");
    assert_eq!(resolve_int(&tree, ["rust", "language_id"]).unwrap(), 5054);
}

#[test]
fn command_steps_by_short_names() {
    let tree = merged_config();
    let steps = tree.resolve_best(["py", "t", "steps"]).unwrap();
    assert_eq!(steps.children().len(), 2);

    let kinds: Vec<String> = steps
        .children()
        .iter()
        .map(|step| {
            let index = step.key().to_string();
            resolve_string(&tree, ["py", "t", "steps", index.as_str(), "type"]).unwrap()
        })
        .collect();
    assert_eq!(kinds, vec!["shell", "oj"]);

    let submit = tree.resolve_best(["python", "s"]).unwrap();
    assert_eq!(submit.path(), "root.python.commands.submit");
}

#[test]
fn wildcard_enumerates_commands() {
    let tree = merged_config();
    let commands = tree.resolve_best(["python", "commands"]).unwrap();
    let names: Vec<String> = commands.children().iter().map(|c| c.key().to_string()).collect();
    assert_eq!(names, vec!["test", "submit"]);
}

#[test]
fn step_command_expands_from_the_graph() {
    let tree = merged_config();
    let cmd: Vec<String> = resolve_list(&tree, ["python", "test", "steps", "0", "cmd"]).unwrap();
    let context = bindings([("contest_name", "abc300"), ("problem_name", "a")]);

    let expanded: Vec<String> = cmd
        .iter()
        .map(|part| {
            tree.expand_recursive(part, &context, &ExpandConfig::default())
                .unwrap()
        })
        .collect();
    assert_eq!(
        expanded,
        vec!["python3", "./workspace/contest_current/main.py"]
    );
}

#[test]
fn stock_path_keeps_unknown_placeholders() {
    let tree = merged_config();
    let template = resolve_string(&tree, ["paths", "contest_stock_path"]).unwrap();
    let context = bindings([("contest_name", "abc300"), ("problem_name", "a")]);
    let out = tree
        .expand_recursive(&template, &context, &ExpandConfig::default())
        .unwrap();
    assert_eq!(out, "./workspace/contest_stock/{language_name}/abc300/a");
}

#[test]
fn fallback_chains() {
    let tree = merged_config();
    let timeout: i64 =
        resolve_first_as(&tree, &[vec!["timeout", "default"], vec!["default_timeout"]]).unwrap();
    assert_eq!(timeout, 300);
    assert!(!resolve_bool(&tree, ["debug"]).unwrap());
}

#[test]
fn mistyped_alias_block_is_rejected() {
    let err = ConfigTree::build(&json!({"python": {"commands": {"test": {"aliases": {"t": 1}}}}}))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidAliasesKind {
            node: "root.python.commands.test".to_string(),
            found: "map".to_string(),
        }
    );
}

#[test]
fn stats_describe_the_document() {
    let tree = merged_config();
    let stats = tree.stats();
    assert_eq!(stats.node_count, tree.len());
    assert!(stats.max_depth >= 7);
    assert!(stats.leaf_count > 0);
}
