//! Integration tests for node name, namespace, and service remapping.

use nodelet_args::{RemapRule, RosArgs};
use nodelet_zenoh::Context;

/// Helper to create RosArgs with remap rules
fn args_with_remaps(rules: Vec<RemapRule>) -> RosArgs {
    RosArgs {
        remap_rules: rules,
        ..Default::default()
    }
}

// ============================================================================
// Node name remapping tests
// ============================================================================

#[test]
fn test_node_name_remapping() {
    let args = args_with_remaps(vec![RemapRule::new_global(
        "__node".to_string(),
        "remapped_node".to_string(),
    )]);

    let ctx = Context::with_args(args).expect("Failed to create context");
    let node = ctx
        .create_node("original_node", None)
        .expect("Failed to create node");

    // name() should return the effective (remapped) name
    assert_eq!(node.name(), "remapped_node");
    assert_eq!(node.original_name(), "original_node");
}

#[test]
fn test_node_namespace_remapping() {
    let args = args_with_remaps(vec![RemapRule::new_global(
        "__ns".to_string(),
        "/remapped_ns".to_string(),
    )]);

    let ctx = Context::with_args(args).expect("Failed to create context");
    let node = ctx
        .create_node("my_node", Some("/original_ns"))
        .expect("Failed to create node");

    assert_eq!(node.namespace(), "/remapped_ns");
}

#[test]
fn test_node_fqn_with_both_remappings() {
    let args = args_with_remaps(vec![
        RemapRule::new_global("__node".to_string(), "new_node".to_string()),
        RemapRule::new_global("__ns".to_string(), "/new_ns".to_string()),
    ]);

    let ctx = Context::with_args(args).expect("Failed to create context");
    let node = ctx
        .create_node("old_node", Some("/old_ns"))
        .expect("Failed to create node");

    assert_eq!(node.name(), "new_node");
    assert_eq!(node.namespace(), "/new_ns");
    assert_eq!(node.fully_qualified_name(), "/new_ns/new_node");
}

#[test]
fn test_node_no_remapping() {
    let args = RosArgs::default();

    let ctx = Context::with_args(args).expect("Failed to create context");
    let node = ctx
        .create_node("my_node", Some("/my_ns"))
        .expect("Failed to create node");

    assert_eq!(node.name(), "my_node");
    assert_eq!(node.namespace(), "/my_ns");
    assert_eq!(node.fully_qualified_name(), "/my_ns/my_node");
}

// ============================================================================
// Service name remapping tests
// ============================================================================

#[test]
fn test_service_remapping_absolute_name() {
    let args = args_with_remaps(vec![RemapRule::new_global(
        "/manager/load_nodelet".to_string(),
        "/other_manager/load_nodelet".to_string(),
    )]);

    let ctx = Context::with_args(args).expect("Failed to create context");
    let node = ctx
        .create_node("my_node", None)
        .expect("Failed to create node");

    let result = node
        .expand_and_remap_name("/manager/load_nodelet")
        .expect("Failed to expand name");
    assert_eq!(result, "/other_manager/load_nodelet");
}

#[test]
fn test_service_remapping_relative_rule() {
    let args = args_with_remaps(vec![RemapRule::new_global(
        "manager".to_string(),
        "real_manager".to_string(),
    )]);

    let ctx = Context::with_args(args).expect("Failed to create context");
    let node = ctx
        .create_node("my_node", None)
        .expect("Failed to create node");

    // relative rule: both sides are expanded against the root namespace
    let result = node
        .expand_and_remap_name("manager")
        .expect("Failed to expand name");
    assert_eq!(result, "/real_manager");
}

#[test]
fn test_service_remapping_node_specific_rule() {
    let args = args_with_remaps(vec![
        RemapRule::new_node_specific(
            "other_node".to_string(),
            "/manager".to_string(),
            "/their_manager".to_string(),
        ),
        RemapRule::new_node_specific(
            "my_node".to_string(),
            "/manager".to_string(),
            "/my_manager".to_string(),
        ),
    ]);

    let ctx = Context::with_args(args).expect("Failed to create context");
    let node = ctx
        .create_node("my_node", None)
        .expect("Failed to create node");

    let result = node
        .expand_and_remap_name("/manager")
        .expect("Failed to expand name");
    assert_eq!(result, "/my_manager");
}

#[test]
fn test_private_name_expansion() {
    let ctx = Context::with_args(RosArgs::default()).expect("Failed to create context");
    let node = ctx
        .create_node("manager", Some("/camera"))
        .expect("Failed to create node");

    let result = node
        .expand_and_remap_name("~/load_nodelet")
        .expect("Failed to expand name");
    assert_eq!(result, "/camera/manager/load_nodelet");
}

#[test]
fn test_no_matching_rule_keeps_name() {
    let args = args_with_remaps(vec![RemapRule::new_global(
        "/somewhere_else".to_string(),
        "/unrelated".to_string(),
    )]);

    let ctx = Context::with_args(args).expect("Failed to create context");
    let node = ctx
        .create_node("my_node", None)
        .expect("Failed to create node");

    let result = node
        .expand_and_remap_name("/manager/load_nodelet")
        .expect("Failed to expand name");
    assert_eq!(result, "/manager/load_nodelet");
}

#[test]
fn test_invalid_service_name_is_rejected() {
    let ctx = Context::with_args(RosArgs::default()).expect("Failed to create context");
    let node = ctx
        .create_node("my_node", None)
        .expect("Failed to create node");

    assert!(node.expand_and_remap_name("bad//name").is_err());
    assert!(node.expand_and_remap_name("").is_err());
}
