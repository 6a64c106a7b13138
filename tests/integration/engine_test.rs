use gradle_facts::core::{analyze, FactAnalyzer, ListAggregator, ScopeController, ScopeStack, ScopeTag};
use gradle_facts::error::{FactsError, Result};
use gradle_facts::gradle::blocks::BlockController;
use gradle_facts::models::syntax::{NodeId, NodeKind, SyntaxTree};
use gradle_facts::parsers::ScriptParser;

/// Reports the name of every call together with whether it sits in `allprojects`
struct GlobalCalls;

impl FactAnalyzer<(String, bool)> for GlobalCalls {
    fn node_kinds(&self) -> &[NodeKind] {
        &[NodeKind::Call]
    }

    fn analyze(&self, tree: &SyntaxTree, node: NodeId, scope: &ScopeStack) -> Option<(String, bool)> {
        let name = tree.name(node)?.to_string();
        Some((name, scope.contains(ScopeTag::AllProjects)))
    }
}

/// Opens a scope on `dependencies` calls but closes a different one
struct MismatchedController {
    entered: std::cell::Cell<bool>,
}

impl ScopeController for MismatchedController {
    fn node_kinds(&self) -> &[NodeKind] {
        &[NodeKind::Call]
    }

    fn classify(&self, tree: &SyntaxTree, node: NodeId) -> Option<ScopeTag> {
        if tree.name(node) != Some("dependencies") {
            return None;
        }
        if self.entered.replace(true) {
            Some(ScopeTag::Plugins)
        } else {
            Some(ScopeTag::Dependencies)
        }
    }
}

const SCRIPT: &str = r#"
allprojects {
    repositories { mavenCentral() }
    dependencies { classpath("a:b:1") }
}
dependencies { implementation("c:d:2") }
"#;

fn parse(src: &str) -> Result<SyntaxTree> {
    ScriptParser::kotlin()
        .parse(src)
        .map_err(|e| FactsError::parse_unavailable("build.gradle.kts", e.to_string()))
}

fn global_calls(tree: &SyntaxTree) -> Result<Vec<(String, bool)>> {
    let controller = BlockController::kts();
    let analyzer = GlobalCalls;
    let analyzers: [&dyn FactAnalyzer<(String, bool)>; 1] = [&analyzer];
    let controllers: [&dyn ScopeController; 1] = [&controller];
    analyze(tree, &analyzers, &controllers, &ListAggregator)
}

#[test]
fn test_scope_reflects_ancestors_only() -> Result<()> {
    let tree = parse(SCRIPT)?;
    let calls = global_calls(&tree)?;

    let lookup = |name: &str| calls.iter().filter(|(n, _)| n == name).map(|(_, g)| *g).collect::<Vec<_>>();
    assert_eq!(lookup("mavenCentral"), vec![true]);
    assert_eq!(lookup("classpath"), vec![true]);
    assert_eq!(lookup("implementation"), vec![false]);
    assert_eq!(lookup("dependencies"), vec![true, false]);
    Ok(())
}

#[test]
fn test_repeated_analysis_is_identical() -> Result<()> {
    let tree = parse(SCRIPT)?;
    assert_eq!(global_calls(&tree)?, global_calls(&tree)?);
    Ok(())
}

#[test]
fn test_mismatched_controller_aborts_traversal() -> Result<()> {
    let tree = parse(SCRIPT)?;
    let controller = MismatchedController {
        entered: std::cell::Cell::new(false),
    };
    let analyzer = GlobalCalls;
    let analyzers: [&dyn FactAnalyzer<(String, bool)>; 1] = [&analyzer];
    let controllers: [&dyn ScopeController; 1] = [&controller];

    let err = analyze(&tree, &analyzers, &controllers, &ListAggregator).unwrap_err();
    assert!(matches!(err, FactsError::ScopeIntegrity { .. }));
    assert!(err.is_critical());
    Ok(())
}
